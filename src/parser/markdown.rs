// file: src/parser/markdown.rs
// description: merging OCR pages into one markdown document with inlined images
// reference: https://docs.rs/pulldown-cmark

use crate::models::{OcrImage, OcrResponse};
use crate::utils::encoding::{create_data_url, mime_type_for_path};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;

pub const DEFAULT_PAGE_SEPARATOR: &str = "\n\n";
const FALLBACK_IMAGE_MIME: &str = "image/jpeg";

/// Swaps each `![id](id)` placeholder for an inline data URL.
///
/// Images without a payload keep their placeholder. A payload that already
/// is a data URL is used verbatim.
pub fn replace_images_in_markdown(markdown: &str, images: &[OcrImage]) -> String {
    let mut result = markdown.to_string();

    for image in images {
        let Some(data) = image.data() else {
            continue;
        };

        let data_url = if data.starts_with("data:") {
            data.to_string()
        } else {
            create_data_url(data, image_mime_type(&image.id))
        };

        result = result.replace(
            &format!("![{}]({})", image.id, image.id),
            &format!("![{}]({})", image.id, data_url),
        );
    }

    result
}

pub fn combine_ocr_pages_to_markdown(response: &OcrResponse, separator: &str) -> String {
    response
        .pages
        .iter()
        .map(|page| replace_images_in_markdown(&page.markdown, &page.images))
        .collect::<Vec<_>>()
        .join(separator)
}

fn image_mime_type(image_id: &str) -> &'static str {
    mime_type_for_path(Path::new(image_id))
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or(FALLBACK_IMAGE_MIME)
}

pub struct MarkdownParser;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub alt: String,
    pub url: String,
}

impl ImageRef {
    pub fn is_inline(&self) -> bool {
        self.url.starts_with("data:")
    }
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    pub fn image_refs(&self, content: &str) -> Vec<ImageRef> {
        let mut refs = Vec::new();
        let mut current: Option<ImageRef> = None;

        for event in Parser::new(content) {
            match event {
                Event::Start(Tag::Image { dest_url, .. }) => {
                    current = Some(ImageRef {
                        alt: String::new(),
                        url: dest_url.to_string(),
                    });
                }
                Event::End(pulldown_cmark::TagEnd::Image) => {
                    if let Some(image) = current.take() {
                        refs.push(image);
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some(ref mut image) = current {
                        image.alt.push_str(&text);
                    }
                }
                _ => {}
            }
        }

        refs
    }

    /// Image references that still point at a bare id rather than inline data.
    pub fn unresolved_images(&self, content: &str) -> Vec<ImageRef> {
        self.image_refs(content)
            .into_iter()
            .filter(|image| !image.is_inline())
            .collect()
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}
