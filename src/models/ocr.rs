// file: src/models/ocr.rs
// description: request and response payloads of the Mistral OCR endpoint
// reference: https://docs.mistral.ai/capabilities/document/

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OcrRequest {
    pub model: String,
    pub document: DocumentInput,
    pub include_image_base64: bool,
}

impl OcrRequest {
    pub fn new(model: impl Into<String>, document: DocumentInput, include_images: bool) -> Self {
        Self {
            model: model.into(),
            document,
            include_image_base64: include_images,
        }
    }
}

/// Document source, tagged by `type` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentInput {
    DocumentUrl { document_url: String },
    ImageUrl { image_url: String },
}

impl DocumentInput {
    pub fn document_url(url: impl Into<String>) -> Self {
        Self::DocumentUrl {
            document_url: url.into(),
        }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OcrResponse {
    #[serde(default)]
    pub pages: Vec<OcrPage>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub usage_info: Option<UsageInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OcrPage {
    pub index: u32,
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub images: Vec<OcrImage>,
    #[serde(default)]
    pub dimensions: Option<PageDimensions>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OcrImage {
    pub id: String,
    #[serde(default)]
    pub top_left_x: Option<i64>,
    #[serde(default)]
    pub top_left_y: Option<i64>,
    #[serde(default)]
    pub bottom_right_x: Option<i64>,
    #[serde(default)]
    pub bottom_right_y: Option<i64>,
    #[serde(default)]
    pub image_base64: Option<String>,
}

impl OcrImage {
    /// Payload if the service sent a non-empty one.
    pub fn data(&self) -> Option<&str> {
        self.image_base64.as_deref().filter(|data| !data.is_empty())
    }

    pub fn has_data(&self) -> bool {
        self.data().is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UsageInfo {
    #[serde(default)]
    pub pages_processed: u32,
    #[serde(default)]
    pub doc_size_bytes: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageDimensions {
    pub dpi: u32,
    pub height: u32,
    pub width: u32,
}
