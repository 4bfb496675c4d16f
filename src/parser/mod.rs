// file: src/parser/mod.rs
// description: markdown assembly module exports
// reference: internal module structure

pub mod markdown;

pub use markdown::{
    DEFAULT_PAGE_SEPARATOR, ImageRef, MarkdownParser, combine_ocr_pages_to_markdown,
    replace_images_in_markdown,
};
