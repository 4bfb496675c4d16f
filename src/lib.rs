// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod models;
pub mod ocr;
pub mod parser;
pub mod utils;

pub use config::{ApiConfig, Config, OutputConfig};
pub use error::{OcrError, Result};
pub use models::{
    DocumentInput, OcrImage, OcrPage, OcrRequest, OcrResponse, PageDimensions, ResponseInfo,
    UsageInfo,
};
pub use ocr::{MistralOcrClient, OcrProcessor};
pub use parser::{MarkdownParser, combine_ocr_pages_to_markdown, replace_images_in_markdown};
pub use utils::{
    DocumentMetrics, OperationTimer, RequestSpinner, Validator, create_data_url,
    encode_pdf_to_base64,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
