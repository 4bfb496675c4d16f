// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod ocr;
pub mod response_info;

pub use ocr::{DocumentInput, OcrImage, OcrPage, OcrRequest, OcrResponse, PageDimensions, UsageInfo};
pub use response_info::ResponseInfo;
