// file: src/ocr/mod.rs
// description: OCR client and document processor exports
// reference: internal module structure

pub mod client;
pub mod processor;

pub use client::MistralOcrClient;
pub use processor::{OcrProcessor, resolve_api_key};
