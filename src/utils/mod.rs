// file: src/utils/mod.rs
// description: utility functions module exports
// reference: internal module structure

pub mod encoding;
pub mod logging;
pub mod progress;
pub mod telemetry;
pub mod validation;

pub use encoding::{
    PDF_MIME_TYPE, create_data_url, encode_bytes_to_base64, encode_file_to_base64,
    encode_pdf_to_base64, mime_type_for_path, read_document,
};
pub use progress::RequestSpinner;
pub use telemetry::{DocumentMetrics, OperationTimer};
pub use validation::Validator;
