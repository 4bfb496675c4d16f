// file: src/utils/encoding.rs
// description: base64 and data URL encoding for documents sent to the OCR API
// reference: https://docs.rs/base64

use crate::error::{OcrError, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const PDF_MIME_TYPE: &str = "application/pdf";

pub fn read_document(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => OcrError::FileNotFound(path.to_path_buf()),
        _ => OcrError::FileOperation {
            path: path.to_path_buf(),
            source,
        },
    })
}

pub fn encode_file_to_base64(path: &Path) -> Result<String> {
    let bytes = read_document(path)?;
    Ok(encode_bytes_to_base64(&bytes))
}

pub fn encode_bytes_to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn encode_pdf_to_base64(path: &Path) -> Result<String> {
    encode_file_to_base64(path)
}

pub fn create_data_url(base64_data: &str, mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_data)
}

/// Maps a file extension to the MIME type the OCR endpoint expects, if it is one it accepts.
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();

    let mime = match extension.as_str() {
        "pdf" => PDF_MIME_TYPE,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        _ => return None,
    };

    Some(mime)
}
