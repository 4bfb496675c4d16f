// file: src/utils/validation.rs
// description: input validation for documents, endpoints and credentials
// reference: input validation patterns

use crate::error::{OcrError, Result};
use crate::utils::encoding::mime_type_for_path;
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            OcrError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(OcrError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn validate_pdf_extension(path: &Path) -> Result<()> {
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

        if !is_pdf {
            return Err(OcrError::Validation(format!(
                "Input file must be a PDF: {}",
                path.display()
            )));
        }
        Ok(())
    }

    pub fn validate_image_extension(path: &Path) -> Result<()> {
        match mime_type_for_path(path) {
            Some(mime) if mime.starts_with("image/") => Ok(()),
            _ => Err(OcrError::Validation(format!(
                "Input file must be an image: {}",
                path.display()
            ))),
        }
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(OcrError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// The key ends up in an `Authorization` header, so it must be a single printable token.
    pub fn validate_api_key(key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(OcrError::Validation("API key must not be empty".to_string()));
        }

        if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(OcrError::Validation(
                "API key must not contain whitespace or control characters".to_string(),
            ));
        }
        Ok(())
    }
}
