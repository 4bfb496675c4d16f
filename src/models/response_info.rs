// file: src/models/response_info.rs
// description: raw OCR response paired with the metadata of the source file

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseInfo {
    pub file_path: String,
    pub file_size: u64,
    pub content_hash: String,
    pub processed_at: String,
    pub response: serde_json::Value,
}

impl ResponseInfo {
    pub fn new(file_path: String, content: &[u8], response: serde_json::Value) -> Self {
        Self {
            file_path,
            file_size: content.len() as u64,
            content_hash: Self::compute_hash(content),
            processed_at: Utc::now().to_rfc3339(),
            response,
        }
    }

    fn compute_hash(content: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content);
        format!("{:x}", hasher.finalize())
    }

    pub fn page_count(&self) -> usize {
        self.response
            .get("pages")
            .and_then(|pages| pages.as_array())
            .map_or(0, Vec::len)
    }
}
