// file: src/utils/telemetry.rs
// description: timing of OCR requests and per-document usage summaries

use crate::models::OcrResponse;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Operation timer for performance tracking
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        debug!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} in {:.2}s",
            self.operation,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    pub fn finish_with_pages(self, pages: usize) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} - {} pages in {:.2}s",
            self.operation,
            pages,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    pub fn warn_if_slow(&self, threshold: Duration) {
        let elapsed = self.elapsed();
        if elapsed > threshold {
            warn!(
                "Slow operation [{}]: took {:.2}s (threshold: {:.2}s)",
                self.operation,
                elapsed.as_secs_f64(),
                threshold.as_secs_f64()
            );
        }
    }
}

/// What one OCR call cost and produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentMetrics {
    pub pages: usize,
    pub images: usize,
    pub images_with_data: usize,
    pub doc_size_bytes: Option<u64>,
}

impl DocumentMetrics {
    pub fn from_response(response: &OcrResponse) -> Self {
        let images = response.pages.iter().map(|p| p.images.len()).sum();
        let images_with_data = response
            .pages
            .iter()
            .flat_map(|p| p.images.iter())
            .filter(|img| img.has_data())
            .count();

        Self {
            pages: response.pages.len(),
            images,
            images_with_data,
            doc_size_bytes: response.usage_info.as_ref().and_then(|u| u.doc_size_bytes),
        }
    }

    pub fn format(&self) -> String {
        let size = self
            .doc_size_bytes
            .map(|b| format!("{} bytes", b))
            .unwrap_or_else(|| "unknown size".to_string());

        format!(
            "{} pages, {} images ({} with data), {}",
            self.pages, self.images, self.images_with_data, size
        )
    }
}
