// file: src/utils/progress.rs
// description: stderr spinner shown while the OCR request is in flight
// reference: uses indicatif for progress display

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

pub struct RequestSpinner {
    bar: ProgressBar,
}

impl RequestSpinner {
    pub fn new(enabled: bool, colored: bool) -> Self {
        let bar = if enabled {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
        } else {
            ProgressBar::hidden()
        };

        let template = if colored {
            "{spinner:.green} [{elapsed_precise}] {msg}"
        } else {
            "{spinner} [{elapsed_precise}] {msg}"
        };

        if let Ok(style) = ProgressStyle::default_spinner().template(template) {
            bar.set_style(style);
        }

        if enabled {
            bar.enable_steady_tick(Duration::from_millis(120));
        }

        Self { bar }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for RequestSpinner {
    fn drop(&mut self) {
        self.finish();
    }
}
