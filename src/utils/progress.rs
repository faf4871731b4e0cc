// file: src/utils/progress.rs
// description: spinner shown while a network round trip (OCR, save, delete) is pending
// reference: https://docs.rs/indicatif

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ActivitySpinner {
    bar: ProgressBar,
}

impl ActivitySpinner {
    pub fn start(message: &str) -> Self {
        Self::with_color(message, true)
    }

    pub fn with_color(message: &str, colored: bool) -> Self {
        let bar = ProgressBar::new_spinner();
        let template = if colored {
            "{spinner:.yellow} {msg:.yellow} [{elapsed}]"
        } else {
            "{spinner} {msg} [{elapsed}]"
        };
        bar.set_style(
            ProgressStyle::default_spinner()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for ActivitySpinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
