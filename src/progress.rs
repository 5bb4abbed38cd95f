use crate::error::{GearError, Result};
use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporting for a refresh. The background job ticket and the
/// terminal bar implement this; the pipeline only ever talks to the trait.
pub trait RefreshProgress {
    /// Called once the number of builds to process is known.
    fn begin(&mut self, _total: usize) {}

    fn log(&mut self, _msg: &str) {}

    /// `current` is 1-based.
    fn item_done(&mut self, _current: usize, _title: &str) {}

    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;

impl RefreshProgress for NullProgress {}

pub struct TerminalProgress {
    bar: Option<ProgressBar>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self { bar: None }
    }

    fn style() -> Result<ProgressStyle> {
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .map_err(|e| GearError::Other(e.to_string()))
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshProgress for TerminalProgress {
    fn begin(&mut self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = Self::style() {
            bar.set_style(style);
        }
        self.bar = Some(bar);
    }

    fn log(&mut self, msg: &str) {
        match &self.bar {
            Some(bar) => bar.println(msg),
            None => println!("{msg}"),
        }
    }

    fn item_done(&mut self, current: usize, title: &str) {
        if let Some(bar) = &self.bar {
            bar.set_position(current as u64);
            bar.set_message(title.to_string());
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message("Refresh complete");
        }
    }
}
