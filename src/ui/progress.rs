use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::output;

const TEMPLATE: &str = "{spinner} [{bar:30}] {pos}/{len} {msg}";

/// Progress bar for a directory run, one tick per finished document.
///
/// Hidden in quiet mode. Clears itself when dropped.
pub struct BatchProgress {
    progress_bar: ProgressBar,
}

impl BatchProgress {
    pub fn new(total: usize) -> Self {
        let progress_bar = if output::is_quiet() {
            ProgressBar::hidden()
        } else {
            ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr())
        };

        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            progress_bar.set_style(
                style
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                    .progress_chars("=> "),
            );
        }
        progress_bar.enable_steady_tick(Duration::from_millis(80));

        Self { progress_bar }
    }

    /// Records one finished document.
    pub fn advance(&self, name: &str) {
        self.progress_bar.set_message(name.to_string());
        self.progress_bar.inc(1);
    }

    /// Prints a line above the bar without tearing it.
    pub fn println(&self, line: &str) {
        if self.progress_bar.is_hidden() {
            eprintln!("{line}");
        } else {
            self.progress_bar.println(line);
        }
    }

    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl Drop for BatchProgress {
    fn drop(&mut self) {
        self.progress_bar.finish_and_clear();
    }
}
