//! Terminal progress bar fed from the coordinator's polling task.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use keysieve_core::{Outcome, Reporter, SearchReport};

pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    pub fn new(total: u64, visible: bool) -> Self {
        let bar = ProgressBar::with_draw_target(
            Some(total),
            if visible {
                ProgressDrawTarget::stderr()
            } else {
                ProgressDrawTarget::hidden()
            },
        );
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}, eta {eta})",
        ) {
            bar.set_style(style.progress_chars("#>-"));
        }
        Self { bar }
    }
}

impl Reporter for BarReporter {
    fn progress(&self, attempted: u64, _total: u64) {
        self.bar.set_position(attempted);
    }

    fn finish(&self, report: &SearchReport) {
        self.bar.set_position(report.attempted);
        let message = match &report.outcome {
            Outcome::Found(_) => "match found",
            Outcome::NotFound { interrupted: true } => "interrupted",
            Outcome::NotFound { interrupted: false } => "exhausted",
        };
        self.bar.abandon_with_message(message);
    }
}
