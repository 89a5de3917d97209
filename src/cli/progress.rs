//! CLI-specific progress handling for butterfly-closure
//!
//! Provides the progress bar shown while benchmark runs execute.

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} runs ({percent}%) ETA: {eta}";

/// Creates a progress bar counting completed runs
pub fn create_progress_bar(total_runs: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_runs);
    let style = ProgressStyle::default_bar()
        .template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}

/// Progress manager for benchmark loops
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_runs: u64, message: &str) -> Self {
        let pb = create_progress_bar(total_runs);

        // Print initial message to stderr
        eprintln!("{}", message);

        Self { pb }
    }

    /// Hidden bar for machine-readable output modes
    pub fn hidden(total_runs: u64) -> Self {
        let pb = create_progress_bar(total_runs);
        pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        Self { pb }
    }

    pub fn tick(&self) {
        self.pb.inc(1);
    }

    pub fn finish(&self, message: &'static str) {
        self.pb.finish_with_message(message);
    }
}
