pub mod category;
pub mod ignore;
pub mod list;
pub mod optional;
pub mod report;
pub mod toggle;

use indicatif::{ProgressBar, ProgressStyle};
use modgraph::{Diagnostics, ProgressCallback, Severity, ToggleOutcome};
use std::sync::{Arc, Mutex};

/// Create an indicatif-based progress callback for CLI display
pub fn create_spinner_callback() -> ProgressCallback {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let spinner = Arc::new(Mutex::new(spinner));
    Arc::new(move |msg: &str, current: u64, total: u64| {
        if let Ok(s) = spinner.lock() {
            if current >= total {
                s.finish_with_message(format!("✓ {}", msg));
            } else {
                s.set_message(msg.to_string());
            }
        }
    })
}

/// Print diagnostics at or above `min`, most severe first
pub fn print_diagnostics(diagnostics: &Diagnostics, min: Severity) {
    let mut shown: Vec<_> = diagnostics.iter().filter(|d| d.severity() >= min).collect();
    if shown.is_empty() {
        return;
    }
    shown.sort_by(|a, b| b.severity().cmp(&a.severity()));

    println!();
    for diagnostic in shown {
        println!("{} {}", diagnostic.severity().symbol(), diagnostic);
    }
}

/// Print what a toggle changed, or why it changed nothing
pub fn print_toggle_outcome(outcome: &ToggleOutcome, enabled: bool) {
    let verb = if enabled { "Enabled" } else { "Disabled" };
    for id in &outcome.changed {
        println!("  ✓ {} {}", verb, id);
    }
    for diagnostic in outcome.diagnostics.iter() {
        println!("  {} {}", diagnostic.severity().symbol(), diagnostic);
    }
}
