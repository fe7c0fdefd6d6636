//! Rendering executor progress.

use std::time::Duration;

use crate::runner::RunProgress;

use super::{SpinnerHandle, UserInterface};

/// Format a duration for display.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}

/// Turns [`RunProgress`] events into spinners and status lines.
///
/// Actions never overlap, so at most one spinner is live at a time.
pub struct ProgressView<'u> {
    ui: &'u mut dyn UserInterface,
    active: Option<(String, Box<dyn SpinnerHandle>)>,
}

impl<'u> ProgressView<'u> {
    pub fn new(ui: &'u mut dyn UserInterface) -> Self {
        Self { ui, active: None }
    }

    /// Handle one event.
    pub fn on_event(&mut self, event: RunProgress<'_>) {
        match event {
            RunProgress::SkipChecked { id, skip, depth } => {
                if skip {
                    let mut spinner = self.ui.start_spinner(id, depth);
                    spinner.finish_skipped(&format!("{} (already done)", id));
                } else if self.ui.output_mode().shows_skip_checks() {
                    self.ui.message(&format!("can skip {}? no", id));
                }
            }
            RunProgress::Started { id, depth } => {
                let spinner = self.ui.start_spinner(&format!("running {}", id), depth);
                self.active = Some((id.to_string(), spinner));
            }
            RunProgress::Finished { id, duration, .. } => {
                if let Some((_, mut spinner)) = self.active.take() {
                    spinner.finish_success(&format!("{} ({})", id, format_duration(duration)));
                }
            }
            RunProgress::Deduplicated { id, .. } => {
                if self.ui.output_mode().shows_skip_checks() {
                    self.ui.message(&format!("{} already resolved", id));
                }
            }
            RunProgress::Failed { id, depth, .. } => {
                let mut spinner = match self.active.take() {
                    Some((active, spinner)) if active == id => spinner,
                    _ => self.ui.start_spinner(id, depth),
                };
                spinner.finish_error(id);
            }
        }
    }
}
