//! Progress spinners.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::theme::TezTheme;
use super::SpinnerHandle;

/// A spinner for a running procedure, drawn on stderr.
pub struct ProgressSpinner {
    bar: ProgressBar,
    indent: usize,
    theme: TezTheme,
}

impl ProgressSpinner {
    pub fn new(message: &str, theme: TezTheme) -> Self {
        Self::with_indent(message, 0, theme)
    }

    /// A spinner indented by `indent` spaces (dependency depth).
    pub fn with_indent(message: &str, indent: usize, theme: TezTheme) -> Self {
        let bar = ProgressBar::new_spinner();
        let prefix = " ".repeat(indent);
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template(&format!("{}{{spinner:.cyan}} {{msg}}", prefix))
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self { bar, indent, theme }
    }

    /// A spinner that draws nothing.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            indent: 0,
            theme: TezTheme::plain(),
        }
    }

    fn finish(&mut self, line: String) {
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            self.bar.set_style(style);
        }
        let prefix = " ".repeat(self.indent);
        self.bar.finish_with_message(format!("{}{}", prefix, line));
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.finish(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.finish(line);
    }

    fn finish_skipped(&mut self, msg: &str) {
        let line = self.theme.format_skipped(msg);
        self.finish(line);
    }
}
