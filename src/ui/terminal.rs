//! Terminal UI.

use std::io::Write;

use console::Term;

use super::{OutputMode, ProgressSpinner, SpinnerHandle, TezTheme, UserInterface};

/// UI writing to stderr; stdout is left for command output such as
/// `tez networks` and shell completions.
pub struct TerminalUI {
    term: Term,
    theme: TezTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode, no_color: bool) -> Self {
        Self {
            term: Term::stderr(),
            theme: TezTheme::for_terminal(no_color),
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
        }
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn start_spinner(&mut self, message: &str, indent: usize) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() && self.term.is_term() {
            Box::new(ProgressSpinner::with_indent(
                message,
                indent * 2,
                self.theme.clone(),
            ))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}
