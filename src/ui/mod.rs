//! Operator-facing output: messages, spinners and themes.
//!
//! The UI is cosmetic. Nothing it does changes how procedures run.
//!
//! # Example
//!
//! ```
//! use tezonator::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_header("build ghostnet");
//! let mut spinner = ui.start_spinner("running make", 0);
//! spinner.finish_success("make");
//! assert_eq!(ui.headers(), ["build ghostnet"]);
//! ```

pub mod mock;
pub mod output;
pub mod progress;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI, SpinnerStatus};
pub use output::OutputMode;
pub use progress::{format_duration, ProgressView};
pub use spinner::ProgressSpinner;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, TezTheme};

/// User interface interactions.
///
/// `Send` so a UI can be driven from inside the executor's progress
/// callback.
pub trait UserInterface: Send {
    fn output_mode(&self) -> OutputMode;

    fn message(&mut self, msg: &str);

    fn success(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    /// Errors are shown in every output mode.
    fn error(&mut self, msg: &str);

    /// Start a spinner indented by `indent` levels.
    fn start_spinner(&mut self, message: &str, indent: usize) -> Box<dyn SpinnerHandle>;

    fn show_header(&mut self, title: &str);

    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle: Send {
    fn set_message(&mut self, msg: &str);

    fn finish_success(&mut self, msg: &str);

    fn finish_error(&mut self, msg: &str);

    fn finish_skipped(&mut self, msg: &str);
}
