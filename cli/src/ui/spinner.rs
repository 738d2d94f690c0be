use indicatif::{ProgressBar, ProgressStyle};
use std::{io::IsTerminal, time::Duration};

/// A spinner line that clears itself when dropped.
/// Works in TTY only; no output when stderr isn't a TTY.
pub struct Spinner(Option<ProgressBar>);

impl Spinner {
    pub fn start(msg: impl Into<String>) -> Self {
        if !std::io::stderr().is_terminal() {
            return Self(None);
        }
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.set_message(msg.into());
        pb.enable_steady_tick(Duration::from_millis(80));
        Self(Some(pb))
    }

    /// Hide the spinner while `print` writes to the terminal.
    pub fn suspend<F: FnOnce() -> R, R>(&self, print: F) -> R {
        match &self.0 {
            Some(pb) => pb.suspend(print),
            None => print(),
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(pb) = self.0.take() {
            pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspend_runs_output_with_and_without_bar() {
        let visible = Spinner(Some(ProgressBar::hidden()));
        assert_eq!(visible.suspend(|| 7), 7);

        let headless = Spinner(None);
        assert_eq!(headless.suspend(|| "printed"), "printed");
    }
}
