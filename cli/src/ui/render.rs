use super::spinner::Spinner;
use chrono::Local;
use coinsight_agent::{AssetQuote, MarketSnapshot, Message, Role, SessionView, PLACEHOLDER};
use dialoguer::console::style;
use tracing::info;

const FEED_ERROR: &str = "Error fetching data";

/// Prints session views as they change.
///
/// Each finalised message is printed once. The pending placeholder is shown
/// as a spinner instead.
pub struct TerminalRenderer {
    rendered: usize,
    seen: MarketSnapshot,
    printed: Option<MarketSnapshot>,
    spinner: Option<Spinner>,
}

impl TerminalRenderer {
    /// `initial` is the view at session start. Its snapshot is the
    /// pre-fetch placeholder and is not printed.
    pub fn new(initial: &SessionView) -> Self {
        Self {
            rendered: 0,
            seen: initial.snapshot.clone(),
            printed: None,
            spinner: None,
        }
    }

    pub fn render(&mut self, view: &SessionView) {
        let pending = view.pending_index().is_some();
        if !pending {
            self.spinner = None;
        }

        let lines = self.updates(view);
        let print = || {
            for line in &lines {
                info!(target: "plain", "{line}");
            }
        };
        match &self.spinner {
            Some(spinner) => spinner.suspend(print),
            None => print(),
        }

        if pending && self.spinner.is_none() {
            self.spinner = Some(Spinner::start(PLACEHOLDER));
        }
    }

    /// Lines to print for `view`, advancing the renderer's position.
    fn updates(&mut self, view: &SessionView) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(ticker) = self.ticker_update(&view.snapshot) {
            lines.push(ticker);
        }

        let end = view.pending_index().unwrap_or(view.transcript.len());
        if self.rendered < end {
            lines.extend(view.transcript[self.rendered..end].iter().map(format_message));
            self.rendered = end;
        }

        lines
    }

    fn ticker_update(&mut self, snapshot: &MarketSnapshot) -> Option<String> {
        if snapshot.ptr_eq(&self.seen) {
            return None;
        }
        self.seen = snapshot.clone();

        if let Some(printed) = &self.printed {
            if printed.quotes() == snapshot.quotes() {
                return None;
            }
        }
        self.printed = Some(snapshot.clone());
        Some(format_ticker(snapshot))
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "User",
        Role::System => "Bot",
    }
}

fn format_message(message: &Message) -> String {
    let label = role_label(message.role());
    let label = match message.role() {
        Role::User => style(label).cyan().bold(),
        Role::System => style(label).magenta().bold(),
    };
    let time = message.sent_at().with_timezone(&Local).format("%H:%M");
    format!("{label} {}\n{}\n", style(time).dim(), message.content())
}

/// `[14:05:09] Bitcoin (BTC): $65000  |  ...`, stamped with the refresh time.
fn format_ticker(snapshot: &MarketSnapshot) -> String {
    let stamp = snapshot.as_of().with_timezone(&Local).format("%H:%M:%S");
    let stamp = style(format!("[{stamp}]")).dim();
    if snapshot.is_empty() {
        return format!("{stamp} {}", style(FEED_ERROR).red());
    }
    let line = snapshot
        .quotes()
        .iter()
        .map(AssetQuote::to_string)
        .collect::<Vec<_>>()
        .join("  |  ");
    format!("{stamp} {}", style(line).dim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinsight_agent::{ChatController, GREETING};

    fn bitcoin(price: f64) -> MarketSnapshot {
        MarketSnapshot::new(vec![AssetQuote::new("bitcoin", "Bitcoin", "btc", price)])
    }

    #[test]
    fn test_greeting_printed_once() {
        let controller = ChatController::new();
        let view = controller.view();
        let mut renderer = TerminalRenderer::new(&view);

        let lines = renderer.updates(&view);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Bot"));
        assert!(lines[0].contains(GREETING));
        assert!(renderer.updates(&view).is_empty());
    }

    #[test]
    fn test_placeholder_is_skipped_until_resolved() {
        let mut controller = ChatController::new();
        let mut renderer = TerminalRenderer::new(&controller.view());
        renderer.updates(&controller.view());

        let dispatch = controller.submit("Should I buy bitcoin?".to_string()).unwrap();
        let lines = renderer.updates(&controller.view());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("User"));
        assert!(lines[0].contains("Should I buy bitcoin?"));

        controller.resolve(dispatch.exchange, Ok("Maybe.".to_string()));
        let lines = renderer.updates(&controller.view());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Maybe."));
        assert!(!lines[0].contains(PLACEHOLDER));
    }

    #[test]
    fn test_ticker_printed_on_change_only() {
        let mut controller = ChatController::new();
        let mut renderer = TerminalRenderer::new(&controller.view());
        assert_eq!(renderer.updates(&controller.view()).len(), 1);

        controller.apply_snapshot(bitcoin(65000.0));
        let lines = renderer.updates(&controller.view());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Bitcoin (BTC): $65000"));

        controller.apply_snapshot(bitcoin(65000.0));
        assert!(renderer.updates(&controller.view()).is_empty());

        controller.apply_snapshot(bitcoin(64000.0));
        assert!(renderer.updates(&controller.view())[0].contains("$64000"));
    }

    #[test]
    fn test_empty_snapshot_reports_error_once() {
        let mut controller = ChatController::new();
        let mut renderer = TerminalRenderer::new(&controller.view());
        renderer.updates(&controller.view());

        controller.apply_snapshot(MarketSnapshot::empty());
        let lines = renderer.updates(&controller.view());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(FEED_ERROR));

        controller.apply_snapshot(MarketSnapshot::empty());
        assert!(renderer.updates(&controller.view()).is_empty());
    }

    #[test]
    fn test_ticker_carries_refresh_time() {
        let snapshot = bitcoin(65000.0);
        let stamp = snapshot.as_of().with_timezone(&Local).format("%H:%M:%S").to_string();

        assert!(format_ticker(&snapshot).contains(&stamp));
        assert!(format_ticker(&MarketSnapshot::empty()).contains(FEED_ERROR));
    }

    #[test]
    fn test_spinner_lifecycle_follows_pending_exchange() {
        let mut controller = ChatController::new();
        let mut renderer = TerminalRenderer::new(&controller.view());
        renderer.render(&controller.view());
        assert!(renderer.spinner.is_none());

        let dispatch = controller.submit("hi".to_string()).unwrap();
        renderer.render(&controller.view());
        assert!(renderer.spinner.is_some());

        // Printed while the spinner is active
        controller.apply_snapshot(bitcoin(65000.0));
        renderer.render(&controller.view());
        assert!(renderer.spinner.is_some());
        assert!(renderer.printed.is_some());
        assert_eq!(renderer.rendered, 2);

        controller.resolve(dispatch.exchange, Ok("Hold.".to_string()));
        renderer.render(&controller.view());
        assert!(renderer.spinner.is_none());
        assert_eq!(renderer.rendered, 3);
    }
}
