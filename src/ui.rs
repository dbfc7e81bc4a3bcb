use colored::Colorize;
use declarative::{Event, EventKind, EventSink};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Symbol printed in front of a lifecycle event
fn event_symbol(kind: EventKind) -> colored::ColoredString {
    match kind {
        EventKind::Check => "ℹ".blue(),
        EventKind::Create | EventKind::Update | EventKind::Sync => "→".cyan(),
        EventKind::Remove => "✗".red(),
        EventKind::Unchanged | EventKind::Recovered => "✓".green(),
        EventKind::Record => "•".dimmed(),
    }
}

/// Terminal sink for lifecycle events.
///
/// Every event is logged at debug level; `quiet` suppresses terminal output.
pub struct UiSink {
    quiet: bool,
}

impl UiSink {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl EventSink for UiSink {
    fn emit(&mut self, event: Event) {
        log::debug!(
            "[{}] {:?}: {}",
            event.resource_id,
            event.kind,
            event.message
        );
        if self.quiet {
            return;
        }

        if event.kind == EventKind::Record {
            dim(&event.message);
        } else {
            println!("{} {}", event_symbol(event.kind), event.message);
        }
    }
}

/// Format an optional value for display
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some("1")), "1");
        assert_eq!(or_dash(None), "-");
    }

    #[test]
    fn test_quiet_sink_accepts_events() {
        let mut sink = UiSink::new(true);
        sink.event("doc", EventKind::Create, "Creating doc");
    }

    #[test]
    fn test_event_symbols_differ_by_kind() {
        colored::control::set_override(false);
        assert_eq!(event_symbol(EventKind::Create).to_string(), "→");
        assert_eq!(event_symbol(EventKind::Unchanged).to_string(), "✓");
        assert_eq!(event_symbol(EventKind::Remove).to_string(), "✗");
    }
}
