//! Toast-style notifications on stderr

use crate::session::{Notification, NotificationLevel, Notifier};
use colored::*;

/// Notifier writing to stderr
///
/// Info messages are dropped when `show_info` is false; errors always show.
#[derive(Debug, Clone)]
pub struct TerminalNotifier {
    show_info: bool,
}

impl TerminalNotifier {
    pub fn new(show_info: bool) -> Self {
        Self { show_info }
    }

    fn format(notification: &Notification) -> String {
        match notification.level {
            NotificationLevel::Error => format!("{} {}", "✗".red().bold(), notification.message.red()),
            NotificationLevel::Info => {
                let icon = notification.icon.as_deref().unwrap_or("→");
                format!("{} {}", icon, notification.message)
            }
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        if notification.level == NotificationLevel::Info && !self.show_info {
            return;
        }
        eprintln!("{}", Self::format(&notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_info_with_icon() {
        colored::control::set_override(false);
        let text = TerminalNotifier::format(&Notification::info("Link copied to clipboard").with_icon("🔗"));
        assert_eq!(text, "🔗 Link copied to clipboard");
    }

    #[test]
    fn test_format_error() {
        colored::control::set_override(false);
        let text = TerminalNotifier::format(&Notification::error("Please enter a valid TechCrunch article"));
        assert_eq!(text, "✗ Please enter a valid TechCrunch article");
    }
}
