//! Notifier and navigator for headless use: everything goes to the log

use crate::domain::{Navigator, Notifier};
use crate::models::{Callout, CalloutKind};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, callout: Callout) {
        match callout.kind {
            CalloutKind::Error => tracing::error!("❌ {}", callout.message_id),
            CalloutKind::Success => tracing::info!("✅ {}", callout.message_id),
            CalloutKind::Info => tracing::info!("{}", callout.message_id),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str, search: Option<&str>) {
        tracing::info!("Navigate to {}{}", path, search.unwrap_or_default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_callout_kind_is_logged() {
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(tracing::Level::TRACE)
                .finish(),
        );

        LogNotifier.notify(Callout::error("ui-quick-marc.record.saveNew.error"));
        LogNotifier.notify(Callout::success("ui-quick-marc.record.saveNew.success"));
        LogNotifier.notify(Callout::info("ui-quick-marc.record.saveNew.delay"));
        LogNavigator.navigate("/inventory/view/xyz", Some("?q=x"));
        LogNavigator.navigate("/inventory/view/id", None);
    }
}
