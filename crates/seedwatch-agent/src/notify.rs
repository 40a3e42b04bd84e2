//! Operator notification seam.
//!
//! The core reports every failure exactly once and does not de-duplicate
//! repeats across ticks; whatever widget or surface shows the message is the
//! embedder's concern.

/// Weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Successful outcome worth telling the operator about.
    Info,
    /// Degraded but expected condition (e.g. offline).
    Warning,
    /// Failed operation.
    Error,
}

/// Sink for operator-facing notifications.
pub trait Notifier: Send + Sync {
    /// Deliver one notification. Implementations must not block.
    fn notify(&self, severity: Severity, message: &str);
}

/// [`Notifier`] that forwards notifications to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
    }
}
