//! User-facing notification seam.
//!
//! The coordinator reports unrecoverable playback failures here instead of
//! returning errors into the store layer. Embedders decide what a
//! notification looks like; the default routes to the log.

pub trait Notifier {
    fn notify_error(&self, message: &str);
    fn notify_success(&self, message: &str);
}

/// Routes notifications to the `log` facade.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_error(&self, message: &str) {
        log::error!("{message}");
    }

    fn notify_success(&self, message: &str) {
        log::info!("{message}");
    }
}
