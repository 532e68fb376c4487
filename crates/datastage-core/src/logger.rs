//! Logging capability injected by the host.
//!
//! The materializer reports its user-visible steps through this trait rather
//! than a concrete logger, so the host that triggers activation decides where
//! the messages surface.

/// Reporting surface for the activation sequence.
pub trait ActivationLog {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards messages to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacadeLog;

impl ActivationLog for FacadeLog {
    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}
