//! Best-effort email notification
//!
//! A [`NotificationDispatcher`] reports delivery outcome as `Ok(bool)`;
//! only a malformed message is an `Err`. Callers treat `Ok(false)` as
//! "logged and forgotten".

pub mod message;
pub mod resend;

use async_trait::async_trait;
use thiserror::Error;

pub use message::EmailMessage;
pub use resend::ResendDispatcher;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Invalid recipient: {0:?}")]
    InvalidRecipient(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

/// Sends one email per call
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// `Ok(true)` when the provider accepted the message, `Ok(false)` on any
    /// delivery failure.
    async fn dispatch(&self, message: &EmailMessage) -> Result<bool, NotifyError>;
}

/// Dispatcher used when email is switched off; validates, then drops
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledDispatcher;

#[async_trait]
impl NotificationDispatcher for DisabledDispatcher {
    async fn dispatch(&self, message: &EmailMessage) -> Result<bool, NotifyError> {
        message.validate()?;
        tracing::debug!(to = %message.to, "Email disabled, not sending");
        Ok(false)
    }
}
