//! Email delivery collaborator
//!
//! The OTP paths need exactly one capability: send a message to one
//! address. The transport is injected through [`EmailSender`]; a send
//! failure is surfaced to the caller (the code is already stored, so
//! delivery can be retried) and never rolls issuance back.

use async_trait::async_trait;
use std::sync::Arc;

/// Single-capability delivery seam
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}

/// Delivery failure, carrying the transport error message
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct EmailError(pub String);

pub type SharedMailer = Arc<dyn EmailSender>;

/// Development/default transport: writes the message to the log.
///
/// Production deployments plug a real SMTP/API transport behind the
/// same trait; the OTP code path does not change.
pub struct LogMailer;

#[async_trait]
impl EmailSender for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        tracing::info!(to = %to, subject = %subject, body = %body, "Email (log transport)");
        Ok(())
    }
}

/// Subject/body templates used by the two OTP flows
pub mod templates {
    /// Login OTP mail
    pub fn login_otp(code: &str) -> (String, String) {
        (
            "Your OTP for Login".to_string(),
            format!("Your OTP is: {code}"),
        )
    }

    /// Checkout OTP mail
    pub fn checkout_otp(code: &str) -> (String, String) {
        (
            "Your OTP Code".to_string(),
            format!("Your OTP is {code}. It expires in 5 minutes."),
        )
    }
}
