//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on:
//! - Reasonable UX limits for names, codes and messages
//! - SQLite TEXT has no built-in length enforcement

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: item, member, family code, area
pub const MAX_NAME_LEN: usize = 200;

/// Notification message text
pub const MAX_MESSAGE_LEN: usize = 500;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Aadhar numbers are 12 digits
pub const AADHAR_LEN: usize = 12;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate an aadhar number: exactly 12 ASCII digits.
pub fn validate_aadhar(value: &str) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.len() != AADHAR_LEN || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(
            "aadhar_number must be exactly 12 digits",
        ));
    }
    Ok(())
}

/// Validate an email address: single `@` with non-empty sides.
///
/// Deliverability is the mailer's problem; this only rejects obvious typos.
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::validation(format!("invalid email: {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_empty_and_oversize() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(300), "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Rice", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn aadhar_must_be_12_digits() {
        assert!(validate_aadhar("123456789012").is_ok());
        assert!(validate_aadhar(" 123456789012 ").is_ok());
        assert!(validate_aadhar("12345678901").is_err());
        assert!(validate_aadhar("12345678901a").is_err());
    }

    #[test]
    fn email_needs_local_and_dotted_domain() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("@b.com").is_err());
        assert!(validate_email("a.b.com").is_err());
    }
}
