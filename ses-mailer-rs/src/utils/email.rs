use crate::error::{MailerError, Result};
use regex::Regex;
use std::sync::OnceLock;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN
        .get_or_init(|| Regex::new(r"^[\w.+-]+@[\w-]+(\.[\w-]+)+$").expect("pattern is well-formed"))
}

/// Basic email address validation
///
/// Accepts either a bare address (`user@example.com`) or an address with a
/// display name (`Name <user@example.com>`); the address part must have a
/// non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> Result<()> {
    let address = extract_address(email);

    if address.is_empty() {
        return Err(MailerError::InvalidEmail("address is empty".to_string()));
    }

    if !email_pattern().is_match(address) {
        return Err(MailerError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

/// Strip a `Name <address>` wrapper down to the bare address, if present
pub fn extract_address(email: &str) -> &str {
    let email = email.trim();
    if let (Some(start), true) = (email.find('<'), email.ends_with('>')) {
        email[start + 1..email.len() - 1].trim()
    } else {
        email
    }
}
