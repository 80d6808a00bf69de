// Input validation utilities

use anyhow::Result;
use regex::Regex;

/// Validate a login name before it is sent to the create command.
///
/// The backend enforces the full policy; this catches the values that would
/// be rejected anyway so the page can block advancement early.
pub fn validate_username(name: &str) -> Result<()> {
    let s = name.trim();
    if s.is_empty() {
        return Err(anyhow::anyhow!("Username is required"));
    }

    if s.len() > 64 {
        return Err(anyhow::anyhow!("Username cannot exceed 64 characters"));
    }

    let ident_re = Regex::new(r"^[A-Za-z][A-Za-z0-9._-]*$").map_err(|e| {
        anyhow::anyhow!("Internal error: failed to compile username regex: {}", e)
    })?;
    if !ident_re.is_match(s) {
        return Err(anyhow::anyhow!(
            "Username must start with a letter and contain only letters, digits, '.', '_' or '-'"
        ));
    }

    Ok(())
}

/// Validate an e-mail address (optional field; empty is handled by the caller).
pub fn validate_email(address: &str) -> Result<()> {
    let s = address.trim();
    if s.is_empty() {
        return Err(anyhow::anyhow!("E-Mail address is empty"));
    }

    // Deliberately loose: one '@', non-empty local part, dotted domain.
    let mail_re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .map_err(|e| anyhow::anyhow!("Internal error: failed to compile mail regex: {}", e))?;
    if !mail_re.is_match(s) {
        return Err(anyhow::anyhow!("'{}' is not a valid e-mail address", s));
    }

    Ok(())
}

/// Validate the paired password inputs. Both entries must be present and
/// identical before the page may advance.
pub fn validate_password_pair(first: &str, second: &str) -> Result<()> {
    if first.is_empty() {
        return Err(anyhow::anyhow!("Password is required"));
    }
    if first != second {
        return Err(anyhow::anyhow!("Passwords do not match"));
    }
    Ok(())
}
