// Logging utilities
// Structured logging with JSON and human-readable formats

use log::Level;
use serde_json::{json, Value};

/// Mask sensitive data in logs
pub fn mask_sensitive(input: &str) -> String {
    if input.len() <= 8 {
        return "***".to_string();
    }

    let visible = 4;
    let start = &input[..visible.min(input.len())];
    let end = &input[input.len().saturating_sub(visible)..];

    format!("{}...{}", start, end)
}

/// Mask secret values inside a command payload before it is logged.
///
/// Command payloads are logged verbatim for troubleshooting, so every key
/// that carries a credential must be blanked. Login names stay partially
/// visible; they are needed to correlate a transcript with a record.
pub fn mask_payload_secrets(payload: &Value) -> Value {
    match payload {
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, value) in map {
                let norm_key = key.to_ascii_lowercase().replace(['-', '_'], "");
                if norm_key == "password" || norm_key == "pwd" {
                    out.insert(key.clone(), json!("***"));
                } else if norm_key == "username" || norm_key == "uid" {
                    match value.as_str() {
                        Some(s) => out.insert(key.clone(), json!(mask_sensitive(s))),
                        None => out.insert(key.clone(), value.clone()),
                    };
                } else {
                    out.insert(key.clone(), mask_payload_secrets(value));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(mask_payload_secrets).collect()),
        other => other.clone(),
    }
}

/// Parse phase and step from log message
/// Extracts [PHASE: ...] and [STEP: ...] patterns
pub fn parse_log_metadata(message: &str) -> (Option<String>, Option<String>, String) {
    let mut phase = None;
    let mut step = None;
    let mut cleaned_message = message.to_string();

    // Extract [PHASE: ...]
    if let Some(start) = message.find("[PHASE:") {
        if let Some(end) = message[start..].find(']') {
            let phase_str = &message[start + 7..start + end].trim();
            phase = Some(phase_str.to_string());
            cleaned_message = format!("{} {}", &message[..start], &message[start + end + 1..])
                .trim()
                .to_string();
        }
    }

    // Extract [STEP: ...]
    if let Some(start) = cleaned_message.find("[STEP:") {
        if let Some(end) = cleaned_message[start..].find(']') {
            let step_str = &cleaned_message[start + 6..start + end].trim();
            step = Some(step_str.to_string());
            cleaned_message = format!(
                "{} {}",
                &cleaned_message[..start],
                &cleaned_message[start + end + 1..]
            )
            .trim()
            .to_string();
        }
    }

    (phase, step, cleaned_message)
}

/// Format log entry as JSON for structured logging
pub fn format_json_log(
    timestamp: &str,
    level: Level,
    target: &str,
    message: &str,
    phase: Option<&str>,
    step: Option<&str>,
) -> String {
    let mut log_entry = json!({
        "timestamp": timestamp,
        "level": level.as_str(),
        "target": target,
        "message": message,
    });

    if let Some(phase) = phase {
        log_entry["phase"] = json!(phase);
    }

    if let Some(step) = step {
        log_entry["step"] = json!(step);
    }

    serde_json::to_string(&log_entry).unwrap_or_else(|_| "{}".to_string())
}

/// Format log entry as human-readable text
pub fn format_human_readable_log(
    timestamp: &str,
    level: Level,
    target: &str,
    message: &str,
    phase: Option<&str>,
    step: Option<&str>,
) -> String {
    let mut log_line = format!("[{}] [{}]", timestamp, level.as_str());

    if let Some(phase) = phase {
        log_line.push_str(&format!(" [PHASE: {}]", phase));
    }

    if let Some(step) = step {
        log_line.push_str(&format!(" [STEP: {}]", step));
    }

    log_line.push_str(&format!(" [{}] {}", target, message));
    log_line
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Secret masking - payloads (lock down "no secrets leak" rule)
    // -------------------------------------------------------------------------

    #[test]
    fn mask_payload_blanks_password() {
        let payload = json!({
            "username": "ada.lovelace",
            "password": "PASSWORD_SHOULD_BE_REDACTED",
            "school": "Example School",
        });
        let masked = mask_payload_secrets(&payload);

        assert_eq!(masked["password"], "***");
        assert!(
            !masked.to_string().contains("PASSWORD_SHOULD_BE_REDACTED"),
            "Raw password leaked: {}",
            masked
        );
        // School stays visible for troubleshooting
        assert_eq!(masked["school"], "Example School");
    }

    #[test]
    fn mask_payload_recurses_into_nested_values() {
        let payload = json!({
            "options": [{"password": "deep-secret"}],
            "flavor": {"pwd": "deeper-secret"},
        });
        let masked = mask_payload_secrets(&payload);

        assert_eq!(masked["options"][0]["password"], "***");
        assert_eq!(masked["flavor"]["pwd"], "***");
    }

    #[test]
    fn mask_payload_partially_masks_username() {
        let payload = json!({"username": "administrator"});
        let masked = mask_payload_secrets(&payload);

        let shown = masked["username"].as_str().unwrap();
        assert!(shown.contains("..."), "Username should be shortened: {}", shown);
        assert!(!shown.contains("administrator"), "Full user leaked: {}", shown);
    }

    #[test]
    fn mask_sensitive_short_values_fully_masked() {
        assert_eq!(mask_sensitive("abc"), "***");
        assert_eq!(mask_sensitive("12345678"), "***");
    }

    #[test]
    fn mask_sensitive_long_values_partially_masked() {
        let masked = mask_sensitive("abcdefghijklmnop");
        assert!(masked.starts_with("abcd"), "Start should be visible: {}", masked);
        assert!(masked.ends_with("mnop"), "End should be visible: {}", masked);
    }

    // -------------------------------------------------------------------------
    // Metadata parsing
    // -------------------------------------------------------------------------

    #[test]
    fn parse_metadata_extracts_phase_and_step() {
        let (phase, step, cleaned) =
            parse_log_metadata("[PHASE: submit] [STEP: create_user] sending command");
        assert_eq!(phase.as_deref(), Some("submit"));
        assert_eq!(step.as_deref(), Some("create_user"));
        assert_eq!(cleaned, "sending command");
    }

    #[test]
    fn parse_metadata_plain_message_unchanged() {
        let (phase, step, cleaned) = parse_log_metadata("nothing structured here");
        assert!(phase.is_none());
        assert!(step.is_none());
        assert_eq!(cleaned, "nothing structured here");
    }

    #[test]
    fn human_readable_line_includes_markers() {
        let line = format_human_readable_log(
            "2026-01-01 12:00:00",
            Level::Info,
            "school_wizards",
            "page shown",
            Some("navigation"),
            None,
        );
        assert!(line.contains("[PHASE: navigation]"));
        assert!(line.contains("page shown"));
    }
}
