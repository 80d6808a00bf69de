// Command/query response models

use serde::{Deserialize, Serialize};

// =========================
// Generic envelope (matches the console's JSON responses)
// =========================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmcResponse<T> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> UmcResponse<T> {
    pub fn ok(result: T) -> Self {
        Self {
            status: 200,
            result: Some(result),
            message: None,
        }
    }

    pub fn fail(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            result: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =========================
// Query results
// =========================

/// One entry of a `schoolwizards/classes` or `schoolwizards/schools` result.
/// Only `label` is surfaced to dropdowns; `id` is the backend identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionEntryDto {
    pub id: String,
    pub label: String,
}

// =========================
// User creation
// =========================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUserDto {
    /// Distinguished name of the created record, used for the record link in
    /// edit mode.
    pub dn: String,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_round_trips_class_list() {
        let body = r#"{"status":200,"result":[{"id":"cn=1a","label":"1a"},{"id":"cn=1b","label":"1b"}]}"#;
        let resp: UmcResponse<Vec<OptionEntryDto>> = serde_json::from_str(body).unwrap();
        assert!(resp.is_success());
        let labels: Vec<&str> = resp
            .result
            .as_ref()
            .unwrap()
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(labels, vec!["1a", "1b"]);
    }

    #[test]
    fn failure_envelope_carries_message() {
        let resp: UmcResponse<Vec<OptionEntryDto>> = UmcResponse::fail(500, "LDAP unavailable");
        assert!(!resp.is_success());
        assert_eq!(resp.message.as_deref(), Some("LDAP unavailable"));
    }
}
