// Console command/query boundary
//
// The wizard never talks HTTP directly; it goes through the UmcConnection
// trait so hosts can inject a real console client, and tests a deterministic
// stub, without touching wizard logic.

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::models::requests::{ClassQueryRequest, CreateUserRequest};
use crate::models::responses::{CreatedUserDto, OptionEntryDto, UmcResponse};
use crate::utils::logging::mask_payload_secrets;

pub const SCHOOL_QUERY_PATH: &str = "schoolwizards/schools";
pub const CLASS_QUERY_PATH: &str = "schoolwizards/classes";
pub const CREATE_USER_PATH: &str = "schoolwizards/users/create";

/// Error returned by command/query attempts.
/// Keeps user-friendly messages separate from internal details.
#[derive(Debug, Clone)]
pub struct CommandError {
    /// User-friendly message (safe to show in the wizard)
    pub user_message: String,
    /// Internal details for logging (may contain masked info)
    pub internal_details: String,
}

impl CommandError {
    fn transport(details: impl Into<String>) -> Self {
        Self {
            user_message: "The console backend could not be reached. Check the connection."
                .to_string(),
            internal_details: details.into(),
        }
    }

    fn rejected(status: u16, message: Option<String>) -> Self {
        Self {
            user_message: message
                .unwrap_or_else(|| "The console backend rejected the request.".to_string()),
            internal_details: format!("Backend returned status {}", status),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.user_message)
    }
}

impl std::error::Error for CommandError {}

/// Trait for console command/query calls.
/// Production code uses HttpUmcConnection; tests use scripted stubs.
#[async_trait]
pub trait UmcConnection: Send + Sync {
    /// `schoolwizards/schools` query: all schools this operator may manage.
    async fn list_schools(&self) -> Result<Vec<OptionEntryDto>, CommandError>;

    /// `schoolwizards/classes` query: classes of one school, backend order.
    async fn list_classes(&self, school: &str) -> Result<Vec<OptionEntryDto>, CommandError>;

    /// `schoolwizards/users/create` command.
    async fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> Result<CreatedUserDto, CommandError>;
}

// =============================================================================
// HTTP implementation
// =============================================================================

pub struct HttpUmcConnection {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpUmcConnection {
    pub fn new(base_url: Url, request_timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self { base_url, client })
    }

    async fn command<Req: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &Req,
    ) -> Result<T, CommandError> {
        let url = self
            .base_url
            .join(&format!("command/{}", path))
            .map_err(|e| CommandError::transport(format!("Invalid command URL: {}", e)))?;

        let body = serde_json::to_value(payload)
            .map_err(|e| CommandError::transport(format!("Payload serialization: {}", e)))?;
        debug!(
            "[PHASE: backend] [STEP: command] {} payload: {}",
            path,
            mask_payload_secrets(&body)
        );

        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CommandError {
                        user_message:
                            "The console backend did not answer in time. Try again later."
                                .to_string(),
                        internal_details: format!("Timeout on {}: {}", path, e),
                    }
                } else {
                    CommandError::transport(format!("Request to {} failed: {}", path, e))
                }
            })?;

        let status = resp.status();
        let envelope: UmcResponse<T> = resp
            .json()
            .await
            .map_err(|e| CommandError::transport(format!("Malformed response from {}: {}", path, e)))?;

        if !status.is_success() || !envelope.is_success() {
            return Err(CommandError::rejected(envelope.status, envelope.message));
        }

        envelope.result.ok_or_else(|| {
            CommandError::transport(format!("Response from {} carried no result", path))
        })
    }
}

#[async_trait]
impl UmcConnection for HttpUmcConnection {
    async fn list_schools(&self) -> Result<Vec<OptionEntryDto>, CommandError> {
        self.command(SCHOOL_QUERY_PATH, &serde_json::json!({})).await
    }

    async fn list_classes(&self, school: &str) -> Result<Vec<OptionEntryDto>, CommandError> {
        let payload = ClassQueryRequest {
            school: school.to_string(),
        };
        self.command(CLASS_QUERY_PATH, &payload).await
    }

    async fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> Result<CreatedUserDto, CommandError> {
        self.command(CREATE_USER_PATH, request).await
    }
}

// =============================================================================
// Demo implementation — explicitly labeled, no backend required.
// Used by the smoke runners to exercise the full wizard flow deterministically.
// =============================================================================

pub struct DemoConnection {
    school_label: String,
}

impl DemoConnection {
    pub fn new(school_label: impl Into<String>) -> Self {
        Self {
            school_label: school_label.into(),
        }
    }
}

#[async_trait]
impl UmcConnection for DemoConnection {
    async fn list_schools(&self) -> Result<Vec<OptionEntryDto>, CommandError> {
        Ok(vec![OptionEntryDto {
            id: self.school_label.clone(),
            label: self.school_label.clone(),
        }])
    }

    async fn list_classes(&self, school: &str) -> Result<Vec<OptionEntryDto>, CommandError> {
        Ok(["1a", "1b", "2a"]
            .iter()
            .map(|label| OptionEntryDto {
                id: format!("cn={},ou={}", label, school),
                label: label.to_string(),
            })
            .collect())
    }

    async fn create_user(
        &self,
        request: &CreateUserRequest,
    ) -> Result<CreatedUserDto, CommandError> {
        Ok(CreatedUserDto {
            dn: format!("uid={},ou={}", request.username, request.school),
            username: request.username.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_connection_lists_classes_in_order() {
        let conn = DemoConnection::new("Example School");
        let classes = conn.list_classes("Example School").await.unwrap();
        let labels: Vec<&str> = classes.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["1a", "1b", "2a"]);
    }

    #[test]
    fn command_error_display_is_user_friendly() {
        // INTENT: Prove that CommandError Display shows the user message only.
        let err = CommandError {
            user_message: "The console backend rejected the request.".to_string(),
            internal_details: "Backend returned status 500".to_string(),
        };
        let displayed = format!("{}", err);
        assert_eq!(displayed, "The console backend rejected the request.");
        assert!(!displayed.contains("500"));
    }

    #[test]
    fn command_error_is_send_sync() {
        // INTENT: Prove CommandError can cross the wizard message channel.
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CommandError>();
    }
}
