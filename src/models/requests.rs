// Command/query request models
// Field names follow the console wire contract (camelCase widget names).

use serde::{Deserialize, Serialize};

use crate::wizard::spec::Role;

// =========================
// Queries
// =========================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassQueryRequest {
    pub school: String,
}

// =========================
// User creation
// =========================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub school: String,
    #[serde(rename = "type")]
    pub role: Role,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail_primary_address: Option<String>,
    pub password: String,
    /// Class labels that were offered in the dropdown at submit time.
    /// The backend cross-checks the chosen value against this list.
    #[serde(default)]
    pub offered_classes: Vec<String>,
}
