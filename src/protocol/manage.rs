//! Data model for the project management endpoints: projects, API keys,
//! members, usage, and balances. All of these are plain REST resources.

use serde::{Deserialize, Serialize};

use super::ArbitraryJson;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Project {
    pub project_id: String,
    #[serde(default)]
    pub name: String,
    pub company: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProjectsResponse {
    pub projects: Vec<Project>,
}

/// Fields a project PATCH may change. Leave a field `None` to keep it.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Generic acknowledgement body returned by mutating endpoints.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct KeyDetails {
    pub api_key_id: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub created: String,
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A key together with the member who owns it, as the list endpoint returns
/// them.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProjectKey {
    pub member: Option<Member>,
    pub api_key: KeyDetails,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct KeysResponse {
    pub api_keys: Vec<ProjectKey>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CreateKeyRequest {
    pub comment: String,
    pub scopes: Vec<String>,
    /// RFC 3339 timestamp. Mutually exclusive with `time_to_live_in_seconds`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_live_in_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// The create response is the only place the secret `key` is ever visible.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CreatedKey {
    pub api_key_id: String,
    pub key: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub created: String,
    pub expiration_date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Member {
    pub member_id: String,
    #[serde(default)]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MembersResponse {
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct UsageRequestsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UsageRequest {
    pub request_id: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub path: String,
    pub api_key_id: Option<String>,
    /// Endpoint-specific detail blob; its shape varies by product.
    pub response: Option<ArbitraryJson>,
    pub callback: Option<ArbitraryJson>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UsageRequestsResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    pub requests: Vec<UsageRequest>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct UsageSummaryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UsageSummaryResponse {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub resolution: ArbitraryJson,
    #[serde(default)]
    pub results: Vec<ArbitraryJson>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UsageFieldsResponse {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub models: Vec<ArbitraryJson>,
    #[serde(default)]
    pub processing_methods: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Balance {
    pub balance_id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub purchase_order_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BalancesResponse {
    pub balances: Vec<Balance>,
}
