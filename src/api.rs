//! Wire types for the JSON API: one fixed request/response pair per
//! endpoint, validated field-by-field at deserialization.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub base_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub relative_path: String,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub message: &'static str,
    pub relative_path: String,
    pub full_path: String,
}

/// Body for the status and create endpoints: the absolute path the client
/// previously received from a confirm call, echoed back verbatim.
#[derive(Debug, Deserialize)]
pub struct PathRequest {
    pub full_path: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub exists: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    pub full_path: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
