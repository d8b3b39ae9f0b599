//! Wire types for the legal document simplification service
//!
//! These types are used by both:
//! - the Dioxus client (WASM)
//! - native tests of the client's state machine
//!
//! Serializable with serde for JSON over HTTP

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Endpoints & Form Fields
// ============================================================================

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api/v1";

pub const SIMPLIFY_TEXT_PATH: &str = "/simplify";
pub const SIMPLIFY_FILE_PATH: &str = "/simplify-file";
pub const FOLLOW_UP_DOC_ID_PATH: &str = "/query";
pub const FOLLOW_UP_CONTEXT_PATH: &str = "/followup";

pub const FIELD_USER_ROLE_GOAL: &str = "user_role_goal";
pub const FIELD_FILE: &str = "file";

/// Shown when the service answered 2xx but with nothing displayable
pub const NO_RESULT_PLACEHOLDER: &str = "No result";

/// Extensions the file picker offers. Client-side filter only.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "pdf", "docx", "jpg", "jpeg", "png"];

/// Value for the `accept` attribute of the file input
pub fn accept_attribute() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn is_accepted_file_name(name: &str) -> bool {
    let Some((stem, ext)) = name.rsplit_once('.') else {
        return false;
    };
    if stem.is_empty() {
        return false;
    }
    let ext = ext.to_ascii_lowercase();
    ACCEPTED_EXTENSIONS.contains(&ext.as_str())
}

/// Best-effort MIME type for an accepted file name, used when the browser
/// reports none.
pub fn guess_mime(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}

// ============================================================================
// Simplify
// ============================================================================

/// JSON body for the simplify-by-text endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimplifyTextRequest {
    pub document_text: String,
    pub user_role_goal: String,
}

/// Response of both simplify endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SimplifyResponse {
    #[serde(default)]
    pub simplified_document: Option<String>,
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
    /// Opaque; some deployments send it as a number
    #[serde(default, deserialize_with = "opaque_id")]
    pub doc_id: Option<String>,
}

fn opaque_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(id)) => Some(id),
        Some(RawId::Number(id)) => Some(id.to_string()),
        None => None,
    })
}

impl SimplifyResponse {
    /// `simplified_document`, then `detail`, then the placeholder.
    /// Empty strings count as absent.
    pub fn display_text(&self) -> String {
        if let Some(text) = self.simplified_document.as_deref().filter(|t| !t.is_empty()) {
            return text.to_string();
        }
        self.detail
            .as_ref()
            .map(ErrorDetail::message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| NO_RESULT_PLACEHOLDER.to_string())
    }

    pub fn document_id(&self) -> Option<&str> {
        self.doc_id.as_deref().filter(|id| !id.is_empty())
    }
}

// ============================================================================
// Error Detail
// ============================================================================

/// `detail` as sent by the service: a plain message for handled errors, or
/// a list of field errors when request validation fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldError>),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldError {
    pub msg: String,
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,
}

impl FieldError {
    fn describe(&self) -> String {
        let field = self
            .loc
            .iter()
            .rev()
            .find_map(|part| part.as_str())
            .filter(|part| *part != "body");
        match field {
            Some(field) => format!("{field}: {}", self.msg),
            None => self.msg.clone(),
        }
    }
}

impl ErrorDetail {
    pub fn message(&self) -> String {
        match self {
            ErrorDetail::Message(message) => message.clone(),
            ErrorDetail::Fields(fields) => fields
                .iter()
                .map(FieldError::describe)
                .collect::<Vec<_>>()
                .join("; "),
            ErrorDetail::Other(serde_json::Value::Null) => String::new(),
            ErrorDetail::Other(value) => value.to_string(),
        }
    }
}

/// Body of a non-2xx response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

// ============================================================================
// Follow-up
// ============================================================================

/// Payload shape the follow-up endpoint expects
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpContract {
    /// `{query, doc_id}`
    #[default]
    DocId,
    /// `{query, context}`
    Context,
}

impl FollowUpContract {
    pub fn default_path(self) -> &'static str {
        match self {
            FollowUpContract::DocId => FOLLOW_UP_DOC_ID_PATH,
            FollowUpContract::Context => FOLLOW_UP_CONTEXT_PATH,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FollowUpContract::DocId => "doc_id",
            FollowUpContract::Context => "context",
        }
    }
}

impl fmt::Display for FollowUpContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FollowUpContract {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "doc_id" | "doc-id" | "docid" => Ok(Self::DocId),
            "context" => Ok(Self::Context),
            other => Err(format!(
                "Invalid follow-up contract '{other}'. Expected 'doc_id' or 'context'"
            )),
        }
    }
}

/// JSON body for the follow-up endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FollowUpRequest {
    DocId { query: String, doc_id: String },
    Context { query: String, context: String },
}

impl FollowUpRequest {
    pub fn query(&self) -> &str {
        match self {
            FollowUpRequest::DocId { query, .. } | FollowUpRequest::Context { query, .. } => query,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FollowUpResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

impl FollowUpResponse {
    pub fn display_text(&self) -> String {
        if let Some(answer) = self.answer.as_deref().filter(|a| !a.is_empty()) {
            return answer.to_string();
        }
        self.detail
            .as_ref()
            .map(ErrorDetail::message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| NO_RESULT_PLACEHOLDER.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
