//! Errors surfaced to the user
//!
//! Every failure path in the client ends in one of these, caught at the
//! controller boundary and shown as a dismissible notice.

use demystifier_types::{ErrorBody, ACCEPTED_EXTENSIONS};
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please describe your role or goal (e.g. Tenant, Freelancer).")]
    MissingRoleGoal,

    #[error("Paste a document or choose a file to simplify.")]
    MissingDocument,

    #[error("Type a question before asking.")]
    EmptyQuery,

    #[error("Simplify a document before asking follow-up questions.")]
    NoDocumentScope,

    #[error("'{name}' is not a supported file type ({allowed}).", allowed = ACCEPTED_EXTENSIONS.join(", "))]
    UnsupportedFile { name: String },

    #[error("Could not read the selected file: {0}")]
    UnreadableFile(String),

    #[error("The selected file is still being read.")]
    FileReadPending,

    #[error("A document is already being simplified.")]
    SubmitInFlight,

    #[error("A follow-up question is already being answered.")]
    FollowUpInFlight,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Connectivity failure or a request that could not be sent
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx answer, or a body the client could not decode
    #[error("{}", describe_server_error(.status, .detail))]
    Server { status: u16, detail: Option<String> },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    /// Short heading for the notice banner
    pub fn title(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "Connection problem",
            ClientError::Server { .. } => "Service error",
            ClientError::Validation(_) => "Check your input",
        }
    }
}

fn describe_server_error(status: &u16, detail: &Option<String>) -> String {
    match detail.as_deref() {
        Some(detail) if !detail.trim().is_empty() => format!("HTTP error: {status} ({detail})"),
        _ => format!("HTTP error: {status}"),
    }
}

/// Decode a response body, mapping non-2xx statuses to [`ClientError::Server`]
/// with the service's `detail` when it sent one.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ClientError> {
    if (200..300).contains(&status) {
        return serde_json::from_str(body).map_err(|e| ClientError::Server {
            status,
            detail: Some(format!("Failed to parse JSON: {e}")),
        });
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Server {
            status,
            detail: None,
        });
    }

    let detail = match serde_json::from_str::<ErrorBody>(trimmed) {
        Ok(ErrorBody {
            detail: Some(detail),
        }) => detail.message(),
        _ => trimmed.to_string(),
    };

    Err(ClientError::Server {
        status,
        detail: Some(detail),
    })
}
