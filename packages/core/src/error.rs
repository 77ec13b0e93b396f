// ABOUTME: Backend error record and the business codes the client reacts to
// ABOUTME: Decodes the ErrorResponse body the REST backend sends for every failure

use serde::{Deserialize, Serialize};

/// Code used when a failure carries no decodable error body
pub const UNKNOWN_ERROR_CODE: &str = "UNKNOWN_ERROR";

/// Business codes meaning "the addressed record does not exist".
///
/// The backend reports most business failures as HTTP 400, so these codes are
/// the only reliable signal besides a plain 404.
pub const NOT_FOUND_CODES: &[&str] = &[
    "C002",  // resource
    "U001",  // user
    "CP001", // company
    "PJ001", // project
    "SR001", // service request
    "SP001", // specification
    "AP001", // approval
    "IS001", // issue
    "RL001", // release
    "IC001", // incident
    "PT001", // partner
    "AS001", // asset
];

/// Business codes meaning "the requested status is not reachable from the current one"
pub const INVALID_STATUS_CODES: &[&str] = &[
    "PJ003", "SR003", "SR004", "SP003", "SP005", "AP003", "AP005", "IS003", "RL003", "RL004",
    "IC003", "IC004",
];

/// One rejected field in a validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldErrorDetail {
    pub field: String,
    #[serde(default)]
    pub value: Option<String>,
    pub reason: String,
}

/// Error body returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    /// ISO-8601 time the backend produced the error
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldErrorDetail>>,
}

impl ApiError {
    /// Build an error record stamped with the current time
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: chrono::Utc::now().naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string(),
            errors: None,
        }
    }

    /// Stand-in for a failure whose body could not be decoded
    pub fn unknown(status: u16) -> Self {
        Self::new(
            UNKNOWN_ERROR_CODE,
            format!("Request failed with status {}", status),
        )
    }

    /// Whether the code names a missing record
    pub fn is_not_found(&self) -> bool {
        NOT_FOUND_CODES.contains(&self.code.as_str())
    }

    /// Whether the code names a rejected status change
    pub fn is_invalid_status(&self) -> bool {
        INVALID_STATUS_CODES.contains(&self.code.as_str())
    }

    /// Field-level details, empty when the backend sent none
    pub fn field_errors(&self) -> &[FieldErrorDetail] {
        self.errors.as_deref().unwrap_or(&[])
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}
