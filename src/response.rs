use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

/// The uniform envelope every endpoint answers with, success or error.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    /// RFC 3339 timestamp of when the response was produced.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success".into(),
            message: message.into(),
            timestamp: Utc::now().to_rfc3339(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".into(),
            message: message.into(),
            timestamp: Utc::now().to_rfc3339(),
            data: None,
        }
    }
}
