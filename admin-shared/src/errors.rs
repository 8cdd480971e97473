use crate::types::ApiErrorResponse;

/// Errors produced while talking to the dashboard backend.
///
/// None of these reach the user directly; callers log them and move on.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend responded {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Build an `Api` error from a non-2xx status and the raw response body.
    ///
    /// The backend wraps failures as `{"success":false,"error":{...}}`; when the
    /// body does not follow that envelope the raw text becomes the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(envelope) => Self::Api {
                status,
                code: Some(envelope.error.code),
                message: envelope.error.message,
            },
            Err(_) => Self::Api {
                status,
                code: None,
                message: if body.trim().is_empty() {
                    "empty response body".to_string()
                } else {
                    body.trim().to_string()
                },
            },
        }
    }

    /// HTTP status of the failed call, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
