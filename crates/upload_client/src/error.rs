use thiserror::Error;

/// Pre-flight rejection of the current selection. No request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select an audio file")]
    NoFileSelected,
    #[error("File is too large, please choose an audio file under 50MB")]
    FileTooLarge { size_bytes: u64 },
    #[error("Please select an audio file (MP3, WAV, M4A, OGG format)")]
    UnsupportedType { filename: String, mime_type: String },
}

/// What could be recovered from the body of a non-2xx reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionBody {
    Detail(String),
    NoDetail,
    Unreadable,
}

impl RejectionBody {
    pub fn from_bytes(body: &[u8]) -> Self {
        match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(serde_json::Value::Object(map)) => {
                let parsed = shared::protocol::ErrorBody {
                    detail: map.get("detail").cloned(),
                };
                parsed
                    .detail_text()
                    .map(RejectionBody::Detail)
                    .unwrap_or(RejectionBody::NoDetail)
            }
            Ok(serde_json::Value::Null) => RejectionBody::Unreadable,
            Ok(_) => RejectionBody::NoDetail,
            Err(_) => RejectionBody::Unreadable,
        }
    }
}

/// The request never produced an HTTP reply we could use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("{0}")]
    Request(String),
    #[error("failed to read '{path}': {reason}")]
    ReadFile { path: String, reason: String },
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        TransportError::Request(value.to_string())
    }
}

/// Post-flight failure of an upload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("{}", rejection_message(.status, .body))]
    ServerRejected { status: u16, body: RejectionBody },
    #[error("Network error: {0}")]
    Transport(#[from] TransportError),
}

pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "File is too large, please choose a file under 50MB";
pub const GENERIC_UPLOAD_FAILURE_MESSAGE: &str = "Upload failed";

fn rejection_message(status: &u16, body: &RejectionBody) -> String {
    if *status == 413 {
        return PAYLOAD_TOO_LARGE_MESSAGE.to_string();
    }
    match body {
        RejectionBody::Detail(detail) => detail.clone(),
        RejectionBody::NoDetail => GENERIC_UPLOAD_FAILURE_MESSAGE.to_string(),
        RejectionBody::Unreadable => format!("Server error: {status}"),
    }
}
