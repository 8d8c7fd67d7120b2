//! Decode failures for inbound frames.

use thiserror::Error;

/// Failure while decoding an inbound frame or one of its payloads.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The frame was not a JSON document in the expected shape.
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),
    /// A download payload marked `is_b64` did not decode.
    #[error("invalid base64 in download payload: {0}")]
    Base64(#[from] base64::DecodeError),
    /// A decoded download body was not valid UTF-8 text.
    #[error("download payload is not text: {0}")]
    DownloadNotText(#[from] std::string::FromUtf8Error),
}
