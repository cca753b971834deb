use thiserror::Error;

/// Failures that can occur while delivering a capture request.
///
/// None of these ever reach callers of [`crate::report_event`] or
/// [`crate::report_exception`]; they only surface through the `try_*`
/// variants on [`crate::Reporter`].
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("event name must not be empty")]
    EmptyEvent,

    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("collector responded with HTTP {0}")]
    Status(u16),

    #[error("transport panicked: {0}")]
    Panicked(String),

    #[error("capture task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<ureq::Error> for CaptureError {
    fn from(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => CaptureError::Status(code),
            other => CaptureError::Transport(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CaptureError>;
