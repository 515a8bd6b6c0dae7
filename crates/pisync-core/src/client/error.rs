//! Transfer error type and its classification into input / transport / server.

use std::fmt;
use std::path::PathBuf;

/// Error returned by a single transfer attempt: a caller-input problem caught
/// before any network work, a curl transport failure, or a non-2xx response.
#[derive(Debug)]
pub enum UploadError {
    /// Caller passed an empty path.
    EmptyPath,
    /// The local file does not exist or could not be read.
    FileNotFound(PathBuf),
    /// curl reported a transport error (connection refused, DNS, timeout).
    Transport(curl::Error),
    /// Building the multipart form failed.
    Form(curl::FormError),
    /// The endpoint answered with a non-2xx status.
    Rejected { status: u32, body: String },
}

/// Coarse classification of an [`UploadError`], carried on `Failed` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-input error (empty path, missing or unreadable file); no request
    /// was sent.
    Input,
    /// Network-level failure before a response was received.
    Transport,
    /// The endpoint rejected the request.
    Server,
}

impl UploadError {
    /// Classify this error for event reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::EmptyPath | UploadError::FileNotFound(_) => ErrorKind::Input,
            UploadError::Transport(_) | UploadError::Form(_) => ErrorKind::Transport,
            UploadError::Rejected { .. } => ErrorKind::Server,
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::EmptyPath => write!(f, "path is required"),
            UploadError::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            UploadError::Transport(e) => write!(f, "{}", e),
            UploadError::Form(e) => write!(f, "multipart form: {}", e),
            UploadError::Rejected { status, body } => {
                if body.is_empty() {
                    write!(f, "HTTP {}", status)
                } else {
                    write!(f, "HTTP {}: {}", status, body)
                }
            }
        }
    }
}

impl std::error::Error for UploadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UploadError::Transport(e) => Some(e),
            UploadError::Form(e) => Some(e),
            UploadError::EmptyPath
            | UploadError::FileNotFound(_)
            | UploadError::Rejected { .. } => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Input => "input",
            ErrorKind::Transport => "transport",
            ErrorKind::Server => "server",
        };
        write!(f, "{}", s)
    }
}

impl From<curl::Error> for UploadError {
    fn from(e: curl::Error) -> Self {
        UploadError::Transport(e)
    }
}

impl From<curl::FormError> for UploadError {
    fn from(e: curl::FormError) -> Self {
        UploadError::Form(e)
    }
}
