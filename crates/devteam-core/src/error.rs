/// Errors surfaced by the console core.
///
/// None of these are fatal: the session reduces them to a connectivity flag or
/// a single latest-error message.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("Feed connection failed: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    #[error("{}", crate::constants::NO_RUN_FOR_UPLOAD)]
    NoRunSelected,

    #[error("No attachment selected")]
    NoAttachment,

    #[error("Attachment I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedFrame(reason.into())
    }
}
