use thiserror::Error;

/// Errors that can occur while decoding a fired wake-up.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A raw delivery could not be parsed.
    #[error("Malformed delivery: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors reported by a [`DisplayLayer`](crate::display::DisplayLayer).
#[derive(Debug, Error)]
pub enum DisplayError {
    /// Notifications are disabled or blocked for this application.
    #[error("Notifications blocked: {0}")]
    Blocked(String),

    /// Rendering failed for this notice.
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
