//! Error types shared across the crate

use thiserror::Error;
use uuid::Uuid;

/// Errors from canvas operations (flood fill, brushes)
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Seed or brush coordinate outside the buffer
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} buffer")]
    InvalidCoordinate {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    /// Fill color string is not a 3- or 6-digit hex color
    #[error("invalid hex color {0:?}")]
    InvalidColor(String),
}

/// Errors from the key-value persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the chat subsystem
///
/// Transport failures are deliberately NOT represented here: a failed request
/// is converted into a fallback assistant message and a clean Idle session,
/// never surfaced to the caller as an error.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no chat session with id {0}")]
    SessionNotFound(Uuid),
}
