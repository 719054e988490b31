//! Error types for the FORMATR client.
//!
//! Every failure in the smart-action flow is recoverable: the CLI turns
//! these into a toast plus a log line and the session carries on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatrError {
    /// The request never completed (DNS, refused connection, broken body).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success status with whatever message the server put in its body.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No DroppedFile is active.
    #[error("PLEASE SELECT A FILE FIRST.")]
    NoFile,

    /// A user-supplied field failed validation before dispatch.
    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Automated action not linked: {0}. Run it with `formatr convert ENDPOINT FILE` instead.")]
    NotLinked(String),

    /// Translation was asked for with nothing to translate.
    #[error("PLEASE ENTER CODE")]
    EmptyCode,

    /// The file this request was sent for has been replaced or reset.
    #[error("Discarded stale result for {0}")]
    Stale(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Usage: {0}")]
    Usage(String),
}

impl FormatrError {
    pub fn invalid_field<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn usage<T: Into<String>>(msg: T) -> Self {
        Self::Usage(msg.into())
    }

    /// True for errors raised before any request left the client.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::NoFile
                | Self::EmptyCode
                | Self::InvalidField { .. }
                | Self::NotLinked(_)
                | Self::Usage(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FormatrError>;
