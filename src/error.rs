//! Errors raised while loading a picker configuration or starting a frontend.

use prism_ui::{ColorParseError, ConfigError};

/// Errors that can occur when setting up a picker.
#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Storage error (localStorage in WASM)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A color entry could not be parsed
    #[error("Invalid color: {0}")]
    Color(#[from] ColorParseError),

    /// A component's options failed validation
    #[error("Component {index}: {source}")]
    Component {
        index: usize,
        #[source]
        source: ConfigError,
    },

    /// No component at the given position
    #[error("No component at index {0}")]
    NoComponent(usize),

    /// The windowing system or the browser refused to start
    #[error("Platform error: {0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, PickerError>;
