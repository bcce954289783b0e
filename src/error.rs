use std::io;

use thiserror::Error;

/// Application-wide error type for the imgsize CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to launch editor: {0}")]
    Editor(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Failed to render chart: {0}")]
    Render(String),
}

impl AppError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        AppError::Config(msg.into())
    }

    pub fn render<S: Into<String>>(msg: S) -> Self {
        AppError::Render(msg.into())
    }
}

/// Reasons a single image could not be measured. The collector turns every
/// one of these into a zero placeholder.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Failed(String),

    #[error("unexpected inspect output: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for InspectError {
    fn from(err: serde_json::Error) -> Self {
        InspectError::Malformed(err.to_string())
    }
}
