use thiserror::Error;

#[derive(Error, Debug)]
pub enum StillError {
    #[error("download failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("checksum mismatch for {name}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("build dependency not available: {0}")]
    DependencyUnavailable(String),

    #[error("build step {index} (`{command}`) failed with exit code {code}")]
    BuildStepFailed {
        index: usize,
        command: String,
        code: i32,
    },

    #[error("build step {index} (`{command}`) could not be started: {source}")]
    BuildStepSpawn {
        index: usize,
        command: String,
        source: std::io::Error,
    },

    #[error("unknown formula version: {0}")]
    VersionNotFound(String),

    #[error("failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StillError>;
