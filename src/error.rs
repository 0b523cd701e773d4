use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize chart source: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Unknown practice ID: {0}")]
    UnknownSite(String),

    #[error("Unknown vaccination type: {0}")]
    UnknownVaccine(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;
