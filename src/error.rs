use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("read failed: {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("write failed: {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{what} not found at {path}")]
    MissingRoot { what: String, path: PathBuf },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("http client error: {0}")]
    Http(String),

    #[error("report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
