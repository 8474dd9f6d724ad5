use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("manifest error in {path}: {detail}")]
    Manifest { path: String, detail: String },

    #[error("input not found: {path}")]
    InputNotFound { path: String },

    #[error("unknown mode: {name} (expected verse, prose, keyed or grouped)")]
    UnknownMode { name: String },

    #[error("strict mode: {count} diagnostic(s) in {slug}, first: {first}")]
    Strict {
        slug: String,
        count: usize,
        first: String,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
