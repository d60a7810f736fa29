use thiserror::Error;
use reqwest::Error as ReqwestError;
use std::io::Error as IoError;
use url::ParseError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Reqwest Error: {0}")]
    RestSourceError(#[from] ReqwestError),

    #[error("IO Error: {0}")]
    IoError(#[from] IoError),

    #[error("Json Error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Yaml Error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Url Error: {0}")]
    UrlParseError(#[from] ParseError),

    /// A plugin rejected its configuration payload.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// A stage refused or failed to handle an item.
    #[error("Stage Error: {0}")]
    StageError(String),

    /// Some pushes of a source run failed; the first failure is kept.
    #[error("{failed} of {total} items failed, first: {first}")]
    RunFailed {
        failed: usize,
        total: usize,
        #[source]
        first: Box<Error>,
    },
}

impl Error {
    pub fn stage(msg: impl Into<String>) -> Self {
        Error::StageError(msg.into())
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Error::InvalidParams(msg.into())
    }
}
