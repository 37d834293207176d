use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrviewError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Config error: {0}")]
    Config(String),

    /// Upstream sent a pull request state we have no mapping for.
    #[error("Unknown pull request state: {0:?}")]
    UnknownState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PrviewError>;
