use thiserror::Error;

/// Errors surfaced by the viewer core.
///
/// Nothing inside the per-frame loop returns these; they come from mount,
/// configuration and the asynchronous load boundaries.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ViewerError {
    #[error("viewer is already mounted")]
    AlreadyMounted,
    #[error("data URL is empty")]
    EmptyDataUrl,
    #[error("origin `{0}` is not an absolute http(s) origin")]
    InvalidOrigin(String),
    #[error("invalid viewer config: {0}")]
    Config(String),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Failure reported by an asynchronous asset load.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LoadError {
    #[error("scene data failed to load: {0}")]
    Renderer(String),
    #[error("avatar asset failed to load: {0}")]
    Avatar(String),
    #[error("load was cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for ViewerError {
    fn from(e: serde_json::Error) -> Self {
        ViewerError::Config(e.to_string())
    }
}
