use thiserror::Error;

/// Errors raised while building or rendering forms.
///
/// Validation failures are not errors in this sense: they are returned as
/// [`crate::validation::ValidationErrors`] and shown next to the field.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("no renderer registered for component '{0}'")]
    UnknownComponent(String),
    #[error("field '{0}' is not declared in form '{1}'")]
    UnknownField(String, String),
}

/// Failure reported by an [`crate::upload::Uploader`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(String),
    #[error("failed to read configuration: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    ParseError(String),
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}
