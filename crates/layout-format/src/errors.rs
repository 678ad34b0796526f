use plate_kernel::ConfigError;

/// Errors while reading layout and parameter files.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse layout: {0}")]
    Layout(String),

    #[error("failed to parse parameters: {0}")]
    Parameters(String),

    #[error("invalid parameters: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },
}
