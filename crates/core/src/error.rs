use std::io;

/// Errors that can occur while resolving Cypress configuration or test files
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    MissingConfigurationFile(String),

    #[error("{0}")]
    MultipleConfigurationFiles(String),

    #[error("{0}")]
    UnrecognizedConfigurationFile(String),

    #[error("{0}")]
    UnsupportedEra(String),

    #[error("{0}")]
    Validation(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Pattern error: {0}")]
    Pattern(String),

    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for configuration-resolution operations
pub type Result<T> = std::result::Result<T, Error>;
