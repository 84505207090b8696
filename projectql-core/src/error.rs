#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectqlError {
    #[error("Parameter bound more than once: {0}")]
    ParameterCollision(String),
    #[error("Invalid package URL: {0}")]
    InvalidPurl(String),
    #[error("Invalid classifier: {0}")]
    InvalidClassifier(String),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ProjectqlError>;
