#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("document is {size} bytes, which exceeds the {limit} byte limit")]
    DocumentTooLarge { size: u64, limit: usize },
    #[error("failed to read thing file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write thing file: {0}")]
    FileWrite(std::io::Error),
    #[error(transparent)]
    Things(#[from] things::ThingsError),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to serialize JSON: {0}")]
    JsonSerialization(serde_json::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
