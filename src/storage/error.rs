use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// Backing file could not be written
    Io { path: String, source: std::io::Error },

    /// Value could not be serialized before writing
    Serialize { key: String, source: serde_json::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { path, source } => {
                write!(f, "Failed to write store file '{}': {}", path, source)
            }
            StoreError::Serialize { key, source } => {
                write!(f, "Failed to serialize value for '{}': {}", key, source)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Serialize { source, .. } => Some(source),
        }
    }
}
