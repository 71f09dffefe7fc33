//! Application-wide error types.
//!
//! Library modules carry specific error types via `thiserror`; this
//! top-level enum aggregates them for unified handling. CLI/main uses
//! `anyhow` for convenient propagation.

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog ingestion error
    #[error("Source error: {0}")]
    Source(#[from] crate::source::SourceError),

    /// External identifier resolution error
    #[error("Resolver error: {0}")]
    Resolver(#[from] crate::resolver::ResolverError),

    /// Descriptor read/write error
    #[error("Descriptor error: {0}")]
    Descriptor(#[from] crate::descriptor::DescriptorError),

    /// Sync orchestration error
    #[error("Sync error: {0}")]
    Sync(#[from] crate::sync::SyncError),

    /// Host index handshake error
    #[error("Host error: {0}")]
    Host(#[from] crate::host::HostError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("no library path configured");
        assert!(err.to_string().contains("no library path configured"));
    }

    #[test]
    fn test_subsystem_errors_convert() {
        let err: Error = crate::sync::SyncError::AlreadyRunning.into();
        assert!(matches!(err, Error::Sync(_)));
    }
}
