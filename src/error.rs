//! Crate Error Type
//!
//! Only I/O-layer and configuration failures are errors. Per-record parse
//! problems are reported through [`crate::secdef::RecordIssue`] and never
//! abort a pass.

/// Error type for feed passes and configuration loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecdefError {
    /// The line source could not be opened
    SourceUnavailable { source_name: String, reason: String },
    /// Reading failed part way through the feed
    Io { line: u64, reason: String },
    /// Configuration could not be parsed or is inconsistent
    Config(String),
}

impl SecdefError {
    pub fn source_unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        SecdefError::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// True for failures of the feed itself (open or read), as opposed to configuration
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            SecdefError::SourceUnavailable { .. } | SecdefError::Io { .. }
        )
    }
}

impl std::fmt::Display for SecdefError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecdefError::SourceUnavailable {
                source_name,
                reason,
            } => write!(f, "Feed source '{}' unavailable: {}", source_name, reason),
            SecdefError::Io { line, reason } => {
                write!(f, "Read error after line {}: {}", line, reason)
            }
            SecdefError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for SecdefError {}

pub type Result<T> = std::result::Result<T, SecdefError>;
