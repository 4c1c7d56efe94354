//! Error handling for the timeline chart
//!
//! The chart engine itself degrades silently (empty scenes, fallback ticks),
//! so these errors only surface from the document, configuration and
//! command-line layers.

use thiserror::Error;

/// Main error type for timeline chart operations
#[derive(Error, Debug)]
pub enum ChartError {
    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to parsing documents, dates or tick formats
    #[error("Parse error: {0}")]
    Parse(String),

    /// The plot area left after padding is empty
    #[error("Invalid chart dimensions {width}x{height}: inner plot area must be positive")]
    InvalidDimensions { width: f64, height: f64 },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ChartError>,
    },
}

impl ChartError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ChartError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for ChartError {
    fn from(err: toml::de::Error) -> Self {
        ChartError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for ChartError {
    fn from(err: toml::ser::Error) -> Self {
        ChartError::Serialization(err.to_string())
    }
}

/// Result type alias for timeline chart operations
pub type Result<T> = std::result::Result<T, ChartError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
