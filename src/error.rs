//! Crate-level error type
//!
//! Each layer keeps its own error enum; this type gathers them at the
//! pipeline and CLI level and adds the conditions only those levels know
//! about (missing selection, cancellation, panics).

use crate::config::ConfigError;
use crate::graph::GraphError;
use crate::host::HostError;
use crate::swc::SwcError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for conversion operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("SWC error: {0}")]
    Swc(#[from] SwcError),

    #[error("Invalid filament: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No Filaments object selected")]
    NoSelection,

    #[error("SWC file contains no nodes: {}", .0.display())]
    EmptySwc(PathBuf),

    #[error("Directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Unexpected failure: {0}")]
    Panic(String),

    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Conditions reported as warnings rather than failures
    pub fn is_warning(&self) -> bool {
        match self {
            Error::NoSelection | Error::Cancelled(_) => true,
            Error::WithContext { source, .. } => source.is_warning(),
            _ => false,
        }
    }
}

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
