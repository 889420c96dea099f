//! Host and module error types

use crate::lifecycle::{LifecycleOp, LifecycleState};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PluginError>;

/// Failure raised by a module from inside `startup`/`shutdown`
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ModuleError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ModuleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message followed by every cause, `a: b: c`
    pub fn describe(&self) -> String {
        let mut out = self.message.clone();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            out.push_str(": ");
            out.push_str(&err.to_string());
            cause = err.source();
        }
        out
    }
}

impl From<std::io::Error> for ModuleError {
    fn from(err: std::io::Error) -> Self {
        ModuleError::with_source("i/o error", err)
    }
}

impl From<anyhow::Error> for ModuleError {
    fn from(err: anyhow::Error) -> Self {
        ModuleError::new(format!("{:#}", err))
    }
}

/// Error reported by the host, always naming the module involved where there is one
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("module `{module}` failed to start: {message}")]
    InitializationFailed { module: String, message: String },

    #[error("module `{module}` failed to shut down: {message}")]
    ShutdownFailed { module: String, message: String },

    #[error("module `{module}` cannot {op} while {from}")]
    InvalidTransition {
        module: String,
        from: LifecycleState,
        op: LifecycleOp,
    },

    #[error("unknown module `{0}`")]
    UnknownModule(String),

    #[error("module name `{name}` is already used by `{existing}`; `{rejected}` was not loaded")]
    DuplicateName {
        name: String,
        existing: String,
        rejected: String,
    },

    #[error("module `{module}` has an invalid descriptor: {reason}")]
    InvalidDescriptor { module: String, reason: String },

    #[error("module id `{0}` is already registered")]
    AlreadyRegistered(String),

    #[error("invalid host configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl PluginError {
    /// Identifier of the module the error originated from
    pub fn module(&self) -> Option<&str> {
        match self {
            PluginError::InitializationFailed { module, .. }
            | PluginError::ShutdownFailed { module, .. }
            | PluginError::InvalidTransition { module, .. }
            | PluginError::InvalidDescriptor { module, .. } => Some(module),
            PluginError::DuplicateName { rejected, .. } => Some(rejected),
            PluginError::UnknownModule(id) | PluginError::AlreadyRegistered(id) => Some(id),
            PluginError::Config(_) | PluginError::Io(_) | PluginError::Json(_) => None,
        }
    }

    /// Failure raised by module code, as opposed to host bookkeeping
    pub fn is_module_failure(&self) -> bool {
        matches!(
            self,
            PluginError::InitializationFailed { .. } | PluginError::ShutdownFailed { .. }
        )
    }
}
