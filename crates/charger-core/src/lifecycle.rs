//! Module lifecycle: states, operations and the journal record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of one loaded module instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// Instantiated and described, not yet started
    Discovered,
    /// `startup` succeeded
    Running,
    /// `shutdown` succeeded
    Stopped,
    /// `startup` or `shutdown` failed; the instance is inert
    Failed,
}

/// Host-driven operation on a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleOp {
    Startup,
    Shutdown,
    /// Replace the instance with a fresh one from its factory
    Reload,
}

impl LifecycleState {
    /// State reached when `op` succeeds, or `None` if `op` is not allowed here
    pub fn transition(self, op: LifecycleOp) -> Option<LifecycleState> {
        use LifecycleOp::*;
        use LifecycleState::*;

        match (self, op) {
            (Discovered, Startup) => Some(Running),
            (Running, Shutdown) => Some(Stopped),
            (Discovered | Stopped | Failed, Reload) => Some(Discovered),
            _ => None,
        }
    }

    /// No further startup is possible without a reload
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Stopped | LifecycleState::Failed)
    }

    pub fn is_running(self) -> bool {
        self == LifecycleState::Running
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Discovered => "discovered",
            LifecycleState::Running => "running",
            LifecycleState::Stopped => "stopped",
            LifecycleState::Failed => "failed",
        };
        f.write_str(s)
    }
}

impl fmt::Display for LifecycleOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleOp::Startup => "startup",
            LifecycleOp::Shutdown => "shutdown",
            LifecycleOp::Reload => "reload",
        };
        f.write_str(s)
    }
}

/// One recorded lifecycle transition (or failed attempt)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub timestamp: DateTime<Utc>,
    pub module: String,
    pub op: LifecycleOp,
    pub from: LifecycleState,
    pub to: LifecycleState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LifecycleEvent {
    pub fn new(module: &str, op: LifecycleOp, from: LifecycleState, to: LifecycleState) -> Self {
        Self {
            timestamp: Utc::now(),
            module: module.to_string(),
            op,
            from,
            to,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}: {} -> {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.module,
            self.op,
            self.from,
            self.to
        )?;
        if let Some(error) = &self.error {
            write!(f, " ({})", error)?;
        }
        Ok(())
    }
}
