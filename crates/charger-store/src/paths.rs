//! Path resolution for host configuration, module state and the lifecycle journal

use std::path::{Path, PathBuf};

/// Environment variable overriding the host root directory
pub const HOME_ENV: &str = "CHARGER_HOME";

/// Resolves the standard locations under the host root (`~/.charger` by default)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    /// Resolve the root from `CHARGER_HOME`, falling back to `~/.charger`
    pub fn new() -> std::io::Result<Self> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self::with_root(home.join(".charger")))
    }

    /// Use an explicit root directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding plugin configuration and per-module state
    pub fn plugins_dir(&self) -> PathBuf {
        self.root.join("plugins")
    }

    /// Host plugin configuration (`plugins/config.json`)
    pub fn config_file(&self) -> PathBuf {
        self.plugins_dir().join("config.json")
    }

    /// Persisted state for one module (`plugins/<id>_state.json`)
    pub fn state_file(&self, module_id: &str) -> PathBuf {
        self.plugins_dir().join(format!("{}_state.json", module_id))
    }

    /// Scratch directory a module may use for its own files
    pub fn module_data_dir(&self, module_id: &str) -> PathBuf {
        self.plugins_dir().join("data").join(module_id)
    }

    /// Append-only lifecycle journal
    pub fn journal_file(&self) -> PathBuf {
        self.root.join("lifecycle.jsonl")
    }
}
