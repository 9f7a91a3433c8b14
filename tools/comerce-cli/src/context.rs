//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use comerce_fulfillment::{ComerceConfig, FulfillmentService};
use comerce_observability::init_tracing;

use crate::output::Output;
use crate::state::{State, STATE_FILE};

/// Config file names searched for, in order, from the working directory up.
pub const CONFIG_NAMES: [&str; 3] = ["comerce.toml", ".comerce.toml", "comerce.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Loaded configuration.
    pub config: ComerceConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    state_override: Option<PathBuf>,
}

impl Context {
    /// Load context from a config file, or search for one.
    pub fn load(config_path: Option<&str>, state_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => {
                let config = ComerceConfig::load(path)
                    .with_context(|| format!("Failed to load config: {}", path))?;
                (config, Some(PathBuf::from(path)))
            }
            None => match Self::find_config(&cwd)? {
                Some((config, path)) => (config, Some(path)),
                None => (ComerceConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            config_path,
            output,
            state_override: state_path.map(PathBuf::from),
            cwd,
        })
    }

    /// Find a config file in the directory tree.
    ///
    /// A file that exists but does not parse is an error rather than skipped.
    fn find_config(start: &Path) -> Result<Option<(ComerceConfig, PathBuf)>> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_NAMES {
                let path = current.join(name);
                if path.exists() {
                    let config = ComerceConfig::load(&path)
                        .with_context(|| format!("Failed to load config: {}", path.display()))?;
                    return Ok(Some((config, path)));
                }
            }

            if !current.pop() {
                return Ok(None);
            }
        }
    }

    /// Install the tracing subscriber. `--verbose` raises the filter to debug.
    pub fn init_tracing(&self) {
        let mut log = self.config.log.clone();
        if self.output.is_verbose() {
            log = log.with_filter("debug");
        }
        if let Err(e) = init_tracing(&log) {
            self.output.warn(&format!("Logging disabled: {}", e));
        }
    }

    /// Directory holding the config file, or the working directory.
    pub fn project_dir(&self) -> PathBuf {
        self.config_path
            .as_ref()
            .and_then(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone())
    }

    /// The state file in use.
    pub fn state_path(&self) -> PathBuf {
        match &self.state_override {
            Some(path) => self.resolve_path(path),
            None => self.project_dir().join(STATE_FILE),
        }
    }

    /// Open the state file.
    pub fn open_state(&self) -> Result<State> {
        let path = self.state_path();
        self.output.debug(&format!("Using state file: {}", path.display()));
        State::load(path)
    }

    /// A fulfillment service over `state`, configured from the config file.
    pub fn service(&self, state: &State) -> FulfillmentService {
        FulfillmentService::new(state.store(), &self.config)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join("comerce.toml"),
            "[fulfillment]\neta_days = 3\n",
        )
        .unwrap();

        let (config, path) = Context::find_config(&nested).unwrap().unwrap();
        assert_eq!(config.fulfillment.eta_days, 3);
        assert_eq!(path, dir.path().join("comerce.toml"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".comerce.toml"),
            "[fulfillment]\nfailed_attempt_cap = 0\n",
        )
        .unwrap();
        assert!(Context::find_config(dir.path()).is_err());
    }
}
