//! Settings file
//!
//! ```toml
//! report_dir = "audit_reports"
//! port = 3001
//! open_browser = true
//! ```
//!
//! Every key is optional. Command-line flags override what the file says.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "seoqa.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Where generated reports and exports are written
    pub report_dir: PathBuf,
    /// Port for `seoqa serve`
    pub port: u16,
    /// Open reports in the browser after writing them
    pub open_browser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from("audit_reports"),
            port: 3001,
            open_browser: true,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ReportError::ConfigNotFound {
            path: path.to_path_buf(),
        })?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Load an explicit file, else `seoqa.toml` if present, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
