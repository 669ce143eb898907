//! Scan configuration.
//!
//! Settings come from an optional `nestscope.toml` and can be overridden on
//! the command line. Every field has a default, so an empty or partial file
//! is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analysis::extractor::DEFAULT_DECOY_NAMES;
use crate::error::{AnalysisError, AnalysisResult};

/// File name looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "nestscope.toml";

/// Settings for a project scan.
///
/// # Example
///
/// ```
/// use nestscope::config::ScanConfig;
///
/// let config: ScanConfig = toml::from_str(r#"suffix = ".module.js""#).unwrap();
/// assert_eq!(config.suffix, ".module.js");
/// assert!(config.ignored_dirs.contains(&"node_modules".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// File-name suffix identifying module files.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Directory names never descended into.
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,

    /// Class-name substrings that disqualify a module declaration.
    #[serde(default = "default_decoy_names")]
    pub decoy_names: Vec<String>,
}

fn default_suffix() -> String {
    ".module.ts".to_string()
}

fn default_ignored_dirs() -> Vec<String> {
    [
        "node_modules",
        ".git",
        "dist",
        "build",
        ".next",
        "coverage",
        ".turbo",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_decoy_names() -> Vec<String> {
    DEFAULT_DECOY_NAMES.iter().map(|s| s.to_string()).collect()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            ignored_dirs: default_ignored_dirs(),
            decoy_names: default_decoy_names(),
        }
    }
}

impl ScanConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> AnalysisResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        toml::from_str(&contents).map_err(|source| AnalysisError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `nestscope.toml` from `root` if present, defaults otherwise.
    pub fn discover(root: &Path) -> AnalysisResult<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns true if a file name matches the module-file suffix.
    pub fn is_module_file(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.suffix)
    }

    /// Returns true if a directory should be skipped during traversal.
    pub fn is_ignored_dir(&self, dir_name: &str) -> bool {
        self.ignored_dirs.iter().any(|d| d == dir_name)
    }
}
