#![allow(clippy::result_large_err)]

use super::DuctusConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::{Path, PathBuf};

/// Default pipeline definition file name.
pub const CONFIG_FILE_NAME: &str = "ductus.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Path of the pipeline definition: the explicit one if given, else
    /// ductus.toml in the current directory
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(CONFIG_FILE_NAME),
        }
    }

    /// Load a pipeline definition. A missing default file yields defaults,
    /// a missing explicit file is an error. Environment variables override
    /// file values.
    pub fn load(explicit: Option<&Path>) -> Result<DuctusConfig, AppError> {
        let path = Self::resolve_path(explicit);
        let config_file = Self::load_from_file(&path)?;

        let mut config = match (config_file, explicit) {
            (Some(config), _) => config,
            (None, None) => DuctusConfig::default(),
            (None, Some(path)) => {
                return Err(AppError::new(
                    ErrorCategory::IoError,
                    format!("Config file {} does not exist", path.display()),
                )
                .with_suggestion("Pass an existing file with --config"));
            }
        };

        Self::apply_env_overrides(&mut config);

        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<DuctusConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: DuctusConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::SerializationError,
                format!("Failed to parse config file {}: {}", path.display(), e),
            )
        })?;

        Ok(Some(config))
    }

    /// Directory relative stylesheet paths are resolved against.
    pub fn base_dir(config_path: &Path) -> PathBuf {
        match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Apply environment variable overrides to the configuration
    pub fn apply_env_overrides(config: &mut DuctusConfig) {
        if let Ok(xsltproc) = env::var("DUCTUS_XSLTPROC") {
            if !xsltproc.trim().is_empty() {
                config.engine.xsltproc = xsltproc;
            }
        }
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "DUCTUS_XSLTPROC - Override the xsltproc binary (default: xsltproc)",
            "DUCTUS_LOG_LEVEL - Override the default log level (default: warn)",
            "DUCTUS_LOG_DIR - Override the log directory (default: .ductus/logs)",
            "RUST_LOG - Full tracing filter, takes precedence over DUCTUS_LOG_LEVEL",
        ]
    }
}
