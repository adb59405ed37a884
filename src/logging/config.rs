use crate::core::ConfigLoader;
use crate::logging::layers::console::ConsoleOutput;
use crate::Result;
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::Directive;

const DEFAULT_LEVEL: &str = "warn";

/// Resolved logging configuration after reading the config file and env overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub log_dir: Option<PathBuf>,
    pub default_level: String,
    pub enable_file: bool,
    pub console_output: ConsoleOutput,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            default_level: DEFAULT_LEVEL.to_string(),
            enable_file: false,
            console_output: ConsoleOutput::default(),
        }
    }
}

impl LoggingConfig {
    /// Load configuration with deterministic precedence: defaults, the
    /// `[logging]` section of the pipeline file, env overrides.
    ///
    /// A relative `log_dir` from the file is anchored at the file's
    /// directory; one from `DUCTUS_LOG_DIR` stays relative to the working
    /// directory.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = LoggingConfig::default();
        if let Some(path) = config_path {
            if let Some(section) = Self::load_from_file(path)? {
                config.apply(section, &ConfigLoader::base_dir(path));
            }
        }
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Option<TomlLoggingSection>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read logging config {}", path.display()))?;
        let parsed: TomlLogging = toml::from_str(&content)
            .with_context(|| format!("failed to parse logging config {}", path.display()))?;
        Ok(parsed.logging)
    }

    fn apply(&mut self, logging: TomlLoggingSection, base_dir: &Path) {
        if let Some(log_dir) = logging.log_dir {
            let log_dir = PathBuf::from(log_dir);
            self.log_dir = Some(if log_dir.is_absolute() {
                log_dir
            } else {
                base_dir.join(log_dir)
            });
        }
        if let Some(default_level) = logging.default_level {
            self.default_level = default_level;
        }
        if let Some(enable_file) = logging.enable_file {
            self.enable_file = enable_file;
        }
        if let Some(console_output) = logging.console_output {
            self.console_output = console_output;
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("DUCTUS_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.default_level = level;
            }
        }
        if let Ok(dir) = env::var("DUCTUS_LOG_DIR") {
            if !dir.trim().is_empty() {
                self.log_dir = Some(PathBuf::from(dir));
                self.enable_file = true;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        Directive::from_str(&self.default_level)
            .map_err(|_| anyhow!("logging.default_level must be a valid tracing directive"))?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TomlLogging {
    pub logging: Option<TomlLoggingSection>,
}

#[derive(Debug, Deserialize)]
struct TomlLoggingSection {
    pub log_dir: Option<String>,
    pub default_level: Option<String>,
    pub enable_file: Option<bool>,
    #[serde(default)]
    pub console_output: Option<ConsoleOutput>,
}
