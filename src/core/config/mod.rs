#![allow(clippy::result_large_err)]

use crate::core::error::AppError;
use crate::core::pipeline::Pipeline;
use crate::core::step::{PipelineEntry, Step, StepAlternative};
use crate::core::types::ErrorCategory;
use crate::steps::xsl::{AtomicValue, XslParam, XslStep, XsltprocEngine, DEFAULT_XSLTPROC};
use crate::steps::NoOpStep;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Pipeline definition loaded from ductus.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DuctusConfig {
    /// Engine configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Steps in execution order
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Binary used to run XSLT transformations
    #[serde(default = "default_xsltproc")]
    pub xsltproc: String,
}

/// Kind of a configured step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Xsl,
    Noop,
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Xsl => write!(f, "xsl"),
            StepKind::Noop => write!(f, "noop"),
        }
    }
}

/// One configured step, optionally paired with a fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDefinition {
    pub kind: StepKind,

    /// Stylesheet path, relative paths resolve against the config directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<PathBuf>,

    /// Atomic stylesheet parameters
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, AtomicValue>,

    /// Array stylesheet parameters
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub array_params: BTreeMap<String, Vec<AtomicValue>>,

    /// Step run on the original input when this one fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Box<StepDefinition>>,
}

fn default_xsltproc() -> String {
    DEFAULT_XSLTPROC.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            xsltproc: default_xsltproc(),
        }
    }
}

impl StepDefinition {
    pub fn noop() -> Self {
        Self {
            kind: StepKind::Noop,
            stylesheet: None,
            params: BTreeMap::new(),
            array_params: BTreeMap::new(),
            fallback: None,
        }
    }

    pub fn xsl(stylesheet: impl Into<PathBuf>) -> Self {
        Self {
            kind: StepKind::Xsl,
            stylesheet: Some(stylesheet.into()),
            ..Self::noop()
        }
    }

    pub fn with_fallback(mut self, fallback: StepDefinition) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Label such as `xsl(style.xsl) | noop` used by `ductus check`.
    pub fn describe(&self) -> String {
        let own = match (&self.kind, &self.stylesheet) {
            (StepKind::Xsl, Some(path)) => format!("xsl({})", path.display()),
            (kind, _) => kind.to_string(),
        };
        match &self.fallback {
            Some(fallback) => format!("{} | {}", own, fallback.describe()),
            None => own,
        }
    }

    fn build_step(
        &self,
        engine: &XsltprocEngine,
        base_dir: &Path,
    ) -> Result<Box<dyn Step<String>>, AppError> {
        match self.kind {
            StepKind::Noop => Ok(Box::new(NoOpStep::new())),
            StepKind::Xsl => {
                let stylesheet = self.stylesheet.as_ref().ok_or_else(|| {
                    AppError::new(
                        ErrorCategory::ValidationError,
                        "xsl step requires a stylesheet",
                    )
                })?;
                let path = if stylesheet.is_absolute() {
                    stylesheet.clone()
                } else {
                    base_dir.join(stylesheet)
                };
                let params = self
                    .params
                    .iter()
                    .map(|(name, value)| XslParam::atomic(name.clone(), value.clone()))
                    .chain(
                        self.array_params
                            .iter()
                            .map(|(name, values)| XslParam::array(name.clone(), values.clone())),
                    );
                Ok(Box::new(
                    XslStep::with_engine(engine.clone(), path).with_params(params),
                ))
            }
        }
    }

    fn build_entry(
        &self,
        engine: &XsltprocEngine,
        base_dir: &Path,
    ) -> Result<PipelineEntry<String>, AppError> {
        let main = self.build_step(engine, base_dir)?;
        let Some(fallback) = &self.fallback else {
            return Ok(PipelineEntry::Step(main));
        };
        let alternative = match fallback.build_entry(engine, base_dir)? {
            PipelineEntry::Step(step) => StepAlternative::new(main, step),
            PipelineEntry::Alternative(nested) => StepAlternative::with_nested_fallback(main, nested),
        };
        Ok(PipelineEntry::Alternative(alternative))
    }
}

impl DuctusConfig {
    pub fn engine(&self) -> XsltprocEngine {
        XsltprocEngine::new(&self.engine.xsltproc)
    }

    /// Turn the configured steps into pipeline entries.
    pub fn build_pipeline(&self, base_dir: &Path) -> Result<Pipeline<String>, AppError> {
        let engine = self.engine();
        let entries = self
            .steps
            .iter()
            .map(|step| step.build_entry(&engine, base_dir))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Pipeline::from(entries))
    }
}


pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;
