use crate::core::types::{ErrorCategory, ErrorSeverity};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Boxed native failure raised by whatever engine a step wraps.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A step could not produce output for one input value.
#[derive(Debug, Error)]
#[error("Error while applying step '{step}' to input value {value}.")]
pub struct StepError {
    step: String,
    value: String,
    #[source]
    source: Option<BoxedCause>,
}

impl StepError {
    /// Build the record from the failing step's name and the offending value.
    pub fn new(step: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            step: step.into(),
            value: value.to_string(),
            source: None,
        }
    }

    /// Attach the underlying engine failure.
    pub fn with_source(mut self, source: impl Into<BoxedCause>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn step(&self) -> &str {
        &self.step
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Failure surfaced by a step and propagated by the pipeline runner.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Step(#[from] StepError),

    /// The step's own engine failed outside of any single value.
    #[error("Step '{step}' failed: {source}")]
    Engine {
        step: String,
        #[source]
        source: BoxedCause,
    },
}

impl PipelineError {
    pub fn engine(step: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        PipelineError::Engine {
            step: step.into(),
            source: source.into(),
        }
    }

    /// Name of the step the failure is attributed to.
    pub fn step_name(&self) -> &str {
        match self {
            PipelineError::Step(err) => err.step(),
            PipelineError::Engine { step, .. } => step,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub code: String,
    pub message: String,
    pub context: HashMap<String, String>,
    pub recovery_suggestions: Vec<String>,
    pub occurred_at: DateTime<Utc>,
    pub source: Option<anyhow::Error>,
}

impl AppError {
    pub fn new<T: Into<String>>(category: ErrorCategory, message: T) -> Self {
        let severity = match category {
            ErrorCategory::ValidationError
            | ErrorCategory::IoError
            | ErrorCategory::SerializationError
            | ErrorCategory::PipelineError
            | ErrorCategory::EngineError
            | ErrorCategory::InternalError => ErrorSeverity::Error,
            ErrorCategory::Unknown => ErrorSeverity::Info,
        };
        AppError {
            category,
            severity,
            code: format!("ERR-{}", uuid::Uuid::new_v4()),
            message: message.into(),
            context: HashMap::new(),
            recovery_suggestions: vec![],
            occurred_at: Utc::now(),
            source: None,
        }
    }

    pub fn with_context<T: Into<String>>(mut self, context: T) -> Self {
        self.context.insert("context".to_string(), context.into());
        self
    }

    pub fn with_code<T: Into<String>>(mut self, code: T) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_suggestion<T: Into<String>>(mut self, suggestion: T) -> Self {
        self.recovery_suggestions.push(suggestion.into());
        self
    }

    pub fn add_context(&mut self, key: &str, value: &str) {
        self.context.insert(key.to_string(), value.to_string());
    }

    pub fn severity(&self) -> ErrorSeverity {
        self.severity
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.category, self.message)?;
        if !self.context.is_empty() {
            let mut entries: Vec<_> = self.context.iter().collect();
            entries.sort();
            write!(f, " (Context: {:?})", entries)?;
        }
        if let Some(ref source) = self.source {
            write!(f, "\nCaused by: {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        let category = match e {
            PipelineError::Step(_) => ErrorCategory::PipelineError,
            PipelineError::Engine { .. } => ErrorCategory::EngineError,
        };
        let step = e.step_name().to_string();
        let mut error = AppError::new(category, e.to_string()).with_code("PIPELINE_ERROR");
        error.add_context("step", &step);
        error.source = Some(anyhow::Error::new(e));
        error
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError {
            category: ErrorCategory::InternalError,
            severity: ErrorSeverity::Error,
            code: "ANYHOW_ERROR".to_string(),
            message: e.to_string(),
            context: HashMap::new(),
            recovery_suggestions: vec!["Check the error details".to_string()],
            occurred_at: Utc::now(),
            source: Some(e),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError {
            category: ErrorCategory::IoError,
            severity: ErrorSeverity::Error,
            code: "IO_ERROR".to_string(),
            message: e.to_string(),
            context: HashMap::new(),
            recovery_suggestions: vec!["Check file permissions and paths".to_string()],
            occurred_at: Utc::now(),
            source: Some(anyhow::anyhow!(e)),
        }
    }
}
