pub mod config;
pub mod error;
pub mod pipeline;
pub mod step;
pub mod types;
pub mod values;

pub use config::{ConfigLoader, ConfigValidator, DuctusConfig, StepDefinition, StepKind};
pub use error::{AppError, BoxedCause, PipelineError, StepError};
pub use pipeline::{process, Pipeline, PipelineBuilder};
pub use step::{PipelineEntry, Step, StepAlternative};
pub use types::{ErrorCategory, ErrorSeverity};
pub use values::Values;
