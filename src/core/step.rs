use crate::core::error::PipelineError;
use crate::core::values::Values;
use tracing::warn;

/// A single named transformation unit of a pipeline.
///
/// `apply` receives the stream by reference and always returns a new stream,
/// so the caller keeps the original input intact.
pub trait Step<T> {
    /// Stable, non-empty identifier used in diagnostics only.
    fn name(&self) -> &str;

    fn apply(&self, values: &Values<T>) -> Result<Values<T>, PipelineError>;
}

impl<T, S: Step<T> + ?Sized> Step<T> for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn apply(&self, values: &Values<T>) -> Result<Values<T>, PipelineError> {
        (**self).apply(values)
    }
}

/// Primary step paired with a fallback that runs when the primary fails.
///
/// The fallback always receives the original input; whatever the primary
/// produced before failing is dropped.
pub struct StepAlternative<T> {
    main: Box<dyn Step<T>>,
    fallback: Box<PipelineEntry<T>>,
}

impl<T> StepAlternative<T> {
    pub fn new<M, F>(main: M, fallback: F) -> Self
    where
        M: Step<T> + 'static,
        F: Step<T> + 'static,
    {
        Self {
            main: Box::new(main),
            fallback: Box::new(PipelineEntry::Step(Box::new(fallback))),
        }
    }

    /// Use another alternative as the fallback, giving a chain of recoveries.
    pub fn with_nested_fallback<M>(main: M, fallback: StepAlternative<T>) -> Self
    where
        M: Step<T> + 'static,
    {
        Self {
            main: Box::new(main),
            fallback: Box::new(PipelineEntry::Alternative(fallback)),
        }
    }

    pub fn main(&self) -> &dyn Step<T> {
        self.main.as_ref()
    }

    pub fn fallback(&self) -> &PipelineEntry<T> {
        &self.fallback
    }

    pub fn apply(&self, values: &Values<T>) -> Result<Values<T>, PipelineError> {
        match self.main.apply(values) {
            Ok(result) => Ok(result),
            Err(err) => {
                warn!(
                    step = self.main.name(),
                    fallback = %self.fallback.label(),
                    error = %err,
                    "primary step failed, running fallback"
                );
                self.fallback.apply(values)
            }
        }
    }
}

/// One position in a pipeline: a plain step or a primary/fallback pair.
pub enum PipelineEntry<T> {
    Step(Box<dyn Step<T>>),
    Alternative(StepAlternative<T>),
}

impl<T> PipelineEntry<T> {
    pub fn step<S: Step<T> + 'static>(step: S) -> Self {
        PipelineEntry::Step(Box::new(step))
    }

    pub fn alternative<M, F>(main: M, fallback: F) -> Self
    where
        M: Step<T> + 'static,
        F: Step<T> + 'static,
    {
        PipelineEntry::Alternative(StepAlternative::new(main, fallback))
    }

    pub fn apply(&self, values: &Values<T>) -> Result<Values<T>, PipelineError> {
        match self {
            PipelineEntry::Step(step) => step.apply(values),
            PipelineEntry::Alternative(alternative) => alternative.apply(values),
        }
    }

    /// Human-readable label for logs, e.g. `xsl` or `xsl|noop`.
    pub fn label(&self) -> String {
        match self {
            PipelineEntry::Step(step) => step.name().to_string(),
            PipelineEntry::Alternative(alternative) => format!(
                "{}|{}",
                alternative.main.name(),
                alternative.fallback.label()
            ),
        }
    }
}

impl<T> From<StepAlternative<T>> for PipelineEntry<T> {
    fn from(alternative: StepAlternative<T>) -> Self {
        PipelineEntry::Alternative(alternative)
    }
}

impl<T> From<Box<dyn Step<T>>> for PipelineEntry<T> {
    fn from(step: Box<dyn Step<T>>) -> Self {
        PipelineEntry::Step(step)
    }
}
