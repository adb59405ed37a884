use crate::core::error::PipelineError;
use crate::core::step::Step;
use crate::core::values::Values;

/// Passes every value through untouched, keeping the shape of the stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStep;

impl NoOpStep {
    pub fn new() -> Self {
        Self
    }
}

impl<T: Clone> Step<T> for NoOpStep {
    fn name(&self) -> &str {
        "noop"
    }

    fn apply(&self, values: &Values<T>) -> Result<Values<T>, PipelineError> {
        Ok(values.clone())
    }
}
