use crate::core::error::PipelineError;
use crate::core::step::{PipelineEntry, Step, StepAlternative};
use crate::core::values::Values;
use std::time::Instant;
use tracing::{debug, info};

/// Run `entries` over `input`, each entry consuming the previous output.
///
/// An empty entry list returns the input unchanged. The first failure that no
/// `StepAlternative` recovers ends the run and is returned as-is.
pub fn process<T>(input: Values<T>, entries: &[PipelineEntry<T>]) -> Result<Values<T>, PipelineError> {
    let started = Instant::now();
    let mut current = input;

    for (index, entry) in entries.iter().enumerate() {
        debug!(
            index = index + 1,
            total = entries.len(),
            step = %entry.label(),
            values = current.len(),
            "applying pipeline entry"
        );
        current = entry.apply(&current)?;
    }

    info!(
        entries = entries.len(),
        values = current.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "pipeline completed"
    );
    Ok(current)
}

/// Ordered list of entries assembled before a run.
///
/// ```
/// use ductus::core::{Pipeline, Values};
/// use ductus::steps::NoOpStep;
///
/// let pipeline = Pipeline::builder().step(NoOpStep::new()).build();
/// let out = pipeline.run(Values::single("<a/>".to_string())).unwrap();
/// assert_eq!(out.into_vec(), vec!["<a/>".to_string()]);
/// ```
pub struct Pipeline<T> {
    entries: Vec<PipelineEntry<T>>,
}

impl<T> Pipeline<T> {
    pub fn builder() -> PipelineBuilder<T> {
        PipelineBuilder::new()
    }

    pub fn entries(&self) -> &[PipelineEntry<T>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn run(&self, input: Values<T>) -> Result<Values<T>, PipelineError> {
        process(input, &self.entries)
    }
}

impl<T> From<Vec<PipelineEntry<T>>> for Pipeline<T> {
    fn from(entries: Vec<PipelineEntry<T>>) -> Self {
        Self { entries }
    }
}

/// Builder used to lay out pipeline entries in execution order.
pub struct PipelineBuilder<T> {
    entries: Vec<PipelineEntry<T>>,
}

impl<T> Default for PipelineBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PipelineBuilder<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn step<S: Step<T> + 'static>(mut self, step: S) -> Self {
        self.entries.push(PipelineEntry::step(step));
        self
    }

    pub fn alternative<M, F>(mut self, main: M, fallback: F) -> Self
    where
        M: Step<T> + 'static,
        F: Step<T> + 'static,
    {
        self.entries.push(PipelineEntry::alternative(main, fallback));
        self
    }

    pub fn entry(mut self, entry: impl Into<PipelineEntry<T>>) -> Self {
        self.entries.push(entry.into());
        self
    }

    pub fn build(self) -> Pipeline<T> {
        Pipeline {
            entries: self.entries,
        }
    }
}

impl<T> From<StepAlternative<T>> for Pipeline<T> {
    fn from(alternative: StepAlternative<T>) -> Self {
        Pipeline::builder().entry(alternative).build()
    }
}
