use crate::core::error::{PipelineError, StepError};
use crate::core::step::Step;
use crate::core::values::Values;
use crate::steps::xsl::engine::{
    CompiledStylesheet, EngineError, Stylesheet, TransformContext, XsltEngine,
};
use crate::steps::xsl::params::XslParam;
use crate::steps::xsl::xsltproc::XsltprocEngine;
use tracing::{debug, trace};

/// Factory evaluated before every document to produce a fresh parameter.
pub type DynamicParam = Box<dyn Fn() -> XslParam>;

/// Applies an XSLT stylesheet to every content value.
///
/// Single-value-aware: a scalar input yields a scalar output and a sequence
/// yields a same-length sequence in the same order. Each call creates its own
/// engine context, binds the static parameters, compiles the stylesheet and
/// releases everything before returning.
pub struct XslStep<E = XsltprocEngine> {
    engine: E,
    stylesheet: Stylesheet,
    params: Vec<XslParam>,
    dynamic_params: Vec<DynamicParam>,
}

impl XslStep<XsltprocEngine> {
    pub fn new(stylesheet: impl Into<Stylesheet>) -> Self {
        Self::with_engine(XsltprocEngine::default(), stylesheet)
    }
}

impl<E: XsltEngine> XslStep<E> {
    pub fn with_engine(engine: E, stylesheet: impl Into<Stylesheet>) -> Self {
        Self {
            engine,
            stylesheet: stylesheet.into(),
            params: Vec::new(),
            dynamic_params: Vec::new(),
        }
    }

    /// Parameter bound once per call, before the stylesheet is compiled.
    pub fn with_param(mut self, param: XslParam) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = XslParam>) -> Self {
        self.params.extend(params);
        self
    }

    /// Parameter re-evaluated and re-bound before each document.
    pub fn with_dynamic_param<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> XslParam + 'static,
    {
        self.dynamic_params.push(Box::new(factory));
        self
    }

    pub fn stylesheet(&self) -> &Stylesheet {
        &self.stylesheet
    }

    pub fn params(&self) -> &[XslParam] {
        &self.params
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn transform_one(
        &self,
        compiled: &mut <E::Context as TransformContext>::Compiled,
        document: &str,
    ) -> Result<String, StepError> {
        let step_error = |source: Option<EngineError>| {
            let error = StepError::new(Step::<String>::name(self), document);
            match source {
                Some(source) => error.with_source(source),
                None => error,
            }
        };

        for factory in &self.dynamic_params {
            factory()
                .apply_param(compiled)
                .map_err(|err| step_error(Some(err)))?;
        }

        match compiled.transform_to_string(document) {
            Ok(Some(output)) => {
                trace!(input_len = document.len(), output_len = output.len(), "document transformed");
                Ok(output)
            }
            Ok(None) => Err(step_error(None)),
            Err(err) => Err(step_error(Some(err))),
        }
    }
}

impl<E: XsltEngine> Step<String> for XslStep<E> {
    fn name(&self) -> &str {
        "xsl"
    }

    fn apply(&self, values: &Values<String>) -> Result<Values<String>, PipelineError> {
        let engine_error = |err: EngineError| PipelineError::engine("xsl", err);

        let mut context = self.engine.create_context().map_err(engine_error)?;
        for param in &self.params {
            param.apply_param(&mut context).map_err(engine_error)?;
        }
        let mut compiled = context.compile(&self.stylesheet).map_err(engine_error)?;
        debug!(
            documents = values.len(),
            static_params = self.params.len(),
            dynamic_params = self.dynamic_params.len(),
            "stylesheet compiled"
        );

        let output = values.try_map_ref(|document| self.transform_one(&mut compiled, document))?;
        Ok(output)
    }
}
