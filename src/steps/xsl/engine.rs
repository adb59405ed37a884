use crate::steps::xsl::params::XdmValue;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure raised by an XSLT engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("xslt engine unavailable: {0}")]
    Unavailable(String),

    #[error("xslt engine i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("stylesheet not found: {}", .0.display())]
    StylesheetNotFound(PathBuf),

    #[error("parameter '{name}' of kind {kind} is not supported by this engine")]
    UnsupportedParameter { name: String, kind: &'static str },

    #[error("transformation failed: {0}")]
    TransformFailed(String),

    #[error("engine produced invalid UTF-8 output: {0}")]
    InvalidOutput(#[from] std::string::FromUtf8Error),
}

/// Where a stylesheet comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stylesheet {
    Text(String),
    File(PathBuf),
}

impl From<&str> for Stylesheet {
    fn from(text: &str) -> Self {
        Stylesheet::Text(text.to_string())
    }
}

impl From<String> for Stylesheet {
    fn from(text: String) -> Self {
        Stylesheet::Text(text)
    }
}

impl From<PathBuf> for Stylesheet {
    fn from(path: PathBuf) -> Self {
        Stylesheet::File(path)
    }
}

impl From<&Path> for Stylesheet {
    fn from(path: &Path) -> Self {
        Stylesheet::File(path.to_path_buf())
    }
}

/// Anything stylesheet parameters can be bound on.
pub trait ParameterTarget {
    fn set_parameter(&mut self, name: &str, value: XdmValue) -> Result<(), EngineError>;
}

/// Entry point of an XSLT implementation.
///
/// A context is created for one step invocation and dropped when it ends;
/// nothing an engine hands out outlives the call that asked for it.
pub trait XsltEngine {
    type Context: TransformContext;

    fn create_context(&self) -> Result<Self::Context, EngineError>;
}

/// Transformation context. Parameters set here apply to every document
/// transformed by stylesheets compiled afterwards.
pub trait TransformContext: ParameterTarget {
    type Compiled: CompiledStylesheet;

    fn compile(&mut self, stylesheet: &Stylesheet) -> Result<Self::Compiled, EngineError>;
}

/// Compiled stylesheet ready to transform documents.
pub trait CompiledStylesheet: ParameterTarget {
    /// Transform one serialized document. `Ok(None)` means the engine ran but
    /// produced no result.
    fn transform_to_string(&mut self, document: &str) -> Result<Option<String>, EngineError>;
}
