//! XSLT step and the narrow engine interface it drives.

pub mod engine;
pub mod params;
pub mod step;
pub mod xsltproc;

pub use engine::{
    CompiledStylesheet, EngineError, ParameterTarget, Stylesheet, TransformContext, XsltEngine,
};
pub use params::{AtomicValue, XdmValue, XslParam};
pub use step::{DynamicParam, XslStep};
pub use xsltproc::{XsltprocEngine, DEFAULT_XSLTPROC};
