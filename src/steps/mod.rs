//! Concrete steps shipped with the crate.

pub mod noop;
pub mod xsl;

pub use noop::NoOpStep;
pub use xsl::{
    AtomicValue, EngineError, Stylesheet, XdmValue, XslParam, XslStep, XsltEngine,
    XsltprocEngine,
};
