use crate::steps::xsl::engine::{EngineError, ParameterTarget};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AtomicValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for AtomicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomicValue::Boolean(value) => write!(f, "{}", value),
            AtomicValue::Integer(value) => write!(f, "{}", value),
            AtomicValue::Float(value) => write!(f, "{}", value),
            AtomicValue::String(value) => f.write_str(value),
        }
    }
}

impl From<&str> for AtomicValue {
    fn from(value: &str) -> Self {
        AtomicValue::String(value.to_string())
    }
}

impl From<String> for AtomicValue {
    fn from(value: String) -> Self {
        AtomicValue::String(value)
    }
}

impl From<i64> for AtomicValue {
    fn from(value: i64) -> Self {
        AtomicValue::Integer(value)
    }
}

impl From<i32> for AtomicValue {
    fn from(value: i32) -> Self {
        AtomicValue::Integer(value.into())
    }
}

impl From<f64> for AtomicValue {
    fn from(value: f64) -> Self {
        AtomicValue::Float(value)
    }
}

impl From<bool> for AtomicValue {
    fn from(value: bool) -> Self {
        AtomicValue::Boolean(value)
    }
}

/// Engine-facing parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum XdmValue {
    Atomic(AtomicValue),
    Array(Vec<AtomicValue>),
}

impl XdmValue {
    pub fn kind(&self) -> &'static str {
        match self {
            XdmValue::Atomic(_) => "atomic",
            XdmValue::Array(_) => "array",
        }
    }
}

/// Stylesheet parameter handed to an XSL step.
///
/// A parameter without a name is never bound.
#[derive(Debug, Clone, PartialEq)]
pub enum XslParam {
    Atomic {
        name: Option<String>,
        value: AtomicValue,
    },
    Array {
        name: Option<String>,
        values: Vec<AtomicValue>,
    },
}

impl XslParam {
    pub fn atomic(name: impl Into<String>, value: impl Into<AtomicValue>) -> Self {
        XslParam::Atomic {
            name: Some(name.into()),
            value: value.into(),
        }
    }

    pub fn array<V>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<AtomicValue>,
    {
        XslParam::Array {
            name: Some(name.into()),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            XslParam::Atomic { name, .. } | XslParam::Array { name, .. } => name.as_deref(),
        }
    }

    pub fn to_xdm(&self) -> XdmValue {
        match self {
            XslParam::Atomic { value, .. } => XdmValue::Atomic(value.clone()),
            XslParam::Array { values, .. } => XdmValue::Array(values.clone()),
        }
    }

    pub fn apply_param<P>(&self, target: &mut P) -> Result<(), EngineError>
    where
        P: ParameterTarget + ?Sized,
    {
        match self.name() {
            Some(name) => target.set_parameter(name, self.to_xdm()),
            None => Ok(()),
        }
    }
}
