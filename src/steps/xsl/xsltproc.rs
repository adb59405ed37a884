use crate::steps::xsl::engine::{
    CompiledStylesheet, EngineError, ParameterTarget, Stylesheet, TransformContext, XsltEngine,
};
use crate::steps::xsl::params::{AtomicValue, XdmValue};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::debug;

pub const DEFAULT_XSLTPROC: &str = "xsltproc";

/// XSLT engine backed by the libxslt `xsltproc` command.
///
/// Every transform runs one short-lived child process. `xsltproc` only binds
/// atomic parameters; array parameters are rejected when they are set.
#[derive(Debug, Clone)]
pub struct XsltprocEngine {
    program: PathBuf,
}

impl Default for XsltprocEngine {
    fn default() -> Self {
        Self::new(DEFAULT_XSLTPROC)
    }
}

impl XsltprocEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns `true` when the configured binary can be executed.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }
}

impl XsltEngine for XsltprocEngine {
    type Context = XsltprocContext;

    fn create_context(&self) -> Result<Self::Context, EngineError> {
        Ok(XsltprocContext {
            program: self.program.clone(),
            params: Vec::new(),
        })
    }
}

/// Parameters collected for one step invocation.
pub struct XsltprocContext {
    program: PathBuf,
    params: Vec<(String, AtomicValue)>,
}

impl ParameterTarget for XsltprocContext {
    fn set_parameter(&mut self, name: &str, value: XdmValue) -> Result<(), EngineError> {
        bind(&mut self.params, name, value)
    }
}

impl TransformContext for XsltprocContext {
    type Compiled = XsltprocStylesheet;

    fn compile(&mut self, stylesheet: &Stylesheet) -> Result<Self::Compiled, EngineError> {
        let source = match stylesheet {
            Stylesheet::Text(text) => {
                let mut file = tempfile::Builder::new()
                    .prefix("ductus-")
                    .suffix(".xsl")
                    .tempfile()?;
                file.write_all(text.as_bytes())?;
                file.flush()?;
                StylesheetSource::Temporary(file)
            }
            Stylesheet::File(path) => {
                if !path.is_file() {
                    return Err(EngineError::StylesheetNotFound(path.clone()));
                }
                StylesheetSource::Path(path.clone())
            }
        };

        Ok(XsltprocStylesheet {
            program: self.program.clone(),
            source,
            params: self.params.clone(),
        })
    }
}

enum StylesheetSource {
    Temporary(NamedTempFile),
    Path(PathBuf),
}

impl StylesheetSource {
    fn path(&self) -> &Path {
        match self {
            StylesheetSource::Temporary(file) => file.path(),
            StylesheetSource::Path(path) => path,
        }
    }
}

/// Stylesheet located on disk plus the parameters bound so far. Inline
/// stylesheets live in a temporary file removed on drop.
pub struct XsltprocStylesheet {
    program: PathBuf,
    source: StylesheetSource,
    params: Vec<(String, AtomicValue)>,
}

impl ParameterTarget for XsltprocStylesheet {
    fn set_parameter(&mut self, name: &str, value: XdmValue) -> Result<(), EngineError> {
        bind(&mut self.params, name, value)
    }
}

impl CompiledStylesheet for XsltprocStylesheet {
    fn transform_to_string(&mut self, document: &str) -> Result<Option<String>, EngineError> {
        let mut input = tempfile::Builder::new()
            .prefix("ductus-input-")
            .suffix(".xml")
            .tempfile()?;
        input.write_all(document.as_bytes())?;
        input.flush()?;

        let mut command = Command::new(&self.program);
        for (name, value) in &self.params {
            match value {
                AtomicValue::String(text) => command.arg("--stringparam").arg(name).arg(text),
                other => command.arg("--param").arg(name).arg(xpath_literal(other)),
            };
        }
        command.arg(self.source.path()).arg(input.path());

        debug!(
            program = %self.program.display(),
            stylesheet = %self.source.path().display(),
            params = self.params.len(),
            "running xsltproc"
        );

        let output = command.output().map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                EngineError::Unavailable(format!(
                    "{} not found on PATH",
                    self.program.display()
                ))
            } else {
                EngineError::Io(err)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::TransformFailed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8(output.stdout)?;
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(match text.strip_suffix('\n') {
            Some(stripped) => stripped.to_string(),
            None => text,
        }))
    }
}

fn bind(
    params: &mut Vec<(String, AtomicValue)>,
    name: &str,
    value: XdmValue,
) -> Result<(), EngineError> {
    let value = match value {
        XdmValue::Atomic(value) => value,
        other => {
            return Err(EngineError::UnsupportedParameter {
                name: name.to_string(),
                kind: other.kind(),
            })
        }
    };
    match params.iter_mut().find(|(existing, _)| existing == name) {
        Some(slot) => slot.1 = value,
        None => params.push((name.to_string(), value)),
    }
    Ok(())
}

/// Render a non-string atomic as an XPath expression for `--param`.
fn xpath_literal(value: &AtomicValue) -> String {
    match value {
        AtomicValue::Boolean(true) => "true()".to_string(),
        AtomicValue::Boolean(false) => "false()".to_string(),
        AtomicValue::Integer(value) => value.to_string(),
        AtomicValue::Float(value) if value.is_finite() => value.to_string(),
        AtomicValue::Float(value) if value.is_nan() => "number('NaN')".to_string(),
        AtomicValue::Float(value) if *value > 0.0 => "1 div 0".to_string(),
        AtomicValue::Float(_) => "-1 div 0".to_string(),
        AtomicValue::String(text) if !text.contains('\'') => format!("'{}'", text),
        AtomicValue::String(text) if !text.contains('"') => format!("\"{}\"", text),
        AtomicValue::String(text) => {
            let parts: Vec<String> = text.split('\'').map(|part| format!("'{}'", part)).collect();
            format!("concat({})", parts.join(", \"'\", "))
        }
    }
}
