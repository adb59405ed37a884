#![allow(clippy::result_large_err)]

use super::{DuctusConfig, StepDefinition, StepKind};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules
    pub fn validate(config: &DuctusConfig) -> Result<(), AppError> {
        if config.engine.xsltproc.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                "engine.xsltproc cannot be empty",
            ));
        }

        for (index, step) in config.steps.iter().enumerate() {
            Self::validate_step(step).map_err(|mut err| {
                err.add_context("step_index", &(index + 1).to_string());
                err
            })?;
        }

        Ok(())
    }

    fn validate_step(step: &StepDefinition) -> Result<(), AppError> {
        match step.kind {
            StepKind::Xsl => {
                let missing = step
                    .stylesheet
                    .as_ref()
                    .map(|path| path.as_os_str().is_empty())
                    .unwrap_or(true);
                if missing {
                    return Err(AppError::new(
                        ErrorCategory::ValidationError,
                        "xsl step requires a stylesheet",
                    ));
                }
                if let Some(name) = step.array_params.keys().next() {
                    return Err(AppError::new(
                        ErrorCategory::ValidationError,
                        format!(
                            "array parameter '{}': array parameters are not supported by xsltproc",
                            name
                        ),
                    )
                    .with_suggestion("Pass the values as a single delimited string parameter"));
                }
            }
            StepKind::Noop => {
                if step.stylesheet.is_some()
                    || !step.params.is_empty()
                    || !step.array_params.is_empty()
                {
                    return Err(AppError::new(
                        ErrorCategory::ValidationError,
                        "noop step takes no stylesheet or parameters",
                    ));
                }
            }
        }

        if let Some(fallback) = &step.fallback {
            Self::validate_step(fallback)?;
        }

        Ok(())
    }
}
