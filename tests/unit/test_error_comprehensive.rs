use ductus::core::error::{AppError, PipelineError, StepError};
use ductus::core::types::{ErrorCategory, ErrorSeverity};
use ductus::steps::xsl::EngineError;
use std::error::Error as _;

#[test]
fn test_error_creation_all_categories() {
    let categories = vec![
        ErrorCategory::ValidationError,
        ErrorCategory::IoError,
        ErrorCategory::SerializationError,
        ErrorCategory::PipelineError,
        ErrorCategory::EngineError,
        ErrorCategory::InternalError,
        ErrorCategory::Unknown,
    ];

    for category in categories {
        let error = AppError::new(category, "test message");
        assert_eq!(error.category, category);
        assert_eq!(error.message, "test message");
        assert!(error.context.is_empty());
        assert!(error.recovery_suggestions.is_empty());
        assert!(error.occurred_at <= chrono::Utc::now());
        assert!(error.source.is_none());
        assert!(error.code.starts_with("ERR-"));
    }
}

#[test]
fn test_error_severity_mapping() {
    let test_cases = vec![
        (ErrorCategory::ValidationError, ErrorSeverity::Error),
        (ErrorCategory::IoError, ErrorSeverity::Error),
        (ErrorCategory::SerializationError, ErrorSeverity::Error),
        (ErrorCategory::PipelineError, ErrorSeverity::Error),
        (ErrorCategory::EngineError, ErrorSeverity::Error),
        (ErrorCategory::InternalError, ErrorSeverity::Error),
        (ErrorCategory::Unknown, ErrorSeverity::Info),
    ];

    for (category, expected_severity) in test_cases {
        let error = AppError::new(category, "test");
        assert_eq!(error.severity(), expected_severity);
    }
}

#[test]
fn test_error_display_with_context() {
    let mut error = AppError::new(ErrorCategory::ValidationError, "bad step").with_code("E1");
    error.add_context("step_index", "2");
    error.add_context("kind", "xsl");

    insta::assert_snapshot!(
        error.to_string(),
        @r#"[E1] ValidationError: bad step (Context: [("kind", "xsl"), ("step_index", "2")])"#
    );
}

#[test]
fn test_error_builders() {
    let error = AppError::new(ErrorCategory::IoError, "missing")
        .with_context("reading config")
        .with_suggestion("Pass an existing file with --config");

    assert_eq!(error.context.get("context"), Some(&"reading config".to_string()));
    assert_eq!(error.recovery_suggestions.len(), 1);
}

#[test]
fn test_step_error_message_format() {
    let error = StepError::new("xsl", "<foo>bar</foo>");
    insta::assert_snapshot!(
        error.to_string(),
        @"Error while applying step 'xsl' to input value <foo>bar</foo>."
    );
    assert_eq!(error.step(), "xsl");
    assert_eq!(error.value(), "<foo>bar</foo>");
}

#[test]
fn test_step_error_wraps_engine_failure() {
    let error = StepError::new("xsl", "<broken")
        .with_source(EngineError::TransformFailed("not well-formed".to_string()));

    let source = error.source().expect("engine cause attached");
    assert_eq!(source.to_string(), "transformation failed: not well-formed");
}

#[test]
fn test_pipeline_error_is_transparent_over_step_error() {
    let error: PipelineError = StepError::new("noop", 7)
        .with_source(EngineError::Unavailable("xsltproc".to_string()))
        .into();

    assert_eq!(
        error.to_string(),
        "Error while applying step 'noop' to input value 7."
    );
    assert_eq!(error.step_name(), "noop");
    assert!(error.source().is_some());
}

#[test]
fn test_engine_pipeline_error() {
    let error = PipelineError::engine(
        "xsl",
        EngineError::StylesheetNotFound("/missing.xsl".into()),
    );
    assert_eq!(error.step_name(), "xsl");
    assert_eq!(
        error.to_string(),
        "Step 'xsl' failed: stylesheet not found: /missing.xsl"
    );
}

#[test]
fn test_app_error_conversions() {
    let engine: AppError = PipelineError::engine("xsl", EngineError::Unavailable("x".into())).into();
    assert_eq!(engine.category, ErrorCategory::EngineError);
    assert_eq!(engine.code, "PIPELINE_ERROR");
    assert!(engine.source.is_some());

    let io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert_eq!(io.category, ErrorCategory::IoError);
    assert_eq!(io.code, "IO_ERROR");

    let internal: AppError = anyhow::anyhow!("boom").into();
    assert_eq!(internal.category, ErrorCategory::InternalError);
    assert_eq!(internal.message, "boom");
}
