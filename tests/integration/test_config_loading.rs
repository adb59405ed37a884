use ductus::core::config::{ConfigLoader, ConfigValidator, StepKind};
use ductus::core::types::ErrorCategory;
use ductus::core::Values;
use ductus::steps::xsl::{AtomicValue, XsltprocEngine};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn clear_ductus_env() {
    for v in &["DUCTUS_XSLTPROC", "DUCTUS_LOG_LEVEL", "DUCTUS_LOG_DIR"] {
        env::remove_var(v);
    }
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("ductus.toml");
    fs::write(&path, content).unwrap();
    path
}

/// Test integration of config loading with environment variables
#[test]
#[serial]
fn test_config_loading_integration() {
    clear_ductus_env();
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        temp_dir.path(),
        r#"
[engine]
xsltproc = "/usr/bin/xsltproc"

[logging]
default_level = "info"

[[steps]]
kind = "xsl"
stylesheet = "to-html.xsl"
params = { title = "Quarterly", year = 2024 }

[steps.fallback]
kind = "xsl"
stylesheet = "plain.xsl"

[[steps]]
kind = "noop"
"#,
    );

    let config = ConfigLoader::load(Some(&config_path)).unwrap();
    ConfigValidator::validate(&config).unwrap();

    assert_eq!(config.engine.xsltproc, "/usr/bin/xsltproc");
    assert_eq!(config.steps.len(), 2);
    assert_eq!(config.steps[0].kind, StepKind::Xsl);
    assert_eq!(config.steps[0].params["year"], AtomicValue::Integer(2024));
    insta::assert_snapshot!(config.steps[0].describe(), @"xsl(to-html.xsl) | xsl(plain.xsl)");
    assert_eq!(config.steps[1].describe(), "noop");

    let pipeline = config
        .build_pipeline(&ConfigLoader::base_dir(&config_path))
        .unwrap();
    let labels: Vec<String> = pipeline.entries().iter().map(|e| e.label()).collect();
    assert_eq!(labels, vec!["xsl|xsl", "noop"]);
}

#[test]
#[serial]
fn test_env_override_beats_file() {
    clear_ductus_env();
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), "[engine]\nxsltproc = \"from-file\"\n");

    env::set_var("DUCTUS_XSLTPROC", "from-env");
    let config = ConfigLoader::load(Some(&config_path));
    clear_ductus_env();

    assert_eq!(config.unwrap().engine.xsltproc, "from-env");
}

#[test]
#[serial]
fn test_validation_rejects_noop_with_stylesheet() {
    clear_ductus_env();
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        temp_dir.path(),
        r#"
[[steps]]
kind = "noop"
stylesheet = "style.xsl"
"#,
    );

    let config = ConfigLoader::load(Some(&config_path)).unwrap();
    let err = ConfigValidator::validate(&config).unwrap_err();

    assert_eq!(err.category, ErrorCategory::ValidationError);
    assert_eq!(err.context.get("step_index"), Some(&"1".to_string()));
}

#[test]
#[serial]
fn test_validation_rejects_array_params() {
    clear_ductus_env();
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(
        temp_dir.path(),
        r#"
[[steps]]
kind = "noop"

[[steps]]
kind = "xsl"
stylesheet = "style.xsl"
array_params = { tags = ["a", "b"] }
"#,
    );

    let config = ConfigLoader::load(Some(&config_path)).unwrap();
    assert_eq!(config.steps[1].array_params["tags"].len(), 2);

    let err = ConfigValidator::validate(&config).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ValidationError);
    assert!(err.to_string().contains("array parameter 'tags'"));
    assert_eq!(err.context.get("step_index"), Some(&"2".to_string()));
}

#[test]
#[serial]
fn test_unknown_step_kind_is_parse_error() {
    clear_ductus_env();
    let temp_dir = TempDir::new().unwrap();
    let config_path = write_config(temp_dir.path(), "[[steps]]\nkind = \"xquery\"\n");

    let err = ConfigLoader::load(Some(&config_path)).unwrap_err();
    assert_eq!(err.category, ErrorCategory::SerializationError);
}

#[test]
#[serial]
fn test_configured_pipeline_runs_with_xsltproc() {
    clear_ductus_env();
    if !XsltprocEngine::default().is_available() {
        eprintln!("xsltproc not installed, skipping");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    fs::copy(fixture("wrap.xsl"), temp_dir.path().join("wrap.xsl")).unwrap();
    fs::copy(fixture("abort.xsl"), temp_dir.path().join("abort.xsl")).unwrap();
    let config_path = write_config(
        temp_dir.path(),
        r#"
[[steps]]
kind = "xsl"
stylesheet = "abort.xsl"

[steps.fallback]
kind = "xsl"
stylesheet = "wrap.xsl"
"#,
    );

    let config = ConfigLoader::load(Some(&config_path)).unwrap();
    let pipeline = config
        .build_pipeline(&ConfigLoader::base_dir(&config_path))
        .unwrap();
    let output = pipeline.run(Values::single("<a/>".to_string())).unwrap();

    assert_eq!(output, Values::single("<wrapped><a/></wrapped>".to_string()));
}
