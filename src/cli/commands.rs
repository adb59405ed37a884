use crate::{
    cli::args::{CheckArgs, OutputFormat, RunArgs, TransformArgs},
    core::{
        ConfigLoader, ConfigValidator, DuctusConfig, Pipeline, PipelineError, StepDefinition,
        Values,
    },
    steps::xsl::AtomicValue,
    Result,
};
use anyhow::{anyhow, Context};
use serde_json::json;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Run the pipeline described by the config file over the inputs.
pub fn run(args: RunArgs) -> Result<()> {
    let config_path = ConfigLoader::resolve_path(args.config.as_deref());
    let config = ConfigLoader::load(args.config.as_deref())?;
    ConfigValidator::validate(&config)?;

    if config.steps.is_empty() {
        tracing::warn!(
            config = %config_path.display(),
            "pipeline has no steps, inputs are passed through unchanged"
        );
    }

    let pipeline = config.build_pipeline(&ConfigLoader::base_dir(&config_path))?;
    execute(&pipeline, &args.inputs, args.output_dir.as_deref(), args.format)
}

/// Run an ad-hoc single stylesheet pipeline.
pub fn transform(args: TransformArgs) -> Result<()> {
    let mut step = StepDefinition::xsl(&args.stylesheet);
    step.params = args
        .params
        .iter()
        .map(|(name, value)| (name.clone(), AtomicValue::from(value.as_str())))
        .collect();
    if let Some(fallback) = &args.fallback_stylesheet {
        step = step.with_fallback(StepDefinition::xsl(fallback));
    }

    let mut config = DuctusConfig {
        steps: vec![step],
        ..Default::default()
    };
    ConfigLoader::apply_env_overrides(&mut config);
    if let Some(xsltproc) = &args.xsltproc {
        config.engine.xsltproc = xsltproc.display().to_string();
    }
    ConfigValidator::validate(&config)?;

    let pipeline = config.build_pipeline(Path::new("."))?;
    execute(&pipeline, &args.inputs, args.output_dir.as_deref(), args.format)
}

/// Validate a pipeline definition and list its entries.
pub fn check(args: CheckArgs) -> Result<()> {
    let config_path = ConfigLoader::resolve_path(args.config.as_deref());
    let config = ConfigLoader::load(args.config.as_deref())?;
    ConfigValidator::validate(&config)?;
    let pipeline = config.build_pipeline(&ConfigLoader::base_dir(&config_path))?;

    let engine = config.engine();
    let availability = if engine.is_available() {
        "available"
    } else {
        "not found"
    };

    println!("Pipeline: {}", config_path.display());
    println!("Engine: {} ({})", engine.program().display(), availability);
    println!("Entries: {}", pipeline.len());
    for (index, step) in config.steps.iter().enumerate() {
        println!("  {}. {}", index + 1, step.describe());
    }
    Ok(())
}

fn execute(
    pipeline: &Pipeline<String>,
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let values = read_inputs(inputs)?;
    tracing::info!(
        inputs = inputs.len(),
        entries = pipeline.len(),
        "running pipeline"
    );

    let outputs = match pipeline.run(values) {
        Ok(outputs) => outputs,
        Err(err) => {
            tracing::error!(step = err.step_name(), error = %err, "pipeline failed");
            return Err(pipeline_failure(err));
        }
    };

    match output_dir {
        Some(dir) => write_outputs(dir, inputs, outputs, format),
        None => print_outputs(outputs, format),
    }
}

fn pipeline_failure(err: PipelineError) -> anyhow::Error {
    let step = err.step_name().to_string();
    anyhow::Error::new(err).context(format!("pipeline failed at step '{}'", step))
}

/// One input runs as a single value, several as a sequence.
fn read_inputs(inputs: &[PathBuf]) -> Result<Values<String>> {
    let mut documents = inputs
        .iter()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("failed to read input {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    match documents.len() {
        0 => Err(anyhow!("at least one input document is required")),
        1 => Ok(Values::single(documents.remove(0))),
        _ => Ok(Values::sequence(documents)),
    }
}

fn print_outputs(outputs: Values<String>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for output in outputs {
                println!("{}", output);
            }
        }
        OutputFormat::Json => {
            let payload = json!({ "outputs": outputs.into_vec() });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }
    Ok(())
}

fn write_outputs(
    dir: &Path,
    inputs: &[PathBuf],
    outputs: Values<String>,
    format: OutputFormat,
) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let outputs = outputs.into_vec();
    let targets: Vec<PathBuf> = output_file_names(inputs, outputs.len())
        .into_iter()
        .map(|name| dir.join(name))
        .collect();
    refuse_input_overwrite(dir, &targets, inputs)?;

    let mut written = Vec::with_capacity(outputs.len());
    for (path, output) in targets.into_iter().zip(outputs) {
        fs::write(&path, output)
            .with_context(|| format!("failed to write output {}", path.display()))?;
        written.push(path);
    }

    match format {
        OutputFormat::Text => {
            for path in &written {
                println!("{}", path.display());
            }
        }
        OutputFormat::Json => {
            let files: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
            println!("{}", serde_json::to_string_pretty(&json!({ "files": files }))?);
        }
    }
    Ok(())
}

/// Checked before any output is written so a rejected run leaves every file
/// as it was.
fn refuse_input_overwrite(dir: &Path, targets: &[PathBuf], inputs: &[PathBuf]) -> Result<()> {
    let dir = fs::canonicalize(dir)
        .with_context(|| format!("failed to resolve output directory {}", dir.display()))?;
    let sources: Vec<PathBuf> = inputs
        .iter()
        .filter_map(|path| fs::canonicalize(path).ok())
        .collect();

    for target in targets {
        let resolved = match target.file_name() {
            Some(name) => dir.join(name),
            None => continue,
        };
        if sources.contains(&resolved) {
            return Err(anyhow!(
                "output {} would overwrite input {}; choose a different --output-dir",
                target.display(),
                resolved.display()
            ));
        }
    }
    Ok(())
}

/// Outputs keep their input's file name; when a step changed the number of
/// values they are numbered instead.
fn output_file_names(inputs: &[PathBuf], count: usize) -> Vec<String> {
    let names: Vec<String> = inputs
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();

    let unique = {
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        sorted.len() == names.len()
    };

    if names.len() == count && unique {
        names
    } else {
        (1..=count).map(|index| format!("output-{}.xml", index)).collect()
    }
}
