use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::PathBuf;

use crate::cli::commands::{build_inputs, load_options, parse_visibility};
use crate::pipeline::DocPipeline;

#[allow(clippy::too_many_arguments)]
pub fn execute(
    binaries: Vec<PathBuf>,
    xml: Vec<PathBuf>,
    reference: Vec<PathBuf>,
    config: Option<PathBuf>,
    visibility: Vec<String>,
    include_inherited: bool,
    conceptual: Option<PathBuf>,
    out: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let mut options = load_options(config.as_deref())?;

    // CLI flags override the config file
    if !visibility.is_empty() {
        options.included_visibilities = visibility
            .iter()
            .map(|v| parse_visibility(v))
            .collect::<Result<_>>()?;
    }
    if include_inherited {
        options.include_inherited = true;
    }
    if let Some(conceptual_root) = conceptual {
        options.conceptual_docs_enabled = true;
        options.conceptual_path = Some(conceptual_root);
    }

    let inputs = build_inputs(binaries, xml, reference);
    let pipeline = DocPipeline::new();
    let result = pipeline.process(&inputs, &options);

    for diagnostic in &result.diagnostics.diagnostics {
        warn!("{}", diagnostic);
    }

    let json = if format == "json" {
        serde_json::to_string(&result.model)
    } else {
        serde_json::to_string_pretty(&result.model)
    }
    .with_context(|| "Failed to serialize the documentation model to JSON")?;

    if let Some(out_path) = out {
        fs::write(&out_path, json)
            .with_context(|| format!("Failed to write model to {}", out_path.display()))?;
    } else {
        println!("{}", json);
    }

    if result.diagnostics.has_errors() {
        anyhow::bail!(
            "extraction finished with {} error(s)",
            result.diagnostics.error_count()
        );
    }
    Ok(())
}
