use anyhow::Result;
use log::{info, warn};
use std::path::PathBuf;

use crate::cli::commands::{build_inputs, load_options};
use crate::pipeline::DocPipeline;

pub fn execute(
    binaries: Vec<PathBuf>,
    xml: Vec<PathBuf>,
    reference: Vec<PathBuf>,
    config: Option<PathBuf>,
    target: PathBuf,
) -> Result<()> {
    let options = load_options(config.as_deref())?;
    let inputs = build_inputs(binaries, xml, reference);

    let pipeline = DocPipeline::new();
    let (report, diagnostics) = pipeline.scaffold(&inputs, &options, &target)?;

    for diagnostic in &diagnostics.diagnostics {
        warn!("{}", diagnostic);
    }
    info!(
        "wrote {} placeholder file(s) under {} ({} already present)",
        report.files_written,
        target.display(),
        report.files_skipped
    );
    Ok(())
}
