pub mod extract;
pub mod scaffold;

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};

use crate::options::{DocOptions, Visibility};
use crate::pipeline::DocInput;

/// Load options from a JSON or TOML file, chosen by extension.
pub fn load_options(config: Option<&Path>) -> Result<DocOptions> {
    let Some(path) = config else {
        return Ok(DocOptions::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let parsed = if ext == "toml" {
        toml::from_str(&content).map_err(|e| anyhow!(e))?
    } else {
        serde_json::from_str(&content).map_err(|e| anyhow!(e))?
    };
    Ok(parsed)
}

pub fn parse_visibility(value: &str) -> Result<Visibility> {
    Ok(match value.to_ascii_lowercase().as_str() {
        "public" => Visibility::Public,
        "internal" => Visibility::Internal,
        "protected" => Visibility::Protected,
        "protected-or-internal" => Visibility::ProtectedOrInternal,
        "protected-and-internal" => Visibility::ProtectedAndInternal,
        "private" => Visibility::Private,
        other => anyhow::bail!("unknown visibility level '{}'", other),
    })
}

/// Pair binaries with sidecar files by position; unmatched binaries fall
/// back to the conventional `<binary>.xml`.
pub fn build_inputs(binaries: Vec<PathBuf>, xml: Vec<PathBuf>, references: Vec<PathBuf>) -> Vec<DocInput> {
    binaries
        .into_iter()
        .enumerate()
        .map(|(index, binary)| {
            let mut input = DocInput::new(binary).with_references(references.clone());
            match xml.get(index) {
                Some(xml_path) => input.xml = Some(xml_path.clone()),
                None => input = input.infer_xml(),
            }
            input
        })
        .collect()
}
