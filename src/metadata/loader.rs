use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::metadata::errors::{MetadataError, Result};
use crate::metadata::symbols::{AssemblySymbols, TypeSymbol};

/// Seam to the metadata front-end. One call turns a binary on disk into a
/// self-contained symbol graph; implementations must surface every member
/// regardless of declared visibility (filtering is the model builder's job).
pub trait MetadataProvider: Send + Sync {
    fn load_assembly(&self, path: &Path) -> Result<AssemblySymbols>;
}

/// Loaded symbols for one target binary plus its resolved references.
///
/// The loader owns everything model construction needs; it is cached by the
/// pipeline per target path and torn down with the pipeline.
pub struct AssemblyLoader {
    target: AssemblySymbols,
    referenced: Vec<AssemblySymbols>,
    // full display name -> (assembly index, type index); 0 = target.
    // First write wins, so target types shadow reference types.
    type_index: HashMap<String, (usize, usize)>,
}

impl AssemblyLoader {
    /// Load the target binary and any referenced binaries that exist.
    /// The target must exist; missing references are skipped.
    pub fn new(
        provider: &dyn MetadataProvider,
        target_path: &Path,
        reference_paths: &[PathBuf],
    ) -> Result<Self> {
        if target_path.as_os_str().is_empty() {
            return Err(MetadataError::InvalidArgument(
                "target binary path is blank".to_string(),
            ));
        }
        if !target_path.exists() {
            return Err(MetadataError::FileNotFound(target_path.to_path_buf()));
        }

        let target = provider.load_assembly(target_path)?;
        if target.name.is_empty() {
            return Err(MetadataError::SymbolResolution(
                target_path.display().to_string(),
            ));
        }

        let mut referenced = Vec::new();
        for reference in reference_paths {
            if !reference.exists() {
                debug!("skipping missing reference binary: {}", reference.display());
                continue;
            }
            match provider.load_assembly(reference) {
                Ok(symbols) => referenced.push(symbols),
                Err(e) => {
                    warn!("failed to load reference {}: {}", reference.display(), e);
                }
            }
        }

        let mut type_index = HashMap::new();
        for (asm_idx, asm) in std::iter::once(&target).chain(referenced.iter()).enumerate() {
            for (type_idx, ty) in asm.types.iter().enumerate() {
                type_index
                    .entry(ty.full_name.clone())
                    .or_insert((asm_idx, type_idx));
            }
        }

        Ok(Self {
            target,
            referenced,
            type_index,
        })
    }

    /// Build a loader from pre-extracted symbol graphs. Used by tests and by
    /// hosts that bring their own front-end.
    pub fn from_symbols(target: AssemblySymbols, referenced: Vec<AssemblySymbols>) -> Self {
        let mut type_index = HashMap::new();
        for (asm_idx, asm) in std::iter::once(&target).chain(referenced.iter()).enumerate() {
            for (type_idx, ty) in asm.types.iter().enumerate() {
                type_index
                    .entry(ty.full_name.clone())
                    .or_insert((asm_idx, type_idx));
            }
        }
        Self {
            target,
            referenced,
            type_index,
        }
    }

    pub fn target(&self) -> &AssemblySymbols {
        &self.target
    }

    /// Look up a type by full display name across the target and its
    /// references, target first.
    pub fn find_type(&self, full_name: &str) -> Option<&TypeSymbol> {
        let (asm_idx, type_idx) = *self.type_index.get(full_name)?;
        let asm = if asm_idx == 0 {
            &self.target
        } else {
            &self.referenced[asm_idx - 1]
        };
        asm.types.get(type_idx)
    }

    /// True when the type was declared in the target binary itself.
    pub fn is_target_type(&self, full_name: &str) -> bool {
        matches!(self.type_index.get(full_name), Some((0, _)))
    }
}
