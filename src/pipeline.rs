//! The extraction pipeline: loads binaries, builds per-assembly models,
//! relocates extension methods, merges, overlays conceptual content,
//! resolves cross-references and drives the external collaborators.
//!
//! Per-binary work fans out under the `parallel` feature; results merge in
//! input order either way, so output is deterministic. Loaders are cached
//! by binary path for the pipeline's lifetime.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use log::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::collab::{Collaborators, RenderContext, run_enrichers, run_transformers};
use crate::conceptual::overlay::OverlayLoader;
use crate::conceptual::scaffold::{ScaffoldReport, generate_placeholders};
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticCollection};
use crate::metadata::dotscope::DotscopeProvider;
use crate::metadata::errors::MetadataError;
use crate::metadata::loader::{AssemblyLoader, MetadataProvider};
use crate::model::builder::ModelBuilder;
use crate::model::extensions::ExtensionRelocator;
use crate::model::merge::merge_assemblies;
use crate::model::nodes::AssemblyNode;
use crate::options::DocOptions;
use crate::xmldoc::SidecarDocs;
use crate::xref::resolver::CrossReferenceResolver;

/// One (binary, sidecar XML, references) input.
#[derive(Debug, Clone)]
pub struct DocInput {
    pub binary: PathBuf,
    pub xml: Option<PathBuf>,
    pub references: Vec<PathBuf>,
}

impl DocInput {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            xml: None,
            references: Vec::new(),
        }
    }

    pub fn with_xml(mut self, xml: impl Into<PathBuf>) -> Self {
        self.xml = Some(xml.into());
        self
    }

    pub fn with_references(mut self, references: Vec<PathBuf>) -> Self {
        self.references = references;
        self
    }

    /// Use the conventional sidecar next to the binary when none was given.
    pub fn infer_xml(mut self) -> Self {
        if self.xml.is_none() {
            let candidate = self.binary.with_extension("xml");
            if candidate.is_file() {
                self.xml = Some(candidate);
            }
        }
        self
    }
}

/// Cooperative cancellation shared with the host. Checked before each
/// binary, overlay walk and scaffold write.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The merged model plus everything that went wrong along the way. The
/// model is always present, possibly empty; callers decide fatality.
#[derive(Debug, Default)]
pub struct ProcessResult {
    pub model: AssemblyNode,
    pub diagnostics: DiagnosticCollection,
}

pub struct DocPipeline {
    provider: Arc<dyn MetadataProvider>,
    loaders: Mutex<HashMap<PathBuf, Arc<AssemblyLoader>>>,
    cancel: CancelToken,
}

impl Default for DocPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl DocPipeline {
    pub fn new() -> Self {
        Self::with_provider(Arc::new(DotscopeProvider::new()))
    }

    pub fn with_provider(provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            provider,
            loaders: Mutex::new(HashMap::new()),
            cancel: CancelToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run the full pipeline without collaborators.
    pub fn process(&self, inputs: &[DocInput], options: &DocOptions) -> ProcessResult {
        self.process_with(inputs, options, &Collaborators::new(), None)
    }

    /// Run the full pipeline, driving the given collaborators after the
    /// model is complete.
    pub fn process_with(
        &self,
        inputs: &[DocInput],
        options: &DocOptions,
        collaborators: &Collaborators,
        output_root: Option<&Path>,
    ) -> ProcessResult {
        let mut diagnostics = DiagnosticCollection::new();
        let mut model = match self.build_and_merge(inputs, options, &mut diagnostics) {
            Some(model) => model,
            None => return ProcessResult { model: AssemblyNode::default(), diagnostics },
        };

        // Conceptual overlay
        if options.conceptual_docs_enabled
            && let Some(conceptual_root) = options.conceptual_path.clone()
        {
            if self.cancel.is_cancelled() {
                diagnostics.add(Diagnostic::with_default_message(DiagnosticCode::DNE01004));
                return ProcessResult { model, diagnostics };
            }
            let overlay = OverlayLoader::new(options).load(&conceptual_root, &mut model);
            diagnostics.extend(overlay);
        }

        // Cross-reference resolution over the merged model
        let resolver = CrossReferenceResolver::build(&model, options);
        diagnostics.extend(resolver.apply(&mut model, options));

        // Enrichers, transformers, renderers, in that order
        run_enrichers(&mut model, &collaborators.enrichers);
        run_transformers(&mut model, &collaborators.transformers);
        let render_root = output_root
            .map(Path::to_path_buf)
            .or_else(|| options.documentation_root_path.clone());
        if let Some(render_root) = render_root {
            let ctx = RenderContext {
                options,
                output_root: &render_root,
            };
            for renderer in &collaborators.renderers {
                if let Err(e) = renderer.render(&model, &ctx) {
                    warn!("renderer failed: {:#}", e);
                }
            }
        }

        diagnostics.extend(model.diagnostics.clone());
        ProcessResult { model, diagnostics }
    }

    /// Identical to `process` up through merge, then emit the conceptual
    /// placeholder file tree under `root`.
    pub fn scaffold(
        &self,
        inputs: &[DocInput],
        options: &DocOptions,
        root: &Path,
    ) -> anyhow::Result<(ScaffoldReport, DiagnosticCollection)> {
        let mut diagnostics = DiagnosticCollection::new();
        let model = self
            .build_and_merge(inputs, options, &mut diagnostics)
            .unwrap_or_default();
        if self.cancel.is_cancelled() {
            anyhow::bail!("placeholder generation cancelled");
        }
        let report = generate_placeholders(&model, options, root)
            .with_context(|| format!("writing placeholders under {}", root.display()))?;
        Ok((report, diagnostics))
    }

    fn build_and_merge(
        &self,
        inputs: &[DocInput],
        options: &DocOptions,
        diagnostics: &mut DiagnosticCollection,
    ) -> Option<AssemblyNode> {
        if inputs.is_empty() {
            diagnostics.add(
                Diagnostic::error(
                    DiagnosticCode::DNE01002,
                    "no input binaries were provided".to_string(),
                ),
            );
            return None;
        }

        // Per-binary fan-out; merge stays in input order either way.
        #[cfg(feature = "parallel")]
        let results: Vec<Result<AssemblyNode, MetadataError>> = inputs
            .par_iter()
            .map(|input| self.build_one(input, options))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<AssemblyNode, MetadataError>> = inputs
            .iter()
            .map(|input| self.build_one(input, options))
            .collect();

        let mut models = Vec::new();
        for (input, result) in inputs.iter().zip(results) {
            match result {
                Ok(model) => models.push(model),
                Err(e) => {
                    // One binary's failure is isolated; the rest continue
                    diagnostics.add(error_diagnostic(&e, &input.binary));
                }
            }
        }

        merge_assemblies(models).or_else(|| Some(AssemblyNode::default()))
    }

    /// Build one binary's model: load symbols, parse the sidecar, build the
    /// node graph, relocate extension methods.
    fn build_one(
        &self,
        input: &DocInput,
        options: &DocOptions,
    ) -> Result<AssemblyNode, MetadataError> {
        if self.cancel.is_cancelled() {
            return Err(MetadataError::Cancelled);
        }

        let loader = self.loader_for(input)?;

        let mut sidecar_diagnostics = DiagnosticCollection::new();
        let sidecar = match &input.xml {
            Some(xml_path) if xml_path.is_file() => match SidecarDocs::load(xml_path) {
                Ok(docs) => {
                    debug!("loaded {} doc entries from {}", docs.len(), xml_path.display());
                    docs
                }
                Err(e) => {
                    sidecar_diagnostics.add(
                        Diagnostic::warning(DiagnosticCode::DNW01003, e.to_string())
                            .with_subject(xml_path.display().to_string()),
                    );
                    SidecarDocs::empty()
                }
            },
            Some(xml_path) => {
                sidecar_diagnostics.add(
                    Diagnostic::with_default_message(DiagnosticCode::DNW01001)
                        .with_subject(xml_path.display().to_string()),
                );
                SidecarDocs::empty()
            }
            None => {
                sidecar_diagnostics.add(
                    Diagnostic::with_default_message(DiagnosticCode::DNW01001)
                        .with_subject(input.binary.display().to_string()),
                );
                SidecarDocs::empty()
            }
        };

        let builder = ModelBuilder::new(&loader, &sidecar, options);
        let (mut model, type_map) = builder.build_with_type_map();
        model.diagnostics.extend(sidecar_diagnostics);

        ExtensionRelocator::new(options, &type_map).run(&mut model);

        info!(
            "built model for {}: {} namespace(s), {} type(s)",
            model.name,
            model.namespaces.len(),
            model.type_count()
        );
        Ok(model)
    }

    /// Loader cache, keyed by binary path. The lock is held across
    /// creation so each loader is built exactly once; nothing is committed
    /// once cancellation is requested.
    fn loader_for(&self, input: &DocInput) -> Result<Arc<AssemblyLoader>, MetadataError> {
        let mut cache = self.loaders.lock().expect("loader cache poisoned");
        if let Some(loader) = cache.get(&input.binary) {
            return Ok(Arc::clone(loader));
        }

        let loader = Arc::new(AssemblyLoader::new(
            self.provider.as_ref(),
            &input.binary,
            &input.references,
        )?);

        if self.cancel.is_cancelled() {
            return Err(MetadataError::Cancelled);
        }

        cache.insert(input.binary.clone(), Arc::clone(&loader));
        Ok(loader)
    }
}

fn error_diagnostic(error: &MetadataError, binary: &Path) -> Diagnostic {
    let code = match error {
        MetadataError::FileNotFound(_) => DiagnosticCode::DNE01001,
        MetadataError::InvalidArgument(_) => DiagnosticCode::DNE01002,
        MetadataError::Cancelled => DiagnosticCode::DNE01004,
        MetadataError::SymbolResolution(_)
        | MetadataError::Io(_)
        | MetadataError::Dotscope(_) => DiagnosticCode::DNE01003,
    };
    Diagnostic::error(code, error.to_string()).with_subject(binary.display().to_string())
}
