//! Collaborator contracts the pipeline exposes to hosts.
//!
//! Renderers, enrichers, transformers and reference handlers are external:
//! the crate defines the seams and the walking drivers, not implementations.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;

use crate::model::nodes::{
    AssemblyNode, EnumValueNode, MemberNode, NamespaceNode, ParameterNode, TypeNode,
};
use crate::options::DocOptions;

/// Borrowed view of one model node, handed to enrichers.
pub enum NodeMut<'a> {
    Assembly(&'a mut AssemblyNode),
    Namespace(&'a mut NamespaceNode),
    Type(&'a mut TypeNode),
    Member(&'a mut MemberNode),
    Parameter(&'a mut ParameterNode),
    EnumValue(&'a mut EnumValueNode),
}

/// May add or overwrite doc fields on any node.
pub trait Enricher: Send + Sync {
    fn enrich(&self, node: NodeMut<'_>);
}

/// Rewrites string doc fields (e.g. XML-to-Markdown conversion). Returning
/// `None` leaves the field untouched.
pub trait Transformer: Send + Sync {
    fn transform(&self, text: &str) -> Option<String>;
}

pub struct RenderContext<'a> {
    pub options: &'a DocOptions,
    pub output_root: &'a Path,
}

/// Produces output files from the merged model.
pub trait Renderer: Send + Sync {
    fn render(&self, model: &AssemblyNode, ctx: &RenderContext<'_>) -> Result<()>;

    /// Placeholder-rendering hook: custom stub body for a conceptual field.
    fn render_placeholder(&self, _node_path: &str, _field: &str) -> Option<String> {
        None
    }

    /// Navigation-combining hook: merge generated navigation into an
    /// existing structure.
    fn combine_navigation(&self, _existing: &str, _generated: &str) -> Option<String> {
        None
    }
}

/// Copies and rewrites a referenced documentation tree. Handlers are keyed
/// by documentation type.
pub trait ReferenceHandler: Send + Sync {
    fn doc_type(&self) -> &str;
    fn handle(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// The ordered collaborator set a host passes into the pipeline.
#[derive(Default)]
pub struct Collaborators {
    pub enrichers: Vec<Box<dyn Enricher>>,
    pub transformers: Vec<Box<dyn Transformer>>,
    pub renderers: Vec<Box<dyn Renderer>>,
    pub reference_handlers: HashMap<String, Box<dyn ReferenceHandler>>,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_enricher(&mut self, enricher: Box<dyn Enricher>) -> &mut Self {
        self.enrichers.push(enricher);
        self
    }

    pub fn add_transformer(&mut self, transformer: Box<dyn Transformer>) -> &mut Self {
        self.transformers.push(transformer);
        self
    }

    pub fn add_renderer(&mut self, renderer: Box<dyn Renderer>) -> &mut Self {
        self.renderers.push(renderer);
        self
    }

    pub fn add_reference_handler(&mut self, handler: Box<dyn ReferenceHandler>) -> &mut Self {
        self.reference_handlers
            .insert(handler.doc_type().to_string(), handler);
        self
    }
}

/// Run every enricher over every node, enrichers in registration order,
/// nodes in stable traversal order.
pub fn run_enrichers(model: &mut AssemblyNode, enrichers: &[Box<dyn Enricher>]) {
    for enricher in enrichers {
        enricher.enrich(NodeMut::Assembly(model));
        for namespace in &mut model.namespaces {
            enricher.enrich(NodeMut::Namespace(namespace));
            for ty in &mut namespace.types {
                enricher.enrich(NodeMut::Type(ty));
                for member in &mut ty.members {
                    enricher.enrich(NodeMut::Member(member));
                    for parameter in &mut member.parameters {
                        enricher.enrich(NodeMut::Parameter(parameter));
                    }
                }
                if let Some(enum_info) = &mut ty.enum_info {
                    for value in &mut enum_info.values {
                        enricher.enrich(NodeMut::EnumValue(value));
                    }
                }
            }
        }
    }
}

/// Run every transformer over every string doc field in the model.
pub fn run_transformers(model: &mut AssemblyNode, transformers: &[Box<dyn Transformer>]) {
    for transformer in transformers {
        let rewrite = |text: &mut String| {
            if let Some(new_text) = transformer.transform(text) {
                *text = new_text;
            }
        };
        model.docs.for_each_text_mut(rewrite);
        for namespace in &mut model.namespaces {
            namespace.docs.for_each_text_mut(rewrite);
            for ty in &mut namespace.types {
                ty.docs.for_each_text_mut(rewrite);
                for member in &mut ty.members {
                    member.docs.for_each_text_mut(rewrite);
                    for parameter in &mut member.parameters {
                        parameter.docs.for_each_text_mut(rewrite);
                    }
                }
                if let Some(enum_info) = &mut ty.enum_info {
                    for value in &mut enum_info.values {
                        value.docs.for_each_text_mut(rewrite);
                    }
                }
            }
        }
    }
}
