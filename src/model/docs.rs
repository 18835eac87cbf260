//! Shared documentation record embedded in every model node.

use serde::{Deserialize, Serialize};

use crate::xmldoc::DocComment;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExceptionDoc {
    pub type_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeParamDoc {
    pub name: String,
    pub description: String,
}

/// Doc fragments plus conceptual-overlay fields, carried by every node.
/// Kept as one concrete struct rather than a polymorphic hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocFields {
    pub summary: Option<String>,
    pub remarks: Option<String>,
    pub returns: Option<String>,
    pub value: Option<String>,
    pub examples: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<ExceptionDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParamDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub see_also: Vec<String>,

    // Conceptual overlay
    pub usage: Option<String>,
    pub best_practices: Option<String>,
    pub patterns: Option<String>,
    pub considerations: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_apis: Vec<String>,
}

impl DocFields {
    /// Weave parsed XML fragments into this record. Parameter docs are
    /// attached separately, on the parameter nodes themselves.
    pub fn apply_comment(&mut self, comment: &DocComment) {
        self.summary = comment.summary.clone();
        self.remarks = comment.remarks.clone();
        self.returns = comment.returns.clone();
        self.value = comment.value.clone();
        self.examples = comment.examples.clone();
        self.exceptions = comment
            .exceptions
            .iter()
            .map(|e| ExceptionDoc {
                type_name: e.type_name.clone(),
                description: e.description.clone(),
            })
            .collect();
        self.type_params = comment
            .type_params
            .iter()
            .map(|tp| TypeParamDoc {
                name: tp.name.clone(),
                description: tp.description.clone(),
            })
            .collect();
        self.see_also = comment.see_also.clone();
    }

    /// Sparse merge: fill empty fields from `other`, never overwrite
    /// non-empty ones.
    pub fn fill_from(&mut self, other: &DocFields) {
        fn fill(slot: &mut Option<String>, src: &Option<String>) {
            if slot.is_none() && src.is_some() {
                *slot = src.clone();
            }
        }
        fill(&mut self.summary, &other.summary);
        fill(&mut self.remarks, &other.remarks);
        fill(&mut self.returns, &other.returns);
        fill(&mut self.value, &other.value);
        fill(&mut self.examples, &other.examples);
        fill(&mut self.usage, &other.usage);
        fill(&mut self.best_practices, &other.best_practices);
        fill(&mut self.patterns, &other.patterns);
        fill(&mut self.considerations, &other.considerations);
        if self.exceptions.is_empty() {
            self.exceptions = other.exceptions.clone();
        }
        if self.type_params.is_empty() {
            self.type_params = other.type_params.clone();
        }
        if self.see_also.is_empty() {
            self.see_also = other.see_also.clone();
        }
        if self.related_apis.is_empty() {
            self.related_apis = other.related_apis.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.remarks.is_none()
            && self.returns.is_none()
            && self.value.is_none()
            && self.examples.is_none()
            && self.exceptions.is_empty()
            && self.type_params.is_empty()
            && self.see_also.is_empty()
            && self.usage.is_none()
            && self.best_practices.is_none()
            && self.patterns.is_none()
            && self.considerations.is_none()
            && self.related_apis.is_empty()
    }

    /// Visit every string doc field, for transformers that rewrite markup.
    pub fn for_each_text_mut(&mut self, mut f: impl FnMut(&mut String)) {
        for slot in [
            &mut self.summary,
            &mut self.remarks,
            &mut self.returns,
            &mut self.value,
            &mut self.examples,
            &mut self.usage,
            &mut self.best_practices,
            &mut self.patterns,
            &mut self.considerations,
        ] {
            if let Some(text) = slot.as_mut() {
                f(text);
            }
        }
        for exception in &mut self.exceptions {
            f(&mut exception.description);
        }
        for tp in &mut self.type_params {
            f(&mut tp.description);
        }
    }
}
