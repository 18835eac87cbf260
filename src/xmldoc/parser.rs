//! Per-symbol XML doc comment parsing.
//!
//! Turns the inner XML of one `<member>` element into structured fragments.
//! Inner markup (`<see/>`, `<c>`, `<code>`, lists) is preserved verbatim so
//! downstream transformers can rewrite it; this layer only splits the
//! fragment into its sections.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::xmldoc::{Result, XmlDocError};

#[derive(Debug, Clone, PartialEq)]
pub struct DocException {
    /// Simple type name: the last dot segment of the cref after `T:`
    pub type_name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocTypeParam {
    pub name: String,
    pub description: String,
}

/// Structured doc fragments for one symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocComment {
    pub summary: Option<String>,
    /// Remarks with any nested `<example>` subtrees removed
    pub remarks: Option<String>,
    pub returns: Option<String>,
    pub value: Option<String>,
    pub examples: Option<String>,
    pub exceptions: Vec<DocException>,
    pub type_params: Vec<DocTypeParam>,
    pub see_also: Vec<String>,
    /// Per-parameter docs keyed by parameter name
    pub params: HashMap<String, String>,
}

impl DocComment {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.remarks.is_none()
            && self.returns.is_none()
            && self.value.is_none()
            && self.examples.is_none()
            && self.exceptions.is_empty()
            && self.type_params.is_empty()
            && self.see_also.is_empty()
            && self.params.is_empty()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Parse the inner XML of a `<member>` element. Returns `None` for an input
/// that is blank or carries no recognized sections.
pub fn parse_doc_comment(inner_xml: &str) -> Result<Option<DocComment>> {
    if inner_xml.trim().is_empty() {
        return Ok(None);
    }

    let mut reader = Reader::from_str(inner_xml);
    reader.config_mut().trim_text(false);

    let mut doc = DocComment::default();
    let mut examples: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let tag = e.name().as_ref().to_vec();
                let inner = reader.read_text(e.name())?.into_owned();
                apply_section(&mut doc, &mut examples, &tag, &e, &inner)?;
            }
            Ok(Event::Empty(e)) => {
                let tag = e.name().as_ref().to_vec();
                apply_section(&mut doc, &mut examples, &tag, &e, "")?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(XmlDocError::Parse(e)),
        }
    }

    if !examples.is_empty() {
        doc.examples = Some(examples.join("\n\n"));
    }

    if doc.is_empty() { Ok(None) } else { Ok(Some(doc)) }
}

fn apply_section(
    doc: &mut DocComment,
    examples: &mut Vec<String>,
    tag: &[u8],
    start: &BytesStart<'_>,
    inner: &str,
) -> Result<()> {
    match tag {
        b"summary" => set_text(&mut doc.summary, inner),
        b"returns" => set_text(&mut doc.returns, inner),
        b"value" => set_text(&mut doc.value, inner),
        b"remarks" => {
            let without_examples = strip_element(inner, "example");
            set_text(&mut doc.remarks, &without_examples);
        }
        b"example" => {
            let trimmed = inner.trim();
            if !trimmed.is_empty() {
                examples.push(trimmed.to_string());
            }
        }
        b"param" => {
            if let Some(name) = attribute(start, b"name")? {
                doc.params.entry(name).or_insert(inner.trim().to_string());
            }
        }
        b"typeparam" => {
            if let Some(name) = attribute(start, b"name")? {
                doc.type_params.push(DocTypeParam {
                    name,
                    description: inner.trim().to_string(),
                });
            }
        }
        b"exception" => {
            // Entries without a cref are dropped
            if let Some(cref) = attribute(start, b"cref")? {
                let type_name = exception_type_name(&cref);
                if !type_name.is_empty() {
                    doc.exceptions.push(DocException {
                        type_name,
                        description: inner.trim().to_string(),
                    });
                }
            }
        }
        b"seealso" => {
            if let Some(cref) = attribute(start, b"cref")?
                && !cref.is_empty()
            {
                doc.see_also.push(cref);
            }
        }
        _ => {}
    }
    Ok(())
}

fn set_text(slot: &mut Option<String>, inner: &str) {
    let trimmed = inner.trim();
    if slot.is_none() && !trimmed.is_empty() {
        *slot = Some(trimmed.to_string());
    }
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|err| XmlDocError::Malformed(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// `T:System.ArgumentNullException` → `ArgumentNullException`
fn exception_type_name(cref: &str) -> String {
    let stripped = cref.strip_prefix("T:").unwrap_or(cref);
    stripped
        .rsplit('.')
        .next()
        .unwrap_or(stripped)
        .to_string()
}

/// Remove every `<name>…</name>` (and self-closing `<name/>`) subtree from a
/// raw XML fragment, accounting for nesting.
fn strip_element(content: &str, name: &str) -> String {
    let open = format!("<{}", name);
    let close = format!("</{}>", name);
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = find_element_start(rest, &open) {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        // Self-closing form
        if let Some(end) = after.find('>') {
            if after[..=end].ends_with("/>") {
                rest = &after[end + 1..];
                continue;
            }
        } else {
            // Unterminated tag; keep the remainder as-is
            out.push_str(after);
            return out;
        }
        // Find the matching close tag, skipping nested occurrences
        let mut depth = 1usize;
        let mut cursor = after.find('>').map(|i| i + 1).unwrap_or(after.len());
        loop {
            let nested_open = find_element_start(&after[cursor..], &open);
            let nested_close = after[cursor..].find(&close);
            match (nested_open, nested_close) {
                (Some(o), Some(c)) if o < c => {
                    // A nested self-closing tag opens nothing
                    let nested = &after[cursor + o..];
                    let self_closing = nested
                        .find('>')
                        .map(|i| nested[..=i].ends_with("/>"))
                        .unwrap_or(false);
                    if !self_closing {
                        depth += 1;
                    }
                    cursor += o + open.len();
                }
                (_, Some(c)) => {
                    depth -= 1;
                    cursor += c + close.len();
                    if depth == 0 {
                        break;
                    }
                }
                _ => {
                    // No close tag; drop the rest of the fragment
                    cursor = after.len();
                    break;
                }
            }
        }
        rest = &after[cursor..];
    }
    out.push_str(rest);
    out
}

/// Find `<name` only when followed by a tag-ending character, so `<example>`
/// does not match `<examples>`.
fn find_element_start(content: &str, open: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(idx) = content[from..].find(open) {
        let abs = from + idx;
        let after = content[abs + open.len()..].chars().next();
        match after {
            Some('>') | Some(' ') | Some('\t') | Some('\n') | Some('\r') | Some('/') => {
                return Some(abs);
            }
            _ => from = abs + open.len(),
        }
    }
    None
}
