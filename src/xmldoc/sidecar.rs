//! Sidecar XML documentation file loading.
//!
//! The C# compiler emits one XML file per assembly:
//!
//! ```xml
//! <doc>
//!   <assembly><name>MyLib</name></assembly>
//!   <members>
//!     <member name="M:N.C.Add(System.Int32,System.Int32)">...</member>
//!   </members>
//! </doc>
//! ```
//!
//! Only the member → inner-XML mapping is extracted here; fragment parsing
//! happens per symbol in [`crate::xmldoc::parser`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::xmldoc::{Result, XmlDocError};

/// Parsed sidecar documentation: canonical ID → raw inner XML.
#[derive(Debug, Clone, Default)]
pub struct SidecarDocs {
    pub assembly_name: Option<String>,
    members: HashMap<String, String>,
}

impl SidecarDocs {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);

        let mut docs = SidecarDocs::default();
        let mut in_assembly = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"assembly" => in_assembly = true,
                    b"name" if in_assembly => {
                        let text = reader.read_text(e.name())?;
                        docs.assembly_name = Some(text.trim().to_string());
                    }
                    b"member" => {
                        let Some(id) = member_name(&e)? else {
                            continue;
                        };
                        // Inner markup is preserved verbatim for the
                        // fragment parser.
                        let inner = reader.read_text(e.name())?;
                        docs.members.entry(id).or_insert(inner.into_owned());
                    }
                    _ => {}
                },
                Ok(Event::Empty(e)) => {
                    if e.name().as_ref() == b"member"
                        && let Some(id) = member_name(&e)?
                    {
                        docs.members.entry(id).or_insert_with(String::new);
                    }
                }
                Ok(Event::End(e)) => {
                    if e.name().as_ref() == b"assembly" {
                        in_assembly = false;
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(XmlDocError::Parse(e)),
            }
        }

        Ok(docs)
    }

    pub fn get(&self, doc_id: &str) -> Option<&str> {
        self.members.get(doc_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

fn member_name(e: &quick_xml::events::BytesStart<'_>) -> Result<Option<String>> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"name" {
            let value = attr
                .unescape_value()
                .map_err(|err| XmlDocError::Malformed(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
