//! Non-fatal rendering diagnostics.
//!
//! The pipeline never fails on malformed input that it can step over (an
//! unknown node id, a property the element does not expose, a schema
//! mismatch). Those cases are logged and recorded on the
//! [`Document`](crate::dom::Document) so callers and tests can inspect them.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// An element value did not resolve to a node known to the document.
    UnrecognizedElement,
    /// A property could not be written to an element; the write was skipped.
    PropertyNotWritable,
    /// Props or children do not match the element schema (debug builds only).
    SchemaMismatch,
    /// A tree mutation would have produced an invalid hierarchy.
    HierarchyRequest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub tag: Option<String>,
    pub key: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tag: None,
            key: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub(crate) fn property_not_writable(tag: &str, key: &str) -> Self {
        Self::new(
            DiagnosticKind::PropertyNotWritable,
            "property is not writable on element with the desired tag",
        )
        .with_tag(tag)
        .with_key(key)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        match (&self.tag, &self.key) {
            (Some(tag), Some(key)) => write!(f, " {{ tag: {tag:?}, key: {key:?} }}"),
            (Some(tag), None) => write!(f, " {{ tag: {tag:?} }}"),
            (None, Some(key)) => write!(f, " {{ key: {key:?} }}"),
            (None, None) => Ok(()),
        }
    }
}
