//! Minimal XML tree for package parts
//!
//! Parts are parsed into an immutable [`XmlNode`] tree, queried through
//! immediate-child lookups, and rewritten with [`XmlDocument::walk_and_update`],
//! which shares every subtree it leaves alone.

mod node;
mod reader;
mod text;
mod writer;

use std::sync::Arc;

pub use node::{walk_and_update, Rewrite, XmlElement, XmlNode};
pub use text::decode_excel_escapes;
pub(crate) use text::escape_text;

use crate::error::XlsxResult;

/// A parsed XML part
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    root: Arc<XmlNode>,
}

impl XmlDocument {
    /// Parse a part's bytes
    pub fn parse(bytes: &[u8]) -> XlsxResult<Self> {
        Ok(Self {
            root: Arc::new(reader::parse_document(bytes)?),
        })
    }

    /// The document node
    pub fn node(&self) -> &XmlNode {
        &self.root
    }

    /// The single top-level element
    pub fn root_element(&self) -> Option<&XmlNode> {
        self.root.first_child_where(|node| node.as_element().is_some())
    }

    /// Produce a rewritten document; see [`Rewrite`]
    ///
    /// The document node itself is passed to `f` first. Deleting it leaves
    /// an empty document.
    pub fn walk_and_update<F>(&self, mut f: F) -> XmlDocument
    where
        F: FnMut(&XmlNode) -> Rewrite,
    {
        let root = walk_and_update(&self.root, &mut f)
            .unwrap_or_else(|| Arc::new(XmlNode::Document(Vec::new())));
        XmlDocument { root }
    }

    /// Whether `other` is this very tree (no rewrite changed anything)
    pub fn is_same_tree(&self, other: &XmlDocument) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Serialize to markup
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        writer::write_node(&self.root, &mut out);
        out
    }
}
