//! XML node tree

use std::sync::Arc;

/// One node of a parsed XML part
///
/// Trees are never mutated in place. A rewrite builds new nodes along the
/// changed paths and shares every untouched subtree with the original.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// The document itself; its children are the prolog, the root element
    /// and anything after it
    Document(Vec<Arc<XmlNode>>),
    Element(XmlElement),
    /// Character data, unescaped
    Characters(String),
    /// Comment body, kept verbatim
    Comment(String),
    /// CDATA section body, kept verbatim
    CData(String),
    /// Content of the `<?xml ...?>` declaration
    Declaration(String),
    /// Content of a processing instruction
    ProcessingInstruction(String),
    /// Content of a `<!DOCTYPE ...>`
    DocType(String),
}

/// An element with its attributes in document order
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Qualified name, prefix included (`x:c`)
    pub name: String,
    /// Attributes with unescaped values
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Arc<XmlNode>>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an existing one of the same name in place
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(k, _)| k != name);
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Element holding a single text node
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(XmlNode::Characters(text.into()))
    }
}

impl From<XmlElement> for XmlNode {
    fn from(element: XmlElement) -> Self {
        XmlNode::Element(element)
    }
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Element name, or `None` for every other kind of node
    pub fn name(&self) -> Option<&str> {
        self.as_element().map(|e| e.name.as_str())
    }

    pub fn is_element(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.as_element()?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Immediate children; empty for leaves
    pub fn children(&self) -> &[Arc<XmlNode>] {
        match self {
            XmlNode::Document(children) => children,
            XmlNode::Element(e) => &e.children,
            _ => &[],
        }
    }

    /// First immediate child element with this name
    pub fn first_child(&self, name: &str) -> Option<&XmlNode> {
        self.first_child_where(|node| node.is_element(name))
    }

    /// First immediate child matching `predicate`
    pub fn first_child_where<P>(&self, mut predicate: P) -> Option<&XmlNode>
    where
        P: FnMut(&XmlNode) -> bool,
    {
        self.children()
            .iter()
            .map(Arc::as_ref)
            .find(|node| predicate(*node))
    }

    /// Every immediate child element with this name
    pub fn all_children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children()
            .iter()
            .map(Arc::as_ref)
            .filter(move |node| node.is_element(name))
    }

    /// Follow a path of child element names
    pub fn descend(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter()
            .try_fold(self, |node, name| node.first_child(name))
    }

    /// Concatenated character data of this node and its descendants
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            XmlNode::Characters(text) | XmlNode::CData(text) => out.push_str(text),
            XmlNode::Document(_) | XmlNode::Element(_) => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
            _ => {}
        }
    }

    /// Copy of this node with a different child list
    ///
    /// Leaves have no children and are returned unchanged.
    pub fn with_children(&self, children: Vec<Arc<XmlNode>>) -> XmlNode {
        match self {
            XmlNode::Document(_) => XmlNode::Document(children),
            XmlNode::Element(e) => XmlNode::Element(XmlElement {
                name: e.name.clone(),
                attributes: e.attributes.clone(),
                children,
            }),
            other => other.clone(),
        }
    }
}

/// What a rewrite callback wants done with a node
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite {
    /// Leave the node as is and visit its children
    Keep,
    /// Drop the node
    Delete,
    /// Put this node in its place; its children are not visited
    Replace(XmlNode),
}

/// Depth-first rewrite of `node`
///
/// Returns `None` when the node itself is deleted. Subtrees in which
/// nothing changed come back as the same `Arc`.
pub fn walk_and_update<F>(node: &Arc<XmlNode>, f: &mut F) -> Option<Arc<XmlNode>>
where
    F: FnMut(&XmlNode) -> Rewrite,
{
    match f(node.as_ref()) {
        Rewrite::Delete => None,
        Rewrite::Replace(replacement) => Some(Arc::new(replacement)),
        Rewrite::Keep => {
            let children = node.children();
            let mut changed = false;
            let mut rewritten = Vec::with_capacity(children.len());
            for child in children {
                match walk_and_update(child, f) {
                    Some(new) => {
                        changed |= !Arc::ptr_eq(&new, child);
                        rewritten.push(new);
                    }
                    None => changed = true,
                }
            }
            if changed {
                Some(Arc::new(node.with_children(rewritten)))
            } else {
                Some(Arc::clone(node))
            }
        }
    }
}
