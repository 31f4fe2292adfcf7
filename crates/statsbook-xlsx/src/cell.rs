//! View over one `<c>` element of a worksheet

use std::sync::Arc;

use statsbook_core::{Address, Value};

use crate::shared_strings::{item_text, text_element, SharedStrings};
use crate::xml::{decode_excel_escapes, XmlElement, XmlNode};

/// Where a cell's formula text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaSource {
    /// `<f>` holds the formula for this cell alone
    Direct(String),
    /// `<f t="shared" si="..">`; only the group's anchor cell carries the
    /// text, the other members refer to it by id
    Shared { id: String, text: Option<String> },
}

/// What the `<v>` (or `<is>`) of a rewritten cell should hold
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StoredValue {
    /// No value at all
    Remove,
    Bool(bool),
    Number(f64),
    /// Index into the shared strings table
    SharedString(usize),
    /// `<is><t>..</t></is>`
    InlineString(String),
    /// Result of a formula that produced text
    FormulaString(String),
    /// Error literal such as `#DIV/0!`
    Error(&'static str),
}

/// One cell of a sheet's grid
#[derive(Debug, Clone)]
pub struct Cell {
    address: Address,
    node: Arc<XmlNode>,
}

impl Cell {
    pub(crate) fn new(address: Address, node: Arc<XmlNode>) -> Self {
        Self { address, node }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// The `<c>` element
    pub fn node(&self) -> &XmlNode {
        &self.node
    }

    pub(crate) fn node_ptr(&self) -> *const XmlNode {
        Arc::as_ptr(&self.node)
    }

    /// Type discriminator (`t` attribute)
    pub fn cell_type(&self) -> Option<&str> {
        self.node.attr("t")
    }

    /// Style index (`s` attribute)
    pub fn style_id(&self) -> Option<u32> {
        self.node.attr("s").and_then(|s| s.parse().ok())
    }

    fn v(&self) -> Option<String> {
        self.node.first_child("v").map(XmlNode::text)
    }

    /// The value stored in the XML, or `None` when the cell holds none
    ///
    /// Formula results are whatever the last application to save the file
    /// cached in `<v>`.
    pub fn literal(&self, strings: &SharedStrings) -> Option<Value> {
        match self.cell_type() {
            Some("s") => {
                let index = self.v()?.trim().parse::<usize>().ok()?;
                strings.get(index).map(Value::from)
            }
            Some("str") => self.v().map(|v| Value::String(decode_excel_escapes(&v))),
            Some("inlineStr") => match self.node.first_child("is") {
                Some(is) => Some(Value::String(item_text(is))),
                None => self.v().map(|v| Value::String(decode_excel_escapes(&v))),
            },
            Some("b") => match self.v()?.trim() {
                "1" | "true" | "TRUE" => Some(Value::Bool(true)),
                "0" | "false" | "FALSE" => Some(Value::Bool(false)),
                _ => None,
            },
            Some("n") => self.v()?.trim().parse::<f64>().ok().map(Value::Number),
            Some("e") | Some("d") => self.v().map(Value::String),
            _ => {
                let v = self.v()?;
                Some(match v.trim().parse::<f64>() {
                    Ok(n) => Value::Number(n),
                    Err(_) => Value::String(v),
                })
            }
        }
    }

    /// The `<f>` of this cell, if any
    pub fn formula_source(&self) -> Option<FormulaSource> {
        let f = self.node.first_child("f")?;
        let text = f.text();
        match (f.attr("t"), f.attr("si")) {
            (Some("shared"), Some(id)) => Some(FormulaSource::Shared {
                id: id.to_string(),
                text: (!text.trim().is_empty()).then_some(text),
            }),
            _ if text.trim().is_empty() => None,
            _ => Some(FormulaSource::Direct(text)),
        }
    }

    pub fn has_formula(&self) -> bool {
        self.formula_source().is_some()
    }

    /// A copy of the `<c>` element holding `stored` instead of its current
    /// value
    ///
    /// The formula and every other child are kept; the value goes right
    /// after the formula.
    pub(crate) fn with_value(&self, stored: &StoredValue) -> XmlNode {
        let mut element = self.node.as_element().cloned().unwrap_or_else(|| {
            XmlElement::new("c").with_attr("r", self.address.to_string())
        });
        element
            .children
            .retain(|child| !child.is_element("v") && !child.is_element("is"));
        let is_formula = self.has_formula();

        let (cell_type, child) = match stored {
            StoredValue::Remove => (None, None),
            StoredValue::Bool(b) => (Some("b"), Some(value_element(if *b { "1" } else { "0" }))),
            StoredValue::Number(n) => (
                (!is_formula).then_some("n"),
                Some(value_element(&n.to_string())),
            ),
            StoredValue::SharedString(i) => (Some("s"), Some(value_element(&i.to_string()))),
            StoredValue::InlineString(s) => (
                Some("inlineStr"),
                Some(XmlElement::new("is").with_child(text_element(s).into())),
            ),
            StoredValue::FormulaString(s) => (Some("str"), Some(value_element(s))),
            StoredValue::Error(e) => (Some("e"), Some(value_element(e))),
        };

        match cell_type {
            Some(t) => element.set_attr("t", t),
            None => element.remove_attr("t"),
        }
        if let Some(child) = child {
            let at = element
                .children
                .iter()
                .position(|c| c.is_element("f"))
                .map_or(0, |f| f + 1);
            element.children.insert(at, Arc::new(child.into()));
        }
        element.into()
    }
}

fn value_element(text: &str) -> XmlElement {
    XmlElement::new("v").with_text(text)
}
