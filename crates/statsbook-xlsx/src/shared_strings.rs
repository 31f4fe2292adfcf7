//! Shared string table (`xl/sharedStrings.xml`)

use std::sync::Arc;

use ahash::AHashMap;
use log::{debug, warn};

use crate::error::XlsxResult;
use crate::xml::{decode_excel_escapes, Rewrite, XmlDocument, XmlElement, XmlNode};

/// The workbook's shared strings, plus any added since loading
#[derive(Debug, Clone, Default)]
pub struct SharedStrings {
    /// Parsed part, or `None` when the package has no shared strings
    doc: Option<XmlDocument>,
    strings: Vec<String>,
    /// First index of each distinct string
    positions: AHashMap<String, usize>,
    /// Number of strings present when the part was loaded
    loaded: usize,
    /// Cell references written through the table since loading
    references: usize,
}

impl SharedStrings {
    /// Parse a shared strings part
    pub fn parse(bytes: &[u8]) -> XlsxResult<Self> {
        let doc = XmlDocument::parse(bytes)?;
        let strings: Vec<String> = doc
            .root_element()
            .map(|sst| sst.all_children("si").map(item_text).collect())
            .unwrap_or_default();

        let mut positions = AHashMap::with_capacity(strings.len());
        for (i, s) in strings.iter().enumerate() {
            positions.entry(s.clone()).or_insert(i);
        }

        debug!("loaded {} shared strings", strings.len());
        Ok(Self {
            loaded: strings.len(),
            doc: Some(doc),
            strings,
            positions,
            references: 0,
        })
    }

    /// Whether the package has a shared strings part to add to
    pub fn has_part(&self) -> bool {
        self.doc.is_some()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// String at `index`
    pub fn get(&self, index: usize) -> Option<&str> {
        let found = self.strings.get(index).map(String::as_str);
        if found.is_none() {
            warn!(
                "shared string index {} out of range ({} strings)",
                index,
                self.strings.len()
            );
        }
        found
    }

    /// Index of the first occurrence of `s`
    pub fn position(&self, s: &str) -> Option<usize> {
        self.positions.get(s).copied()
    }

    /// Index of `s`, appending it when it is not in the table yet
    pub fn intern(&mut self, s: &str) -> usize {
        if let Some(i) = self.position(s) {
            return i;
        }
        let i = self.strings.len();
        self.strings.push(s.to_string());
        self.positions.insert(s.to_string(), i);
        i
    }

    /// Index of `s` for a new `t="s"` cell, appending it when needed
    ///
    /// Every call counts one reference towards the part's `count`.
    pub fn reference(&mut self, s: &str) -> usize {
        self.references += 1;
        self.intern(s)
    }

    /// Like [`SharedStrings::reference`], but only for strings already in
    /// the table
    pub fn reference_existing(&mut self, s: &str) -> Option<usize> {
        let i = self.position(s)?;
        self.references += 1;
        Some(i)
    }

    /// Whether strings or references were added since loading
    pub fn is_modified(&self) -> bool {
        self.strings.len() > self.loaded || self.references > 0
    }

    /// Serialize the part with the added strings appended
    ///
    /// Existing items are kept as they were. `uniqueCount` becomes the new
    /// table size and `count` grows by every reference taken through
    /// [`SharedStrings::reference`] or [`SharedStrings::reference_existing`].
    /// References that a rewritten cell drops are not subtracted.
    /// Returns `None` when there is nothing to write.
    pub fn to_xml(&self) -> Option<String> {
        self.rewrite().map(|doc| doc.to_xml())
    }

    /// Make the table as saved the new baseline
    pub(crate) fn commit(&mut self, doc: XmlDocument) {
        self.doc = Some(doc);
        self.loaded = self.strings.len();
        self.references = 0;
    }

    pub(crate) fn rewrite(&self) -> Option<XmlDocument> {
        let doc = self.doc.as_ref()?;
        if !self.is_modified() {
            return None;
        }
        let added = &self.strings[self.loaded..];
        let rewritten = doc.walk_and_update(|node| {
            if !node.is_element("sst") {
                return Rewrite::Keep;
            }
            let Some(sst) = node.as_element() else {
                return Rewrite::Keep;
            };
            let mut sst = sst.clone();
            let count = sst
                .attributes
                .iter()
                .find(|(k, _)| k == "count")
                .and_then(|(_, v)| v.parse::<usize>().ok())
                .unwrap_or(self.loaded);
            sst.set_attr("count", (count + self.references).to_string());
            sst.set_attr("uniqueCount", self.strings.len().to_string());
            sst.children
                .extend(added.iter().map(|s| Arc::new(XmlNode::from(string_item(s)))));
            Rewrite::Replace(sst.into())
        });
        Some(rewritten)
    }
}

/// Text of an `<si>`: its `<t>`, or the `<t>` of each rich run
///
/// Phonetic runs (`<rPh>`) are not part of the text.
pub(crate) fn item_text(si: &XmlNode) -> String {
    let mut text = String::new();
    for child in si.children() {
        match child.name() {
            Some("t") => text.push_str(&child.text()),
            Some("r") => {
                if let Some(t) = child.first_child("t") {
                    text.push_str(&t.text());
                }
            }
            _ => {}
        }
    }
    decode_excel_escapes(&text)
}

/// `<t>` element for `s`, preserving edge whitespace
pub(crate) fn text_element(s: &str) -> XmlElement {
    let t = XmlElement::new("t");
    let t = if s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) {
        t.with_attr("xml:space", "preserve")
    } else {
        t
    };
    t.with_text(s)
}

fn string_item(s: &str) -> XmlElement {
    XmlElement::new("si").with_child(text_element(s).into())
}
