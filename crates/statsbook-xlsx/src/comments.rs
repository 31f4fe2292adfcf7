//! Comments parts (`xl/commentsN.xml`)

use ahash::AHashMap;
use statsbook_core::{Address, Comment};

use crate::error::XlsxResult;
use crate::shared_strings::item_text;
use crate::xml::XmlDocument;

/// Parse a comments part into comments keyed by (unanchored) cell address
///
/// Authors are resolved by `authorId` through the part's `authors` list.
/// Comments whose `ref` is not a single cell address are ignored.
pub(crate) fn parse_comments(bytes: &[u8]) -> XlsxResult<AHashMap<Address, Comment>> {
    let doc = XmlDocument::parse(bytes)?;
    let mut comments = AHashMap::new();
    let Some(root) = doc.root_element() else {
        return Ok(comments);
    };

    let authors: Vec<String> = root
        .first_child("authors")
        .map(|a| a.all_children("author").map(|n| n.text()).collect())
        .unwrap_or_default();

    let Some(list) = root.first_child("commentList") else {
        return Ok(comments);
    };
    for node in list.all_children("comment") {
        let Some(address) = node.attr("ref").and_then(Address::parse) else {
            continue;
        };
        let author = node
            .attr("authorId")
            .and_then(|id| id.parse::<usize>().ok())
            .and_then(|id| authors.get(id))
            .cloned();
        let text = match node.first_child("text") {
            Some(text) => item_text(text),
            None => node.text(),
        };
        comments.insert(address.unanchored(), Comment { author, text });
    }
    Ok(comments)
}
