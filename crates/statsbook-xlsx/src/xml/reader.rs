//! Event-driven parse of an XML part into an [`XmlNode`] tree

use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::node::{XmlElement, XmlNode};
use crate::error::{XlsxError, XlsxResult};

/// Parse a complete document
///
/// Whitespace is kept as character data so that a rewritten part differs
/// from the original only where it was changed. Elements are closed
/// against an explicit stack; an end tag with nothing open, or one that
/// does not match the innermost open element, is [`XlsxError::MalformedXml`].
pub(crate) fn parse_document(bytes: &[u8]) -> XlsxResult<XmlNode> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(false);
    reader.check_end_names(false);

    let mut buf = Vec::new();
    let mut top_level: Vec<Arc<XmlNode>> = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();

    loop {
        let node = match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                stack.push(element(&reader, &e)?);
                None
            }
            Event::Empty(e) => Some(XmlNode::Element(element(&reader, &e)?)),
            Event::End(e) => {
                let qname = e.name();
                let name = reader.decoder().decode(qname.as_ref())?;
                let open = stack.pop().ok_or_else(|| {
                    XlsxError::MalformedXml(format!(
                        "closing </{}> at byte {} with no open element",
                        name,
                        reader.buffer_position()
                    ))
                })?;
                if open.name != name {
                    return Err(XlsxError::MalformedXml(format!(
                        "expected </{}>, found </{}> at byte {}",
                        open.name,
                        name,
                        reader.buffer_position()
                    )));
                }
                Some(XmlNode::Element(open))
            }
            Event::Text(e) => Some(XmlNode::Characters(e.unescape()?.into_owned())),
            Event::CData(e) => Some(XmlNode::CData(
                reader.decoder().decode(&e)?.into_owned(),
            )),
            Event::Comment(e) => Some(XmlNode::Comment(
                reader.decoder().decode(&e)?.into_owned(),
            )),
            Event::Decl(e) => Some(XmlNode::Declaration(
                reader.decoder().decode(&e)?.into_owned(),
            )),
            Event::PI(e) => Some(XmlNode::ProcessingInstruction(
                reader.decoder().decode(&e)?.into_owned(),
            )),
            Event::DocType(e) => Some(XmlNode::DocType(
                reader.decoder().decode(&e)?.trim().to_string(),
            )),
            Event::Eof => break,
        };

        if let Some(node) = node {
            let node = Arc::new(node);
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => top_level.push(node),
            }
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(XlsxError::MalformedXml(format!(
            "element <{}> is never closed",
            open.name
        )));
    }

    Ok(XmlNode::Document(top_level))
}

fn element<R>(reader: &Reader<R>, e: &BytesStart<'_>) -> XlsxResult<XmlElement> {
    let decoder = reader.decoder();
    let mut element = XmlElement::new(decoder.decode(e.name().as_ref())?.into_owned());
    for attr in e.attributes() {
        let attr = attr?;
        let key = decoder.decode(attr.key.as_ref())?.into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}
