use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{ConvertError, Result};
use crate::parser::types::*;

/// Parse an XML documentation file into a [`Document`].
///
/// Text, CDATA and entity references are merged into text runs; comments,
/// processing instructions and the declaration are dropped.
pub fn parse_document(xml: &str) -> Result<Document> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let lines = LineIndex::new(xml);
    let mut reader = Reader::from_str(xml);

    // The root sits at the bottom of the stack until its end tag pops it
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let offset = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(open_element(&start, lines.position(offset)));
            }
            Event::Empty(start) => {
                let element = open_element(&start, lines.position(offset));
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    ConvertError::MalformedDocument("closing tag without an open element".into())
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => push_text(&mut stack, &String::from_utf8_lossy(&text)),
            Event::CData(data) => push_text(&mut stack, &String::from_utf8_lossy(&data)),
            Event::GeneralRef(entity) => {
                let name = String::from_utf8_lossy(&entity);
                match resolve_entity(&name) {
                    Some(resolved) => push_text(&mut stack, &resolved),
                    None => push_text(&mut stack, &format!("&{};", name)),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ConvertError::MalformedDocument(format!(
            "element <{}> at {} is never closed",
            open.name, open.position
        )));
    }

    root.map(|root| Document { root })
        .ok_or_else(|| ConvertError::MalformedDocument("document has no root element".into()))
}

fn open_element(start: &BytesStart<'_>, position: Position) -> Element {
    let name = start.name();
    let mut element = Element::new(String::from_utf8_lossy(local_name(name.as_ref())));
    element.position = position;

    for attr in start.attributes().flatten() {
        let key = String::from_utf8_lossy(local_name(attr.key.as_ref())).to_string();
        let value = unescape(&String::from_utf8_lossy(&attr.value));
        element.attributes.push((key, value));
    }

    element
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(DocumentNode::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(ConvertError::MalformedDocument(format!(
                "second root element <{}> at {}",
                element.name, element.position
            )))
        }
    }
    Ok(())
}

// Adjacent text pieces (text, entity, text) are merged into one run
fn push_text(stack: &mut [Element], text: &str) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    if let Some(DocumentNode::Text(existing)) = parent.children.last_mut() {
        existing.push_str(text);
    } else {
        parent.children.push(DocumentNode::Text(text.to_string()));
    }
}

/// Extract local name from namespaced XML name (e.g., "xml:lang" -> "lang").
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok()
    } else {
        None
    };

    code.and_then(char::from_u32).map(|c| c.to_string())
}

/// Replace entity references inside an attribute value.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp + 1..];
        match tail.find(';').and_then(|end| Some((end, resolve_entity(&tail[..end])?))) {
            Some((end, resolved)) => {
                out.push_str(&resolved);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Maps byte offsets to 1-based line/column positions.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn position(&self, offset: usize) -> Position {
        let line = match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position {
            line: line + 1,
            column: offset - self.starts[line] + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_with_positions() {
        let xml = "<doc>\n  <members>\n    <member name=\"T:A.B\"/>\n  </members>\n</doc>";
        let doc = parse_document(xml).unwrap();

        assert_eq!(doc.root.name, "doc");
        let member = doc.members().next().unwrap();
        assert_eq!(member.attr("name"), Some("T:A.B"));
        assert_eq!(member.position, Position { line: 3, column: 5 });
    }

    #[test]
    fn merges_entities_into_text() {
        let doc = parse_document("<summary>a &lt; b &amp;&#x41;</summary>").unwrap();
        assert_eq!(doc.root.text_content(), "a < b &A");
        assert_eq!(doc.root.children.len(), 1);
    }

    #[test]
    fn keeps_cdata_verbatim() {
        let doc = parse_document("<code><![CDATA[<Target Name=\"x\"/>]]></code>").unwrap();
        assert_eq!(doc.root.text_content(), "<Target Name=\"x\"/>");
    }

    #[test]
    fn unescapes_attribute_values() {
        let doc = parse_document("<see cref=\"T:List&lt;int&gt;\"/>").unwrap();
        assert_eq!(doc.root.attr("cref"), Some("T:List<int>"));
    }

    #[test]
    fn rejects_unclosed_root() {
        let err = parse_document("<doc><members>").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MalformedDocument(_) | ConvertError::Xml(_)
        ));
    }

    #[test]
    fn skips_declaration_and_bom() {
        let doc = parse_document("\u{feff}<?xml version=\"1.0\"?>\n<doc/>").unwrap();
        assert_eq!(doc.root.name, "doc");
    }
}
