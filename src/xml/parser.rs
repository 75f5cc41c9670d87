//! Book XML parsing into the arena tree.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::Result;
use crate::xml::{Document, NodeData, NodeId};

/// Parse a book XML string into a [`Document`].
///
/// Text is kept verbatim (no trimming): the source files carry significant
/// inter-word whitespace that the normalizer collapses later. Character and
/// entity references are resolved into the adjacent text node.
pub fn parse_document(content: &str) -> Result<Document> {
    let mut reader = Reader::from_str(content);
    let mut doc = Document::new();
    let mut stack: Vec<NodeId> = vec![doc.root()];

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let id = alloc_element(&mut doc, &e);
                let parent = *stack.last().expect("stack never empties below root");
                doc.append_child(parent, id);
                stack.push(id);
            }
            Event::Empty(e) => {
                let id = alloc_element(&mut doc, &e);
                let parent = *stack.last().expect("stack never empties below root");
                doc.append_child(parent, id);
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            Event::Text(e) => {
                let parent = *stack.last().expect("stack never empties below root");
                append_text(&mut doc, parent, &String::from_utf8_lossy(e.as_ref()));
            }
            Event::CData(e) => {
                let parent = *stack.last().expect("stack never empties below root");
                append_text(&mut doc, parent, &String::from_utf8_lossy(&e.into_inner()));
            }
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                if let Some(resolved) = resolve_entity(&entity) {
                    let parent = *stack.last().expect("stack never empties below root");
                    append_text(&mut doc, parent, &resolved);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(doc)
}

/// Allocate an element node from a start/empty tag, pre-extracting classes.
fn alloc_element(doc: &mut Document, e: &quick_xml::events::BytesStart) -> NodeId {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    let mut classes = Vec::new();

    for attr in e.attributes().flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        if key == "class" {
            classes.extend(value.split_ascii_whitespace().map(str::to_string));
        }
        attrs.push((key, value));
    }

    doc.alloc(NodeData::Element {
        name,
        attrs,
        classes,
    })
}

/// Append text under `parent`, merging into a trailing text node when present
/// so entity references don't fragment the text.
fn append_text(doc: &mut Document, parent: NodeId, text: &str) {
    let last = doc.node(parent).last_child;
    if last.is_some()
        && let NodeData::Text(existing) = &mut doc.node_mut(last).data
    {
        existing.push_str(text);
        return;
    }
    let id = doc.alloc(NodeData::Text(text.to_string()));
    doc.append_child(parent, id);
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}
