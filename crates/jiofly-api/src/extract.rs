// Layout-driven fact extraction
//
// A status document is a single root whose direct children are leaves.
// We collect those children once, then resolve every field of the page
// layout against them: first match wins, deeper descendants never match.

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, warn};

use crate::csv;
use crate::page::{FactMap, Field, Page, PageFacts, PageStatus};

/// A direct child of the document root and its text content.
#[derive(Debug, PartialEq, Eq)]
struct Leaf {
    name: String,
    text: String,
}

/// Extract `page`'s facts from `xml`.
///
/// Unparsable input, an empty body, or a document without a root element
/// all yield an empty [`PageStatus::Unavailable`] result.
pub(crate) fn extract(page: Page, xml: &str) -> PageFacts {
    let Some(leaves) = root_children(xml) else {
        debug!(%page, bytes = xml.len(), "no root element, page unavailable");
        return PageFacts::unavailable(page);
    };

    let mut facts = FactMap::new();
    let mut malformed = Vec::new();

    for field in page.fields() {
        let Some(leaf) = leaves.iter().find(|l| l.name == field.element()) else {
            continue;
        };

        match *field {
            Field::Scalar(name) => {
                facts.insert(name.to_owned(), leaf.text.clone());
            }
            Field::Composite { element, facts: names } => {
                match csv::decompose(element, &leaf.text, names) {
                    Ok(pairs) => {
                        for (name, value) in pairs {
                            facts.insert(name.to_owned(), value.to_owned());
                        }
                    }
                    Err(e) => {
                        warn!(%page, error = %e, raw = %leaf.text, "skipping composite field");
                        malformed.push(e);
                    }
                }
            }
        }
    }

    PageFacts {
        page,
        status: PageStatus::Available,
        facts,
        malformed,
    }
}

/// Collect the root element's direct children, in document order.
///
/// Returns `None` when the document is malformed, has no root, or has
/// non-whitespace text outside the root.
fn root_children(xml: &str) -> Option<Vec<Leaf>> {
    let mut reader = Reader::from_str(xml);
    let mut leaves = Vec::new();
    let mut depth = 0usize;
    let mut root_closed = false;
    let mut current: Option<Leaf> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                debug!(error = %e, position = reader.buffer_position(), "XML parse error");
                return None;
            }
        };

        match event {
            // A second top-level element.
            Event::Start(_) | Event::Empty(_) if root_closed => return None,
            Event::Start(e) => {
                if depth == 1 {
                    current = Some(Leaf {
                        name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                        text: String::new(),
                    });
                }
                depth += 1;
            }
            Event::Empty(e) => match depth {
                // `<root/>`: a root with no children.
                0 => root_closed = true,
                1 => leaves.push(Leaf {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    text: String::new(),
                }),
                _ => {}
            },
            Event::End(_) => {
                depth = depth.checked_sub(1)?;
                match depth {
                    0 => root_closed = true,
                    1 => leaves.extend(current.take()),
                    _ => {}
                }
            }
            Event::Text(e) if depth == 0 => {
                if !e.iter().all(u8::is_ascii_whitespace) {
                    debug!(position = reader.buffer_position(), "text outside the root element");
                    return None;
                }
            }
            Event::CData(_) if depth == 0 => return None,
            Event::Text(e) if depth == 2 => {
                let text = match e.unescape() {
                    Ok(text) => text.into_owned(),
                    Err(_) => String::from_utf8_lossy(&e).into_owned(),
                };
                if let Some(leaf) = current.as_mut() {
                    leaf.text.push_str(&text);
                }
            }
            Event::CData(e) if depth == 2 => {
                if let Some(leaf) = current.as_mut() {
                    leaf.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            // Only a document whose root closed is complete.
            Event::Eof => return root_closed.then_some(leaves),
            _ => {}
        }
    }
}
