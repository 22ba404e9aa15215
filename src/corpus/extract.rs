use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use crate::error::{Result, PrepError};

/// Root child holding the free-text clinical note
pub const TEXT_ELEMENT: &str = "TEXT";
/// Root child holding the structured annotations
pub const TAGS_ELEMENT: &str = "TAGS";
/// Temporal link annotation, a direct child of TAGS
pub const TLINK_ELEMENT: &str = "TLINK";

/// One temporal link between two text spans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationAnnotation {
    /// Local id, unique within its source file
    pub id: String,
    /// `fromText` and `toText` joined by a single space
    pub target: String,
    /// Uppercased `type`; never empty
    pub label: String,
}

/// Note text plus the relations extracted from one annotation file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedDocument {
    /// TEXT content with newlines turned into spaces, then trimmed
    pub text: String,
    /// Relations in source order, empty-label links excluded
    pub relations: Vec<RelationAnnotation>,
    /// Number of TLINKs dropped because their type was empty
    pub skipped: usize,
}

#[derive(PartialEq)]
enum Section {
    NotSeen,
    Open,
    Closed,
}

/// Parse a sanitized i2b2 document and pull out its note text and TLINKs.
///
/// `TEXT` and `TAGS` are looked up among the root's direct children (first
/// match wins); TLINKs are the direct children of `TAGS`. The note text is the
/// character data of `TEXT` that precedes its first child element.
pub fn extract_annotations(xml: &str, file: &str) -> Result<AnnotatedDocument> {
    let mut reader = Reader::from_str(xml);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut text_section = Section::NotSeen;
    let mut text: Option<String> = None;
    let mut tags_section = Section::NotSeen;
    let mut relations = Vec::new();
    let mut skipped = 0usize;

    let malformed = |message: String| PrepError::MalformedXml {
        file: file.to_string(),
        message,
    };

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            malformed(format!("{} (at byte {})", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = e.name();
                let name = name.as_ref();

                match depth {
                    0 => {
                        if root_seen {
                            return Err(malformed("content after document element".to_string()));
                        }
                        root_seen = true;
                    }
                    1 => {
                        if name == TEXT_ELEMENT.as_bytes() && text_section == Section::NotSeen {
                            text_section = if is_empty { Section::Closed } else { Section::Open };
                        } else if name == TAGS_ELEMENT.as_bytes() && tags_section == Section::NotSeen {
                            tags_section = if is_empty { Section::Closed } else { Section::Open };
                        }
                    }
                    2 => {
                        if text_section == Section::Open {
                            // character data after TEXT's first child is not note text
                            text_section = Section::Closed;
                        } else if tags_section == Section::Open && name == TLINK_ELEMENT.as_bytes() {
                            match read_tlink(e, file)? {
                                Some(relation) => relations.push(relation),
                                None => skipped += 1,
                            }
                        }
                    }
                    _ => {}
                }

                if !is_empty {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed("unmatched closing tag".to_string()))?;

                if depth == 1 {
                    if text_section == Section::Open {
                        text_section = Section::Closed;
                    }
                    if tags_section == Section::Open {
                        tags_section = Section::Closed;
                    }
                }
            }
            Event::Text(ref e) => {
                if text_section == Section::Open && depth == 2 && !e.is_empty() {
                    text.get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(e));
                } else if depth == 0 && !String::from_utf8_lossy(e).trim().is_empty() {
                    return Err(malformed("text outside the document element".to_string()));
                }
            }
            Event::CData(ref e) => {
                if text_section == Section::Open && depth == 2 && !e.is_empty() {
                    text.get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !root_seen {
        return Err(malformed("no document element".to_string()));
    }
    if depth != 0 {
        return Err(malformed(format!("unexpected end of document ({} unclosed elements)", depth)));
    }

    if text_section == Section::NotSeen {
        return Err(missing_element(file, TEXT_ELEMENT));
    }
    let text = text.ok_or_else(|| PrepError::EmptyText {
        file: file.to_string(),
    })?;
    if tags_section == Section::NotSeen {
        return Err(missing_element(file, TAGS_ELEMENT));
    }

    Ok(AnnotatedDocument {
        text: text.replace('\n', " ").trim().to_string(),
        relations,
        skipped,
    })
}

fn missing_element(file: &str, element: &str) -> PrepError {
    PrepError::MissingElement {
        file: file.to_string(),
        element: element.to_string(),
    }
}

/// Read one TLINK. Returns `None` when its type is empty.
fn read_tlink(element: &BytesStart<'_>, file: &str) -> Result<Option<RelationAnnotation>> {
    let mut id = None;
    let mut from_text = None;
    let mut to_text = None;
    let mut link_type = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| PrepError::MalformedXml {
            file: file.to_string(),
            message: format!("bad attribute on <{}>: {}", TLINK_ELEMENT, e),
        })?;
        let slot = match attr.key.as_ref() {
            b"id" => &mut id,
            b"fromText" => &mut from_text,
            b"toText" => &mut to_text,
            b"type" => &mut link_type,
            _ => continue,
        };
        *slot = Some(attribute_value(&attr.value, file)?);
    }

    let require = |value: Option<String>, attribute: &str| {
        value.ok_or_else(|| PrepError::MissingAttribute {
            file: file.to_string(),
            element: TLINK_ELEMENT.to_string(),
            attribute: attribute.to_string(),
        })
    };

    let id = require(id, "id")?;
    let from_text = require(from_text, "fromText")?;
    let to_text = require(to_text, "toText")?;
    let label = require(link_type, "type")?.to_uppercase();

    if label.is_empty() {
        log::debug!("{}: dropping TLINK {} with empty type", file, id);
        return Ok(None);
    }

    Ok(Some(RelationAnnotation {
        id,
        target: format!("{} {}", from_text, to_text),
        label,
    }))
}

/// Attribute-value normalisation: tab, newline and carriage return become spaces.
/// A raw `<` is not allowed in an attribute value.
fn attribute_value(raw: &[u8], file: &str) -> Result<String> {
    if raw.contains(&b'<') {
        return Err(PrepError::MalformedXml {
            file: file.to_string(),
            message: format!("'<' in attribute value on <{}>", TLINK_ELEMENT),
        });
    }
    Ok(String::from_utf8_lossy(raw).replace(['\t', '\n', '\r'], " "))
}
