//! Event-driven xml2rfc reader and structural validation.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::detect::decode_input;
use crate::error::{Error, Result};

use super::node::{DocumentNode, LineIndex, Location, Node, OpaqueNode};
use super::vocab::{ErefAttrs, Tag, XrefAttrs};

/// Parse raw input bytes into a validated tree rooted at `rfc`.
pub fn parse_bytes(data: &[u8]) -> Result<DocumentNode> {
    let text = decode_input(data)?;
    parse_str(&text)
}

/// Parse decoded input into a validated tree rooted at `rfc`.
///
/// # Example
///
/// ```
/// use xml2docx::xml2rfc::{parse_str, Tag};
///
/// let root = parse_str(
///     "<rfc><front><title>T</title><author fullname=\"A\"/></front><middle/></rfc>",
/// )?;
/// assert_eq!(root.tag, Tag::Rfc);
/// # Ok::<(), xml2docx::Error>(())
/// ```
pub fn parse_str(text: &str) -> Result<DocumentNode> {
    let root = read_tree(text)?;
    validate(&root)?;
    Ok(root)
}

/// Deepest element nesting accepted.
pub const MAX_DEPTH: usize = 512;

/// An element that has been opened but not yet closed.
enum Frame {
    Known(DocumentNode),
    Unknown(OpaqueNode),
}

impl Frame {
    fn name(&self) -> &str {
        match self {
            Frame::Known(node) => node.tag.name(),
            Frame::Unknown(opaque) => &opaque.name,
        }
    }
}

fn current_element(stack: &[Frame]) -> String {
    stack
        .last()
        .map(|f| f.name().to_string())
        .unwrap_or_else(|| "rfc".to_string())
}

/// Build the tree with an explicit stack of open elements.
fn read_tree(text: &str) -> Result<DocumentNode> {
    let lines = LineIndex::new(text);
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<DocumentNode> = None;

    loop {
        let offset = reader.buffer_position() as usize;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                let location = lines.locate(reader.error_position() as usize);
                return Err(Error::schema(
                    current_element(&stack),
                    location,
                    format!("malformed XML: {}", e),
                ));
            }
        };

        match event {
            Event::Start(ref e) => {
                let frame = open_frame(e, lines.locate(offset), &stack, root.is_some())?;
                if stack.len() >= MAX_DEPTH {
                    return Err(Error::schema(
                        frame.name(),
                        lines.locate(offset),
                        format!("nesting too deep (more than {} levels)", MAX_DEPTH),
                    ));
                }
                stack.push(frame);
            }
            Event::Empty(ref e) => {
                let frame = open_frame(e, lines.locate(offset), &stack, root.is_some())?;
                close_frame(frame, &mut stack, &mut root);
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| {
                    Error::schema("rfc", lines.locate(offset), "unexpected closing tag")
                })?;
                close_frame(frame, &mut stack, &mut root);
            }
            Event::Text(ref e) => {
                let raw = String::from_utf8_lossy(e);
                let text = unescape(&raw).map_err(|msg| {
                    Error::schema(current_element(&stack), lines.locate(offset), msg)
                })?;
                push_text(&mut stack, &text);
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                push_text(&mut stack, &String::from_utf8_lossy(&raw));
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and DOCTYPE
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        let location = match open {
            Frame::Known(node) => node.location,
            Frame::Unknown(opaque) => opaque.location,
        };
        return Err(Error::schema(
            open.name(),
            location,
            "element is never closed",
        ));
    }

    root.ok_or_else(|| Error::schema("rfc", Location::default(), "document has no root element"))
}

fn open_frame(
    e: &BytesStart<'_>,
    location: Location,
    stack: &[Frame],
    have_root: bool,
) -> Result<Frame> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

    if stack.is_empty() {
        if have_root {
            return Err(Error::schema(name, location, "content after the root element"));
        }
        if name != "rfc" {
            return Err(Error::schema(
                name,
                location,
                "unexpected root element, expected `rfc`",
            ));
        }
    }

    let Some(tag) = Tag::from_name(&name) else {
        log::debug!("preserving unknown element <{}> at {} as text", name, location);
        return Ok(Frame::Unknown(OpaqueNode {
            name,
            text: String::new(),
            location,
        }));
    };

    let mut node = DocumentNode::new(tag, location);
    for attr in e.attributes() {
        let attr = attr.map_err(|err| {
            Error::schema(name.as_str(), location, format!("malformed attribute: {}", err))
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw).map_err(|msg| Error::schema(name.as_str(), location, msg))?;
        node.attributes.insert(key, value.into_owned());
    }
    Ok(Frame::Known(node))
}

fn close_frame(frame: Frame, stack: &mut [Frame], root: &mut Option<DocumentNode>) {
    let Some(parent) = stack.last_mut() else {
        if let Frame::Known(node) = frame {
            *root = Some(node);
        }
        return;
    };

    match (parent, frame) {
        (Frame::Known(parent), Frame::Known(node)) => parent.children.push(Node::Element(node)),
        (Frame::Known(parent), Frame::Unknown(opaque)) => parent.children.push(Node::Opaque(opaque)),
        (Frame::Unknown(parent), Frame::Known(node)) => parent.text.push_str(&node.text()),
        (Frame::Unknown(parent), Frame::Unknown(opaque)) => parent.text.push_str(&opaque.text),
    }
}

fn push_text(stack: &mut [Frame], text: &str) {
    match stack.last_mut() {
        Some(Frame::Known(node)) => {
            if let Some(Node::Text(last)) = node.children.last_mut() {
                last.push_str(text);
            } else {
                node.children.push(Node::Text(text.to_string()));
            }
        }
        Some(Frame::Unknown(opaque)) => opaque.text.push_str(text),
        // Whitespace around the root element
        None => {}
    }
}

/// Unescape XML text, resolving the HTML entity names common in RFC sources.
fn unescape(raw: &str) -> std::result::Result<Cow<'_, str>, String> {
    quick_xml::escape::unescape_with(raw, resolve_entity).map_err(|e| e.to_string())
}

fn resolve_entity(name: &str) -> Option<&'static str> {
    let value = match name {
        "nbsp" => "\u{00A0}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "hellip" => "\u{2026}",
        "copy" => "\u{00A9}",
        "reg" => "\u{00AE}",
        "trade" => "\u{2122}",
        "zwsp" => "\u{200B}",
        "wj" => "\u{2060}",
        "nbhy" => "\u{2011}",
        _ => return None,
    };
    Some(value)
}

/// Minimal required structure plus required attributes.
fn validate(root: &DocumentNode) -> Result<()> {
    let front = root.child(Tag::Front).ok_or_else(|| {
        Error::schema("front", root.location, "missing required element `front` in `rfc`")
    })?;

    if front.child(Tag::Title).is_none() {
        return Err(Error::schema(
            "title",
            front.location,
            "missing required element `title` in `front`",
        ));
    }

    if front.child(Tag::Author).is_none() {
        return Err(Error::schema(
            "author",
            front.location,
            "`front` requires at least one `author`",
        ));
    }

    if root.child(Tag::Middle).is_none() {
        return Err(Error::schema(
            "middle",
            root.location,
            "missing required element `middle` in `rfc`",
        ));
    }

    for node in root.descendants() {
        let missing_target = match node.tag {
            Tag::Xref => XrefAttrs::read(node).is_err(),
            Tag::Eref => ErefAttrs::read(node).is_err(),
            _ => false,
        };
        if missing_target {
            return Err(Error::schema(
                node.tag.name(),
                node.location,
                "missing required attribute `target`",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE rfc SYSTEM "rfc2629.dtd">
<rfc docName="draft-test-00">
  <front>
    <title>Test</title>
    <author fullname="Jane Doe"/>
  </front>
  <middle/>
  <back/>
</rfc>"#;

    #[test]
    fn test_parse_minimal() {
        let root = parse_str(MINIMAL).unwrap();
        assert_eq!(root.tag, Tag::Rfc);
        assert_eq!(root.attr("docName"), Some("draft-test-00"));
        let front = root.child(Tag::Front).unwrap();
        assert_eq!(front.child(Tag::Title).unwrap().text(), "Test");
        assert_eq!(front.location.line, 4);
    }

    #[test]
    fn test_missing_title() {
        let err = parse_str(
            "<rfc><front><author fullname=\"A\"/></front><middle/></rfc>",
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.element(), Some("title"));
    }

    #[test]
    fn test_missing_author_and_front() {
        let err = parse_str("<rfc><front><title>T</title></front><middle/></rfc>").unwrap_err();
        assert_eq!(err.element(), Some("author"));

        let err = parse_str("<rfc><middle/></rfc>").unwrap_err();
        assert_eq!(err.element(), Some("front"));
    }

    #[test]
    fn test_unexpected_root() {
        let err = parse_str("<html><body/></html>").unwrap_err();
        assert_eq!(err.element(), Some("html"));
    }

    #[test]
    fn test_malformed_xml_location() {
        let err = parse_str("<rfc>\n<front>\n<title>T</titel>\n</front></rfc>").unwrap_err();
        match err {
            Error::Schema { location, .. } => assert_eq!(location.line, 3),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unknown_element_is_opaque() {
        let root = parse_str(
            "<rfc><front><title>T</title><author fullname=\"A\"/></front>\
             <middle><section title=\"S\"><t>see <u format=\"num\">U+00E9</u> here</t></section></middle></rfc>",
        )
        .unwrap();
        let t = root
            .descendants()
            .find(|n| n.tag == Tag::T)
            .unwrap();
        assert!(t
            .children
            .iter()
            .any(|c| matches!(c, Node::Opaque(o) if o.name == "u" && o.text == "U+00E9")));
        assert_eq!(t.text(), "see U+00E9 here");
    }

    #[test]
    fn test_xref_without_target() {
        let err = parse_str(
            "<rfc><front><title>T</title><author fullname=\"A\"/></front>\
             <middle><section title=\"S\"><t><xref/></t></section></middle></rfc>",
        )
        .unwrap_err();
        assert_eq!(err.element(), Some("xref"));
    }

    #[test]
    fn test_entities() {
        let root = parse_str(
            "<rfc><front><title>A&nbsp;B &amp; C&mdash;D</title><author fullname=\"A\"/></front><middle/></rfc>",
        )
        .unwrap();
        let title = root.child(Tag::Front).unwrap().child(Tag::Title).unwrap().text();
        assert_eq!(title, "A\u{00A0}B & C\u{2014}D");

        let err = parse_str(
            "<rfc><front><title>&RFC2119;</title><author fullname=\"A\"/></front><middle/></rfc>",
        )
        .unwrap_err();
        assert_eq!(err.element(), Some("title"));
    }

    #[test]
    fn test_nesting_limit() {
        let wrap = |depth: usize| {
            format!(
                "<rfc><front><title>T</title><author fullname=\"A\"/></front><middle>\
                 <section title=\"S\">{}x{}</section></middle></rfc>",
                "<aside>".repeat(depth),
                "</aside>".repeat(depth)
            )
        };

        assert!(parse_str(&wrap(MAX_DEPTH - 10)).is_ok());

        let err = parse_str(&wrap(200_000)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.element(), Some("aside"));
        assert!(err.to_string().contains("nesting too deep"));
    }

    #[test]
    fn test_cdata_preserved() {
        let root = parse_str(
            "<rfc><front><title>T</title><author fullname=\"A\"/></front>\
             <middle><section title=\"S\"><figure><artwork><![CDATA[  a <b>\n  c]]></artwork></figure></section></middle></rfc>",
        )
        .unwrap();
        let art = root.descendants().find(|n| n.tag == Tag::Artwork).unwrap();
        assert_eq!(art.text(), "  a <b>\n  c");
    }
}
