//! Parsed xml2rfc tree.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::vocab::Tag;

/// Approximate position of an element in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// 1-based line
    pub line: usize,
    /// 1-based column (bytes)
    pub column: usize,
    /// Byte offset into the decoded input
    pub offset: usize,
}

impl Location {
    /// Create a location.
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "offset {}", self.offset)
        } else {
            write!(f, "line {}, column {}", self.line, self.column)
        }
    }
}

/// Maps byte offsets to line/column pairs.
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(newline_offsets(text));
        Self { line_starts }
    }

    pub(crate) fn locate(&self, offset: usize) -> Location {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let column = offset - self.line_starts[line] + 1;
        Location::new(line + 1, column, offset)
    }
}

fn newline_offsets(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.bytes()
        .enumerate()
        .filter(|(_, b)| *b == b'\n')
        .map(|(i, _)| i + 1)
}

/// An element the parser did not recognise, kept as its flattened text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueNode {
    /// Element name as written in the source
    pub name: String,
    /// Concatenated text content
    pub text: String,
    /// Where the element started
    pub location: Location,
}

/// A child of a [`DocumentNode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A recognised element
    Element(DocumentNode),
    /// Character data
    Text(String),
    /// Unrecognised element preserved as text
    Opaque(OpaqueNode),
}

impl Node {
    /// The element, if this node is one.
    pub fn as_element(&self) -> Option<&DocumentNode> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// A recognised xml2rfc element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNode {
    /// Element kind
    pub tag: Tag,
    /// Attributes, ordered by name
    pub attributes: BTreeMap<String, String>,
    /// Children in document order
    pub children: Vec<Node>,
    /// Where the start tag was found
    pub location: Location,
}

impl DocumentNode {
    /// Create an element with no attributes or children.
    pub fn new(tag: Tag, location: Location) -> Self {
        Self {
            tag,
            attributes: BTreeMap::new(),
            children: Vec::new(),
            location,
        }
    }

    /// Raw attribute lookup. Prefer the typed accessors in [`super::vocab`].
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child elements in order.
    pub fn elements(&self) -> impl Iterator<Item = &DocumentNode> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First child element with the given tag.
    pub fn child(&self, tag: Tag) -> Option<&DocumentNode> {
        self.elements().find(|el| el.tag == tag)
    }

    /// All child elements with the given tag.
    pub fn children_tagged(&self, tag: Tag) -> impl Iterator<Item = &DocumentNode> {
        self.elements().filter(move |el| el.tag == tag)
    }

    /// This element followed by every descendant element, in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// All text beneath this element, including opaque fallbacks.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<&Node> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Opaque(opaque) => out.push_str(&opaque.text),
                Node::Element(el) => stack.extend(el.children.iter().rev()),
            }
        }
        out
    }

    /// Text beneath this element with whitespace collapsed and trimmed.
    pub fn normalized_text(&self) -> String {
        self.text().split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Pre-order iterator over an element subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a DocumentNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a DocumentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let children: Vec<&DocumentNode> = node.elements().collect();
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}
