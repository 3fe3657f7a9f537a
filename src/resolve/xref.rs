//! Anchor table and cross-reference rendering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::XrefRun;
use crate::xml2rfc::vocab::XrefFormat;

/// What an anchor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Section,
    Appendix,
    Figure,
    Table,
    Reference,
    /// A paragraph or list item; labelled by its enclosing section
    Paragraph,
}

/// Resolved anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XrefTarget {
    pub kind: TargetKind,
    /// "Section 3.2", "Figure 4", "[RFC2119]"
    pub label: String,
    /// "3.2", "4", "RFC2119"
    pub counter: String,
    /// Heading or caption text
    pub title: String,
}

impl XrefTarget {
    /// Text for `format`.
    pub fn text(&self, format: XrefFormat) -> &str {
        match format {
            XrefFormat::Default => &self.label,
            XrefFormat::Counter => &self.counter,
            XrefFormat::Title => &self.title,
            XrefFormat::None => "",
        }
    }
}

/// Anchor id to resolved target. The first definition of an anchor wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrossReferenceTable {
    entries: HashMap<String, XrefTarget>,
}

impl CrossReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `anchor`. Returns false, leaving the table unchanged, when it
    /// is already defined.
    pub fn insert(&mut self, anchor: &str, target: XrefTarget) -> bool {
        if self.entries.contains_key(anchor) {
            return false;
        }
        self.entries.insert(anchor.to_string(), target);
        true
    }

    pub fn get(&self, anchor: &str) -> Option<&XrefTarget> {
        self.entries.get(anchor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fill in the label of `xref`. Returns false when its target is missing.
    pub fn apply(&self, xref: &mut XrefRun) -> bool {
        match self.entries.get(&xref.target) {
            Some(target) => {
                let text = match xref.content {
                    Some(ref content) => content.clone(),
                    None => target.text(xref.format).to_string(),
                };
                xref.label = Some(text);
                xref.resolved = true;
                true
            }
            None => {
                xref.label = Some(placeholder(&xref.target));
                xref.resolved = false;
                false
            }
        }
    }
}

/// Marker shown in place of an unresolved reference.
pub fn placeholder(anchor: &str) -> String {
    format!("[?{}]", anchor)
}
