//! Non-fatal conditions collected during a conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::xml2rfc::Location;

/// Kind of a non-fatal condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// An `xref` names an anchor nothing defines
    UnresolvedReference,
    /// Two elements share an anchor; the first wins
    DuplicateAnchor,
    /// An element outside the vocabulary was kept as text
    UnknownElement,
}

impl DiagnosticKind {
    /// Stable identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnresolvedReference => "unresolved-reference",
            DiagnosticKind::DuplicateAnchor => "duplicate-anchor",
            DiagnosticKind::UnknownElement => "unknown-element",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A warning returned alongside a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// Anchor id or element name the diagnostic is about
    pub subject: String,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    /// An `xref` whose target is not defined.
    pub fn unresolved_reference(anchor: &str) -> Self {
        Self {
            kind: DiagnosticKind::UnresolvedReference,
            subject: anchor.to_string(),
            message: format!("cross-reference target `{}` is not defined", anchor),
            location: None,
        }
    }

    /// A second definition of `anchor`.
    pub fn duplicate_anchor(anchor: &str) -> Self {
        Self {
            kind: DiagnosticKind::DuplicateAnchor,
            subject: anchor.to_string(),
            message: format!("anchor `{}` is defined more than once; keeping the first", anchor),
            location: None,
        }
    }

    /// An element outside the vocabulary.
    pub fn unknown_element(name: &str, location: Location) -> Self {
        Self {
            kind: DiagnosticKind::UnknownElement,
            subject: name.to_string(),
            message: format!("unknown element <{}> kept as text", name),
            location: Some(location),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(location) = self.location {
            write!(f, " ({})", location)?;
        }
        Ok(())
    }
}
