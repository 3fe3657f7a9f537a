//! Inline runs: styled text, cross-references, links and breaks.

use serde::{Deserialize, Serialize};

use crate::xml2rfc::vocab::XrefFormat;

/// Character-level formatting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,

    /// Italic text
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,

    /// Code/monospace font
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub code: bool,

    /// Superscript
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub superscript: bool,

    /// Subscript
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub subscript: bool,
}

impl TextStyle {
    /// Create a bold style.
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Default::default()
        }
    }

    /// Create an italic style.
    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Default::default()
        }
    }

    /// Check if style has any formatting.
    pub fn has_formatting(&self) -> bool {
        self.bold || self.italic || self.code || self.superscript || self.subscript
    }
}

fn is_plain(style: &TextStyle) -> bool {
    !style.has_formatting()
}

/// A cross-reference to an anchor elsewhere in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XrefRun {
    /// Anchor id being referenced
    pub target: String,

    /// Requested rendering
    #[serde(default)]
    pub format: XrefFormat,

    /// Element content, when the author supplied text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Final display text, filled in by the resolver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Whether the target exists
    #[serde(default)]
    pub resolved: bool,

    #[serde(default, skip_serializing_if = "is_plain")]
    pub style: TextStyle,
}

impl XrefRun {
    /// An unresolved reference to `target`.
    pub fn new(target: impl Into<String>, format: XrefFormat) -> Self {
        Self {
            target: target.into(),
            format,
            content: None,
            label: None,
            resolved: false,
            style: TextStyle::default(),
        }
    }

    /// Text shown for this reference.
    pub fn display_text(&self) -> &str {
        self.label
            .as_deref()
            .or(self.content.as_deref())
            .unwrap_or(&self.target)
    }
}

/// One inline element inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Run {
    /// Literal text
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "is_plain")]
        style: TextStyle,
    },
    /// Internal cross-reference
    Xref(XrefRun),
    /// External hyperlink
    Link {
        url: String,
        text: String,
        #[serde(default, skip_serializing_if = "is_plain")]
        style: TextStyle,
    },
    /// Line break
    Break,
}

impl Run {
    /// Create a plain text run with no styling.
    pub fn plain(text: impl Into<String>) -> Self {
        Run::Text {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a styled text run.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Run::Text {
            text: text.into(),
            style,
        }
    }

    /// Create a hyperlink run. Empty `text` displays the URL.
    pub fn link(url: impl Into<String>, text: impl Into<String>) -> Self {
        let url = url.into();
        let text = text.into();
        Run::Link {
            text: if text.trim().is_empty() { url.clone() } else { text },
            url,
            style: TextStyle::default(),
        }
    }

    /// Text this run displays.
    pub fn display_text(&self) -> &str {
        match self {
            Run::Text { text, .. } | Run::Link { text, .. } => text,
            Run::Xref(xref) => xref.display_text(),
            Run::Break => "\n",
        }
    }

    /// Formatting applied to this run.
    pub fn style(&self) -> TextStyle {
        match self {
            Run::Text { style, .. } | Run::Link { style, .. } => *style,
            Run::Xref(xref) => xref.style,
            Run::Break => TextStyle::default(),
        }
    }

    /// Check if this run is an empty text run.
    pub fn is_empty(&self) -> bool {
        matches!(self, Run::Text { text, .. } if text.is_empty())
    }
}

/// Concatenated display text of a run sequence.
pub fn plain_text(runs: &[Run]) -> String {
    runs.iter().map(Run::display_text).collect()
}

/// Whitespace that collapses. No-break spaces are content.
fn is_collapsible(c: char) -> bool {
    c.is_whitespace() && !matches!(c, '\u{00A0}' | '\u{2007}' | '\u{202F}')
}

/// Collapse whitespace runs to one space across run boundaries and trim
/// around the paragraph edges and line breaks. Empty text runs are dropped.
pub fn normalize_whitespace(runs: &mut Vec<Run>) {
    let mut prev_space = true;
    for run in runs.iter_mut() {
        match run {
            Run::Text { text, .. } | Run::Link { text, .. } => {
                let mut out = String::with_capacity(text.len());
                for c in text.chars() {
                    if is_collapsible(c) {
                        if !prev_space {
                            out.push(' ');
                            prev_space = true;
                        }
                    } else {
                        out.push(c);
                        prev_space = false;
                    }
                }
                *text = out;
            }
            Run::Xref(_) => prev_space = false,
            Run::Break => prev_space = true,
        }
    }

    runs.retain(|r| !r.is_empty());

    let len = runs.len();
    for i in 0..len {
        let at_edge = i + 1 == len || matches!(runs[i + 1], Run::Break);
        if at_edge {
            if let Run::Text { text, .. } = &mut runs[i] {
                let trimmed = text.trim_end_matches(' ').len();
                text.truncate(trimmed);
            }
        }
    }

    runs.retain(|r| !r.is_empty());
}

/// Merge consecutive text runs with the same style.
pub fn merge_adjacent_runs(runs: &mut Vec<Run>) {
    if runs.len() <= 1 {
        return;
    }

    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs.drain(..) {
        if let (
            Some(Run::Text {
                text: last_text,
                style: last_style,
            }),
            Run::Text { text, style },
        ) = (merged.last_mut(), &run)
        {
            if last_style == style {
                last_text.push_str(text);
                continue;
            }
        }
        merged.push(run);
    }
    *runs = merged;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_style() {
        let style = TextStyle::bold();
        assert!(style.bold);
        assert!(style.has_formatting());
        assert!(!TextStyle::default().has_formatting());
    }

    #[test]
    fn test_normalize_whitespace() {
        let mut runs = vec![
            Run::plain("\n   Hello   "),
            Run::styled("  big ", TextStyle::bold()),
            Run::plain("\tworld\n  "),
        ];
        normalize_whitespace(&mut runs);
        assert_eq!(plain_text(&runs), "Hello big world");
        assert_eq!(runs[1], Run::styled("big ", TextStyle::bold()));
    }

    #[test]
    fn test_normalize_keeps_nbsp() {
        let mut runs = vec![Run::plain("RFC\u{00A0}2119  ")];
        normalize_whitespace(&mut runs);
        assert_eq!(plain_text(&runs), "RFC\u{00A0}2119");
    }

    #[test]
    fn test_normalize_around_break() {
        let mut runs = vec![Run::plain("line one  "), Run::Break, Run::plain("  line two")];
        normalize_whitespace(&mut runs);
        assert_eq!(plain_text(&runs), "line one\nline two");
    }

    #[test]
    fn test_merge_adjacent_runs() {
        let mut runs = vec![
            Run::plain("a"),
            Run::plain("b"),
            Run::styled("c", TextStyle::italic()),
            Run::styled("d", TextStyle::italic()),
            Run::Xref(XrefRun::new("x", XrefFormat::Default)),
            Run::plain("e"),
        ];
        merge_adjacent_runs(&mut runs);
        assert_eq!(runs.len(), 4);
        assert_eq!(runs[0], Run::plain("ab"));
        assert_eq!(runs[1], Run::styled("cd", TextStyle::italic()));
    }

    #[test]
    fn test_xref_display() {
        let mut xref = XrefRun::new("sec-2", XrefFormat::Default);
        assert_eq!(xref.display_text(), "sec-2");
        xref.label = Some("Section 2".into());
        assert_eq!(xref.display_text(), "Section 2");
    }
}
