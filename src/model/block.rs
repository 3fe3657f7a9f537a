//! Semantic blocks: the ordered body of a converted document.

use serde::{Deserialize, Serialize};

use super::{plain_text, Run, Table};

/// Top-level division of an xml2rfc document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Part {
    Front,
    Middle,
    Back,
}

/// How a heading is numbered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberingScheme {
    /// Dotted decimal path: 1, 1.1, 1.1.1
    #[default]
    Section,
    /// Letter first component: A, A.1
    Appendix,
    /// No number; the title is the label
    Unnumbered,
}

/// A section heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Nesting depth, 1 for top-level sections
    pub level: u32,

    /// Title runs
    #[serde(default)]
    pub title: Vec<Run>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,

    #[serde(default)]
    pub scheme: NumberingScheme,

    /// Assigned number ("3.2", "A.1"), set by the resolver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl Heading {
    /// Create an unnumbered heading with plain title text.
    pub fn unnumbered(level: u32, title: impl Into<String>) -> Self {
        Self {
            level,
            title: vec![Run::plain(title)],
            anchor: None,
            scheme: NumberingScheme::Unnumbered,
            number: None,
        }
    }

    /// Plain title text.
    pub fn title_text(&self) -> String {
        plain_text(&self.title)
    }

    /// Style level, capped at 6.
    pub fn style_level(&self) -> u8 {
        self.level.clamp(1, 6) as u8
    }
}

/// What a paragraph is for. Drives its paragraph style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParagraphRole {
    #[default]
    Body,
    /// Document title
    Title,
    /// Right-aligned author, date and metadata lines
    FrontMatter,
    Abstract,
    /// `blockquote` and `aside` content
    Quote,
}

/// A run of inline content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub runs: Vec<Run>,

    #[serde(default)]
    pub role: ParagraphRole,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

impl Paragraph {
    /// Create a paragraph with the given role and runs.
    pub fn new(role: ParagraphRole, runs: Vec<Run>) -> Self {
        Self {
            runs,
            role,
            anchor: None,
        }
    }

    /// Create a paragraph with plain text.
    pub fn with_text(role: ParagraphRole, text: impl Into<String>) -> Self {
        Self::new(role, vec![Run::plain(text)])
    }

    /// Plain text content.
    pub fn plain_text(&self) -> String {
        plain_text(&self.runs)
    }

    /// Check if the paragraph has no runs.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Counter format of an ordered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberFormat {
    #[default]
    Decimal,
    LowerLetter,
    UpperLetter,
    LowerRoman,
    UpperRoman,
}

impl NumberFormat {
    /// WordprocessingML `w:numFmt` value.
    pub fn ooxml_name(&self) -> &'static str {
        match self {
            NumberFormat::Decimal => "decimal",
            NumberFormat::LowerLetter => "lowerLetter",
            NumberFormat::UpperLetter => "upperLetter",
            NumberFormat::LowerRoman => "lowerRoman",
            NumberFormat::UpperRoman => "upperRoman",
        }
    }

    /// Render `n` in this format.
    pub fn format(&self, n: u32) -> String {
        match self {
            NumberFormat::Decimal => n.to_string(),
            NumberFormat::LowerLetter => to_letters(n),
            NumberFormat::UpperLetter => to_letters(n).to_uppercase(),
            NumberFormat::LowerRoman => to_roman(n),
            NumberFormat::UpperRoman => to_roman(n).to_uppercase(),
        }
    }
}

/// 1 → a, 26 → z, 27 → aa.
pub fn to_letters(mut n: u32) -> String {
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn to_roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}

/// Marker kind of a list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ListMarker {
    /// Bullet glyph
    Bullet,
    /// Counter rendered through `template`, where `%d` stands for the number
    Ordered {
        format: NumberFormat,
        template: String,
        start: u32,
    },
    /// Labelled item (`dt`, `hangText`)
    Hanging { label: Vec<Run> },
    /// No marker
    Empty,
}

impl ListMarker {
    /// Whether this marker needs a numbering definition.
    pub fn uses_numbering(&self) -> bool {
        matches!(self, ListMarker::Bullet | ListMarker::Ordered { .. })
    }
}

/// One item (or continuation paragraph) of a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Identifies the list instance; items of one list share it
    pub list_id: usize,

    /// Nesting depth, 0 for top-level lists
    pub depth: u8,

    pub marker: ListMarker,

    #[serde(default)]
    pub runs: Vec<Run>,

    /// Additional paragraph of the previous item; carries no marker
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub continuation: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

/// Source flavour of preformatted content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkKind {
    #[default]
    Art,
    Source,
}

/// Preformatted body of a figure. Whitespace is significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub kind: ArtworkKind,

    /// `type` attribute, e.g. "abnf" or "ascii-art"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Lines with leading whitespace preserved
    #[serde(default)]
    pub lines: Vec<String>,
}

impl Artwork {
    /// Split raw artwork text into lines, dropping the blank lines that
    /// usually surround CDATA content.
    pub fn from_text(kind: ArtworkKind, language: Option<String>, text: &str) -> Self {
        let mut lines: Vec<String> = text
            .lines()
            .map(|l| l.trim_end().replace('\t', "        "))
            .collect();
        while lines.first().is_some_and(|l| l.is_empty()) {
            lines.remove(0);
        }
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        Self {
            kind,
            language,
            lines,
        }
    }
}

/// A figure: caption plus preformatted artwork.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Figure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caption: Vec<Run>,

    #[serde(default)]
    pub artwork: Vec<Artwork>,

    /// Bare artwork outside `figure` is not counted
    #[serde(default)]
    pub numbered: bool,

    /// Assigned figure number, set by the resolver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

/// Normative or informative reference list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceGroup {
    Normative,
    #[default]
    Informative,
}

impl ReferenceGroup {
    /// Guess the group from a `references` title.
    pub fn from_title(title: &str) -> Self {
        let lower = title.to_lowercase();
        if lower.contains("normative") && !lower.contains("informative") {
            ReferenceGroup::Normative
        } else {
            ReferenceGroup::Informative
        }
    }
}

/// One bibliography entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,

    /// Title of the cited work
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Citation text: authors, title, series, date
    #[serde(default)]
    pub citation: Vec<Run>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default)]
    pub group: ReferenceGroup,

    /// "[RFC2119]" or "[3]", set by the resolver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A content block in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    /// Boundary before the blocks of a part
    PartStart { part: Part },
    Heading(Heading),
    Paragraph(Paragraph),
    ListItem(ListItem),
    Table(Table),
    Figure(Figure),
    ReferenceEntry(ReferenceEntry),
}

impl Block {
    /// Anchor this block defines, if any.
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Block::Heading(h) => h.anchor.as_deref(),
            Block::Paragraph(p) => p.anchor.as_deref(),
            Block::ListItem(i) => i.anchor.as_deref(),
            Block::Table(t) => t.anchor.as_deref(),
            Block::Figure(f) => f.anchor.as_deref(),
            Block::ReferenceEntry(r) => r.anchor.as_deref(),
            Block::PartStart { .. } => None,
        }
    }

    /// Every inline run sequence in this block, mutably.
    pub fn runs_mut(&mut self) -> Vec<&mut Vec<Run>> {
        match self {
            Block::Heading(h) => vec![&mut h.title],
            Block::Paragraph(p) => vec![&mut p.runs],
            Block::ListItem(item) => {
                let mut seqs = vec![&mut item.runs];
                if let ListMarker::Hanging { label } = &mut item.marker {
                    seqs.push(label);
                }
                seqs
            }
            Block::Table(t) => {
                let mut seqs = vec![&mut t.caption];
                for row in &mut t.rows {
                    for cell in &mut row.cells {
                        seqs.push(&mut cell.runs);
                    }
                }
                seqs
            }
            Block::Figure(f) => vec![&mut f.caption],
            Block::ReferenceEntry(r) => vec![&mut r.citation],
            Block::PartStart { .. } => Vec::new(),
        }
    }

    /// Plain text of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading(h) => h.title_text(),
            Block::Paragraph(p) => p.plain_text(),
            Block::ListItem(i) => plain_text(&i.runs),
            Block::Table(t) => t.plain_text(),
            Block::Figure(f) => f
                .artwork
                .iter()
                .map(|a| a.lines.join("\n"))
                .collect::<Vec<_>>()
                .join("\n\n"),
            Block::ReferenceEntry(r) => plain_text(&r.citation),
            Block::PartStart { .. } => String::new(),
        }
    }
}
