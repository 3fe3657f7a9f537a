//! The xml2rfc element vocabulary and typed attribute accessors.
//!
//! Every attribute the pipeline reads goes through one of the `*Attrs`
//! structs below. Each documents its default for optional attributes, so
//! later stages never do ad hoc string lookups.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{CellAlignment, MAX_SPAN};

use super::node::DocumentNode;

macro_rules! vocabulary {
    ($($variant:ident => [$canonical:literal $(, $alias:literal)*]),+ $(,)?) => {
        /// Recognised xml2rfc element names (v2 and v3).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Tag {
            $($variant),+
        }

        impl Tag {
            /// Look up an element name; `None` for names outside the vocabulary.
            pub fn from_name(name: &str) -> Option<Tag> {
                match name {
                    $($canonical $(| $alias)* => Some(Tag::$variant),)+
                    _ => None,
                }
            }

            /// Canonical element name.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Tag::$variant => $canonical),+
                }
            }
        }
    };
}

vocabulary! {
    Rfc => ["rfc"],
    Front => ["front"],
    Middle => ["middle"],
    Back => ["back"],
    Title => ["title"],
    Author => ["author"],
    Organization => ["organization"],
    Address => ["address"],
    Postal => ["postal"],
    PostalLine => ["postalLine"],
    Street => ["street"],
    City => ["city"],
    Region => ["region"],
    Code => ["code"],
    Country => ["country"],
    Phone => ["phone"],
    Facsimile => ["facsimile"],
    Email => ["email"],
    Uri => ["uri"],
    Date => ["date"],
    Area => ["area"],
    Workgroup => ["workgroup"],
    Keyword => ["keyword"],
    Abstract => ["abstract"],
    Note => ["note"],
    Boilerplate => ["boilerplate"],
    Section => ["section"],
    T => ["t"],
    List => ["list"],
    Ul => ["ul"],
    Ol => ["ol"],
    Li => ["li"],
    Dl => ["dl"],
    Dt => ["dt"],
    Dd => ["dd"],
    Figure => ["figure"],
    Artwork => ["artwork"],
    Sourcecode => ["sourcecode"],
    Preamble => ["preamble"],
    Postamble => ["postamble"],
    Name => ["name"],
    Table => ["table"],
    Thead => ["thead"],
    Tbody => ["tbody"],
    Tfoot => ["tfoot"],
    Tr => ["tr"],
    Th => ["th"],
    Td => ["td"],
    Texttable => ["texttable"],
    Ttcol => ["ttcol"],
    C => ["c"],
    Blockquote => ["blockquote"],
    Aside => ["aside"],
    References => ["references"],
    Referencegroup => ["referencegroup"],
    Reference => ["reference"],
    SeriesInfo => ["seriesInfo"],
    Format => ["format"],
    Annotation => ["annotation"],
    Refcontent => ["refcontent"],
    Xref => ["xref"],
    Eref => ["eref"],
    Iref => ["iref"],
    Cref => ["cref"],
    Spanx => ["spanx"],
    Bold => ["bold", "b"],
    Strong => ["strong"],
    Em => ["em", "i"],
    Tt => ["tt"],
    Sub => ["sub"],
    Sup => ["sup"],
    Bcp14 => ["bcp14"],
    Vspace => ["vspace"],
    Br => ["br"],
}

impl Tag {
    /// Elements that live inside running text.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            Tag::Xref
                | Tag::Eref
                | Tag::Iref
                | Tag::Cref
                | Tag::Spanx
                | Tag::Bold
                | Tag::Strong
                | Tag::Em
                | Tag::Tt
                | Tag::Sub
                | Tag::Sup
                | Tag::Bcp14
                | Tag::Vspace
                | Tag::Br
        )
    }

    /// Elements that break running text into separate blocks.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Tag::T
                | Tag::List
                | Tag::Ul
                | Tag::Ol
                | Tag::Dl
                | Tag::Figure
                | Tag::Artwork
                | Tag::Sourcecode
                | Tag::Table
                | Tag::Texttable
                | Tag::Blockquote
                | Tag::Aside
        )
    }
}

fn non_empty(node: &DocumentNode, name: &str) -> Option<String> {
    node.attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn flag(node: &DocumentNode, name: &str, default: bool) -> bool {
    match node.attr(name).map(str::trim) {
        Some("true") | Some("yes") => true,
        Some("false") | Some("no") => false,
        _ => default,
    }
}

fn required(node: &DocumentNode, name: &str) -> Result<String> {
    non_empty(node, name).ok_or_else(|| {
        Error::InternalModel(format!(
            "validated <{}> at {} lost required attribute `{}`",
            node.tag.name(),
            node.location,
            name
        ))
    })
}

/// Title of an element: the `title` attribute (v2) or a `name` child (v3).
fn title_of(node: &DocumentNode) -> Option<String> {
    non_empty(node, "title").or_else(|| {
        node.child(Tag::Name)
            .map(DocumentNode::normalized_text)
            .filter(|t| !t.is_empty())
    })
}

/// Attributes of the root `rfc` element. All optional, default absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RfcAttrs {
    pub doc_name: Option<String>,
    pub number: Option<String>,
    pub category: Option<String>,
    pub ipr: Option<String>,
    pub submission_type: Option<String>,
    pub obsoletes: Option<String>,
    pub updates: Option<String>,
    /// Declared vocabulary version, "2" or "3"
    pub version: Option<String>,
}

impl RfcAttrs {
    pub fn read(node: &DocumentNode) -> Self {
        Self {
            doc_name: non_empty(node, "docName"),
            number: non_empty(node, "number"),
            category: non_empty(node, "category"),
            ipr: non_empty(node, "ipr"),
            submission_type: non_empty(node, "submissionType"),
            obsoletes: non_empty(node, "obsoletes"),
            updates: non_empty(node, "updates"),
            version: non_empty(node, "version"),
        }
    }
}

/// Attributes of `title`. `abbrev` is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleAttrs {
    pub abbrev: Option<String>,
}

impl TitleAttrs {
    pub fn read(node: &DocumentNode) -> Self {
        Self {
            abbrev: non_empty(node, "abbrev"),
        }
    }
}

/// Attributes of `author`. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorAttrs {
    pub fullname: Option<String>,
    pub initials: Option<String>,
    pub surname: Option<String>,
    pub role: Option<String>,
}

impl AuthorAttrs {
    pub fn read(node: &DocumentNode) -> Self {
        Self {
            fullname: non_empty(node, "fullname"),
            initials: non_empty(node, "initials"),
            surname: non_empty(node, "surname"),
            role: non_empty(node, "role"),
        }
    }

    /// `fullname`, else "initials surname", else `None`.
    pub fn display_name(&self) -> Option<String> {
        if let Some(ref full) = self.fullname {
            return Some(full.clone());
        }
        let parts: Vec<&str> = [self.initials.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Citation form: "Surname, I." when both are known.
    pub fn citation_name(&self) -> Option<String> {
        match (&self.surname, &self.initials) {
            (Some(surname), Some(initials)) => Some(format!("{}, {}", surname, initials)),
            (Some(surname), None) => Some(surname.clone()),
            _ => self.fullname.clone(),
        }
    }
}

/// Attributes of `date`. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateAttrs {
    pub day: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

impl DateAttrs {
    pub fn read(node: &DocumentNode) -> Self {
        Self {
            day: non_empty(node, "day"),
            month: non_empty(node, "month"),
            year: non_empty(node, "year"),
        }
    }

    /// "day month year" with missing parts skipped.
    pub fn display(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.day.as_deref(),
            self.month.as_deref(),
            self.year.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Attributes of `section`, `note` and `abstract`.
///
/// `numbered` defaults to true; `title` is absent when neither the attribute
/// nor a `name` child is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionAttrs {
    pub anchor: Option<String>,
    pub title: Option<String>,
    pub numbered: bool,
}

impl SectionAttrs {
    pub fn read(node: &DocumentNode) -> Self {
        Self {
            anchor: non_empty(node, "anchor"),
            title: title_of(node),
            numbered: flag(node, "numbered", true),
        }
    }
}

/// Attributes of `references`. Title defaults to "References".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencesAttrs {
    pub anchor: Option<String>,
    pub title: String,
}

impl ReferencesAttrs {
    pub fn read(node: &DocumentNode) -> Self {
        Self {
            anchor: non_empty(node, "anchor"),
            title: title_of(node).unwrap_or_else(|| "References".to_string()),
        }
    }
}

/// Attributes of `reference`, `referencegroup` and `format`. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceAttrs {
    pub anchor: Option<String>,
    pub target: Option<String>,
}

impl ReferenceAttrs {
    pub fn read(node: &DocumentNode) -> Self {
        Self {
            anchor: non_empty(node, "anchor"),
            target: non_empty(node, "target"),
        }
    }
}

/// Attributes of `seriesInfo`. Both required in the schema; missing ones
/// default to empty and the entry is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesInfoAttrs {
    pub name: String,
    pub value: String,
}

impl SeriesInfoAttrs {
    pub fn read(node: &DocumentNode) -> Self {
        Self {
            name: non_empty(node, "name").unwrap_or_default(),
            value: non_empty(node, "value").unwrap_or_default(),
        }
    }

    /// "RFC 2119", or `None` when incomplete.
    pub fn display(&self) -> Option<String> {
        if self.name.is_empty() || self.value.is_empty() {
            None
        } else {
            Some(format!("{} {}", self.name, self.value))
        }
    }
}

/// Attributes of `artwork` and `sourcecode`. `language` comes from `type`
/// and is absent when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtworkAttrs {
    pub anchor: Option<String>,
    pub language: Option<String>,
}

impl ArtworkAttrs {
    pub fn read(node: &DocumentNode) -> Self {
        Self {
            anchor: non_empty(node, "anchor"),
            language: non_empty(node, "type"),
        }
    }
}

/// Attributes of `figure` and `table`/`texttable`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloatAttrs {
    pub anchor: Option<String>,
    pub title: Option<String>,
}

impl FloatAttrs {
    pub fn read(node: &DocumentNode) -> Self {
        Self {
            anchor: non_empty(node, "anchor"),
            title: title_of(node),
        }
    }
}

/// Attributes of `t`, `li` and similar text containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextAttrs {
    pub anchor: Option<String>,
    /// v2 hanging-list label
    pub hang_text: Option<String>,
}

impl TextAttrs {
    pub fn read(node: &DocumentNode) -> Self {
        Self {
            anchor: non_empty(node, "anchor"),
            hang_text: non_empty(node, "hangText"),
        }
    }
}

/// Declared style of a list container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStyle {
    /// Bulleted
    Symbols,
    /// 1, 2, 3
    Numbers,
    /// a, b, c
    Letters,
    /// A, B, C
    UpperLetters,
    /// i, ii, iii
    LowerRoman,
    /// I, II, III
    UpperRoman,
    /// Labelled items (`hangText`, `dt`)
    Hanging,
    /// No marker
    Empty,
    /// Custom template such as `R%d:`
    Format(String),
}

/// Attributes of `list`, `ul`, `ol` and `dl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAttrs {
    pub style: ListStyle,
    /// First ordinal, default 1
    pub start: u32,
}

impl ListAttrs {
    /// Read list attributes. A v2 `list` without `style` inherits
    /// `inherited` (its enclosing list's style), else defaults to empty.
    pub fn read(node: &DocumentNode, inherited: Option<&ListStyle>) -> Self {
        let start = node
            .attr("start")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1);

        let style = match node.tag {
            Tag::Ul => {
                if flag(node, "empty", false) {
                    ListStyle::Empty
                } else {
                    ListStyle::Symbols
                }
            }
            Tag::Ol => match node.attr("type").map(str::trim) {
                Some("a") => ListStyle::Letters,
                Some("A") => ListStyle::UpperLetters,
                Some("i") => ListStyle::LowerRoman,
                Some("I") => ListStyle::UpperRoman,
                Some(t) if t.contains('%') => ListStyle::Format(t.to_string()),
                _ => ListStyle::Numbers,
            },
            Tag::Dl => ListStyle::Hanging,
            _ => match node.attr("style").map(str::trim) {
                Some("symbols") => ListStyle::Symbols,
                Some("numbers") => ListStyle::Numbers,
                Some("letters") => ListStyle::Letters,
                Some("hanging") => ListStyle::Hanging,
                Some("empty") => ListStyle::Empty,
                Some(s) if s.starts_with("format ") => {
                    ListStyle::Format(s["format ".len()..].trim().to_string())
                }
                _ => inherited.cloned().unwrap_or(ListStyle::Empty),
            },
        };

        Self { style, start }
    }
}

/// How an `xref` renders its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XrefFormat {
    /// "Section 3.2", "Figure 1", "[RFC2119]"
    #[default]
    Default,
    /// "3.2", "1", "RFC2119"
    Counter,
    /// Target title
    Title,
    /// Element content only
    None,
}

/// Attributes of `xref`. `target` is required; `format` defaults to
/// [`XrefFormat::Default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefAttrs {
    pub target: String,
    pub format: XrefFormat,
}

impl XrefAttrs {
    pub fn read(node: &DocumentNode) -> Result<Self> {
        let format = match node.attr("format").map(str::trim) {
            Some("counter") => XrefFormat::Counter,
            Some("title") => XrefFormat::Title,
            Some("none") => XrefFormat::None,
            _ => XrefFormat::Default,
        };
        Ok(Self {
            target: required(node, "target")?,
            format,
        })
    }
}

/// Attributes of `eref`. `target` is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErefAttrs {
    pub target: String,
}

impl ErefAttrs {
    pub fn read(node: &DocumentNode) -> Result<Self> {
        Ok(Self {
            target: required(node, "target")?,
        })
    }
}

/// Attributes of `cref`. `source` is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrefAttrs {
    pub source: Option<String>,
}

impl CrefAttrs {
    pub fn read(node: &DocumentNode) -> Self {
        Self {
            source: non_empty(node, "source"),
        }
    }
}

/// `spanx` style, default emphasis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpanxStyle {
    #[default]
    Emph,
    Strong,
    Verb,
}

impl SpanxStyle {
    pub fn read(node: &DocumentNode) -> Self {
        match node.attr("style").map(str::trim) {
            Some("strong") => SpanxStyle::Strong,
            Some("verb") => SpanxStyle::Verb,
            _ => SpanxStyle::Emph,
        }
    }
}

/// Alignment of a table column or cell, default left.
pub fn read_alignment(node: &DocumentNode) -> CellAlignment {
    match node.attr("align").map(str::trim) {
        Some("center") => CellAlignment::Center,
        Some("right") => CellAlignment::Right,
        _ => CellAlignment::Left,
    }
}

/// `colspan`/`rowspan`, default 1, clamped to [`MAX_SPAN`].
pub fn read_span(node: &DocumentNode, name: &str) -> u32 {
    node.attr(name)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v >= 1)
        .map_or(1, |v| v.min(MAX_SPAN))
}
