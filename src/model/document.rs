//! Document model structures.

use serde::{Deserialize, Serialize};

use super::{Block, Heading, Part};
use crate::detect::Vocabulary;

/// A document author as listed in the front matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name: fullname, else "initials surname"
    pub name: String,

    /// "Surname, I." form for citations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Publication date. Each component is optional in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,

    /// Month name or number as written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

impl DocumentDate {
    /// Month as 1..=12, from a name, a three-letter abbreviation or a number.
    pub fn month_number(&self) -> Option<u32> {
        let month = self.month.as_deref()?.trim().to_lowercase();
        if let Ok(n) = month.parse::<u32>() {
            return (1..=12).contains(&n).then_some(n);
        }
        MONTHS
            .iter()
            .position(|m| *m == month || (month.len() >= 3 && m.starts_with(month.as_str())))
            .map(|i| i as u32 + 1)
    }

    /// "day month year" with missing parts skipped.
    pub fn display(&self) -> String {
        let day = self.day.map(|d| d.to_string());
        let year = self.year.map(|y| y.to_string());
        [day.as_deref(), self.month.as_deref(), year.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// ISO 8601 date when year and month are known; day defaults to 1.
    pub fn iso(&self) -> Option<String> {
        let date = chrono::NaiveDate::from_ymd_opt(
            self.year?,
            self.month_number()?,
            self.day.unwrap_or(1),
        )?;
        Some(date.format("%Y-%m-%d").to_string())
    }
}

/// Front-matter metadata. Feeds the title page and the property parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: String,

    /// `abbrev` attribute of `title`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbrev: Option<String>,

    #[serde(default)]
    pub authors: Vec<Author>,

    /// Distinct organizations, in author order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub organizations: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DocumentDate>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub keywords: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub workgroups: Vec<String>,

    /// Internet-Draft name (`docName`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_name: Option<String>,

    /// RFC number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipr: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_type: Option<String>,
}

impl Metadata {
    /// Author display names joined for `dc:creator`.
    pub fn creators(&self) -> String {
        self.authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A converted document: metadata plus blocks in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata
    pub metadata: Metadata,

    /// Source vocabulary revision
    #[serde(default)]
    pub vocabulary: Vocabulary,

    /// Content blocks
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a content block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Check if the document has no content blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All headings in order.
    pub fn headings(&self) -> impl Iterator<Item = &Heading> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Heading(h) => Some(h),
            _ => None,
        })
    }

    /// Blocks belonging to `part`, excluding the boundary marker itself.
    pub fn part_blocks(&self, part: Part) -> impl Iterator<Item = &Block> {
        let mut current = None;
        self.blocks.iter().filter(move |b| {
            if let Block::PartStart { part: p } = b {
                current = Some(*p);
                return false;
            }
            current == Some(part)
        })
    }

    /// Whether any list item needs a numbering definition.
    pub fn uses_numbering(&self) -> bool {
        self.blocks
            .iter()
            .any(|b| matches!(b, Block::ListItem(item) if item.marker.uses_numbering()))
    }

    /// Block counts by kind.
    pub fn statistics(&self) -> DocumentStatistics {
        let mut stats = DocumentStatistics::default();
        for block in &self.blocks {
            match block {
                Block::Heading(_) => stats.headings += 1,
                Block::Paragraph(_) => stats.paragraphs += 1,
                Block::ListItem(_) => stats.list_items += 1,
                Block::Table(_) => stats.tables += 1,
                Block::Figure(_) => stats.figures += 1,
                Block::ReferenceEntry(_) => stats.references += 1,
                Block::PartStart { .. } => {}
            }
        }
        stats
    }

    /// Extract all text content as a single string.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Block counts, reported by the CLI `info` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStatistics {
    pub headings: usize,
    pub paragraphs: usize,
    pub list_items: usize,
    pub tables: usize,
    pub figures: usize,
    pub references: usize,
}
