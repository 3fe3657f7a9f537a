//! Table model structures.

use serde::{Deserialize, Serialize};

use super::{plain_text, Run};

/// Horizontal alignment for table cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl CellAlignment {
    /// WordprocessingML `w:jc` value.
    pub fn ooxml_name(&self) -> &'static str {
        match self {
            CellAlignment::Left => "left",
            CellAlignment::Center => "center",
            CellAlignment::Right => "right",
        }
    }
}

/// Largest column span laid out; wider spans are clamped.
pub const MAX_SPAN: u32 = 64;

/// A cell in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell content
    #[serde(default)]
    pub runs: Vec<Run>,

    /// Horizontal span (colspan)
    #[serde(default = "default_span", skip_serializing_if = "is_default_span")]
    pub col_span: u32,

    /// Vertical span (rowspan)
    #[serde(default = "default_span", skip_serializing_if = "is_default_span")]
    pub row_span: u32,

    /// Horizontal alignment
    #[serde(default, skip_serializing_if = "is_default_cell_alignment")]
    pub alignment: CellAlignment,

    /// Whether this is a header cell
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_header: bool,
}

fn default_span() -> u32 {
    1
}

fn is_default_span(n: &u32) -> bool {
    *n == 1
}

fn is_default_cell_alignment(a: &CellAlignment) -> bool {
    *a == CellAlignment::Left
}

impl Cell {
    /// Create a new empty cell.
    pub fn new() -> Self {
        Self {
            col_span: 1,
            row_span: 1,
            ..Default::default()
        }
    }

    /// Create a cell with text content.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::plain(text)],
            ..Self::new()
        }
    }

    /// Create a header cell with text.
    pub fn header(text: impl Into<String>) -> Self {
        Self {
            is_header: true,
            ..Self::with_text(text)
        }
    }

    /// Get the plain text content.
    pub fn plain_text(&self) -> String {
        plain_text(&self.runs)
    }

    /// Grid columns this cell occupies, between 1 and [`MAX_SPAN`].
    pub fn grid_span(&self) -> usize {
        self.col_span.clamp(1, MAX_SPAN) as usize
    }

    /// Check if this cell spans multiple rows or columns.
    pub fn has_spans(&self) -> bool {
        self.col_span > 1 || self.row_span > 1
    }
}

/// A row in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Cells in this row
    #[serde(default)]
    pub cells: Vec<Cell>,

    /// Whether this is a header row
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_header: bool,
}

impl Row {
    /// Create a new empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a header row.
    pub fn header(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            is_header: true,
        }
    }

    /// Get the effective column count (accounting for spans).
    pub fn effective_columns(&self) -> usize {
        self.cells.iter().map(Cell::grid_span).sum()
    }
}

/// A table with optional caption.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,

    /// Caption runs (`name` or `title`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub caption: Vec<Run>,

    /// Rows in this table
    #[serde(default)]
    pub rows: Vec<Row>,

    /// Assigned table number, set by the resolver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Widest effective row. Rows with spans can be shorter than others.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Row::effective_columns)
            .max()
            .unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check if the table has merged cells.
    pub fn has_merged_cells(&self) -> bool {
        self.rows
            .iter()
            .any(|r| r.cells.iter().any(|c| c.has_spans()))
    }

    /// Tab-separated plain text.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for row in &self.rows {
            let cells: Vec<String> = row.cells.iter().map(|c| c.plain_text()).collect();
            text.push_str(&cells.join("\t"));
            text.push('\n');
        }
        text
    }
}
