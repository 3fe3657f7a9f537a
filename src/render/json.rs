//! JSON dump of the resolved model.

use crate::error::Result;
use crate::model::Document;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a Document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(doc)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(doc)?,
    };
    Ok(json)
}

/// Parse a dump produced by [`to_json`].
pub fn from_json(json: &str) -> Result<Document> {
    Ok(serde_json::from_str(json)?)
}
