//! Side outputs for resolved documents.
//!
//! Besides the .docx package, a resolved [`Document`](crate::Document) can
//! be rendered as kramdown-rfc Markdown or dumped as JSON.
//!
//! # Example
//!
//! ```no_run
//! use xml2docx::{convert_bytes, render::*, ConvertOptions};
//!
//! let xml = std::fs::read("draft.xml")?;
//! let conversion = convert_bytes(&xml)?;
//!
//! // kramdown-rfc Markdown
//! let md = to_markdown(&conversion.document, &ConvertOptions::default())?;
//!
//! // Intermediate representation
//! let json = to_json(&conversion.document, JsonFormat::Pretty)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod json;
mod markdown;

pub use json::{from_json, to_json, JsonFormat};
pub use markdown::to_markdown;
