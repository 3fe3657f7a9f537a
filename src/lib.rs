//! # xml2docx
//!
//! Convert IETF xml2rfc documents (RFCs and Internet-Drafts, v2 and v3
//! vocabularies) into Office Open XML word-processing packages (.docx).
//!
//! The pipeline runs in four stages, each exposed on its own:
//!
//! 1. [`xml2rfc::parse_bytes`] reads and validates the source tree
//! 2. [`builder::build`] maps it onto the semantic [`Document`] model
//! 3. [`resolve::resolve`] numbers sections, figures, tables and references
//!    and resolves every cross-reference
//! 4. [`docx::serialize`] produces the [`Package`], which is written as a
//!    ZIP container
//!
//! ## Quick Start
//!
//! ```no_run
//! // One call, file to file
//! let diagnostics = xml2docx::convert_file("draft.xml", "draft.docx")?;
//! for d in &diagnostics {
//!     eprintln!("warning: {}", d);
//! }
//! # Ok::<(), xml2docx::Error>(())
//! ```
//!
//! ## Configured Conversions
//!
//! ```no_run
//! use xml2docx::{Compression, ConvertOptions, Converter};
//!
//! let converter = Converter::new(
//!     ConvertOptions::new()
//!         .with_language("en-GB")
//!         .with_compression(Compression::Store),
//! );
//!
//! let xml = std::fs::read("draft.xml")?;
//! let conversion = converter.convert(&xml)?;
//! println!("{} blocks", conversion.document.blocks.len());
//! conversion.save("draft.docx")?;
//! # Ok::<(), xml2docx::Error>(())
//! ```
//!
//! ## Features
//!
//! - `async`: `convert_file_async` with Tokio

pub mod builder;
pub mod container;
pub mod detect;
pub mod diagnostic;
pub mod docx;
pub mod error;
pub mod model;
pub mod options;
pub mod render;
pub mod resolve;
pub mod xml2rfc;

// Re-exports
pub use builder::Built;
pub use container::{Package, Part, Relationship, Relationships};
pub use detect::Vocabulary;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use docx::{SemanticStyle, StylesCatalog};
pub use error::{Error, ErrorKind, Result};
pub use model::{
    Block, Cell, CellAlignment, Document, Heading, ListItem, ListMarker, Metadata, Paragraph,
    Row, Run, Table, TextStyle,
};
pub use options::{Compression, ConvertOptions};

use std::io::{Seek, Write};
use std::path::Path;

/// A reusable converter holding immutable configuration.
///
/// The styles catalog is built once here and shared by every conversion,
/// so one `Converter` can serve many threads.
#[derive(Debug, Clone)]
pub struct Converter {
    options: ConvertOptions,
    styles: StylesCatalog,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

impl Converter {
    /// Create a converter for the given options.
    pub fn new(options: ConvertOptions) -> Self {
        let styles = StylesCatalog::standard(&options.language);
        Self { options, styles }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn styles(&self) -> &StylesCatalog {
        &self.styles
    }

    /// Parse, build and resolve without serializing.
    ///
    /// Diagnostics are the builder's followed by the resolver's.
    pub fn build(&self, data: &[u8]) -> Result<Built> {
        let root = xml2rfc::parse_bytes(data)?;
        let Built {
            mut document,
            mut diagnostics,
        } = builder::build(&root, &self.options)?;

        let resolution = resolve::resolve(&mut document);
        diagnostics.extend(resolution.diagnostics);
        Ok(Built {
            document,
            diagnostics,
        })
    }

    /// Convert xml2rfc source bytes into a validated package.
    pub fn convert(&self, data: &[u8]) -> Result<Conversion> {
        let Built {
            document,
            diagnostics,
        } = self.build(data)?;
        let package = docx::serialize(&document, &self.styles, &self.options)?;

        log::info!(
            "converted \"{}\" ({} blocks, {} diagnostics)",
            document.metadata.title,
            document.blocks.len(),
            diagnostics.len()
        );
        Ok(Conversion {
            document,
            package,
            diagnostics,
        })
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The resolved document model
    pub document: Document,

    /// The generated package, already validated
    pub package: Package,

    /// Non-fatal conditions in document order
    pub diagnostics: Vec<Diagnostic>,
}

impl Conversion {
    /// The ZIP container as bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.package.to_bytes()
    }

    /// Write the ZIP container to a seekable writer.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        self.package.write_to(writer)
    }

    /// Write the ZIP container to `path` atomically.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.package.save(path)
    }
}

/// Convert xml2rfc source bytes with default options.
///
/// # Example
///
/// ```
/// let xml = br#"<rfc><front><title>Hello</title><author fullname="A. Writer"/></front><middle/><back/></rfc>"#;
/// let conversion = xml2docx::convert_bytes(xml)?;
/// assert!(conversion.diagnostics.is_empty());
/// assert!(conversion.package.contains("word/document.xml"));
/// # Ok::<(), xml2docx::Error>(())
/// ```
pub fn convert_bytes(data: &[u8]) -> Result<Conversion> {
    Converter::default().convert(data)
}

/// Convert the file at `input` and write the package to `output`.
///
/// Nothing is written to `output` when the conversion fails.
pub fn convert_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<Vec<Diagnostic>> {
    let data = std::fs::read(input.as_ref())?;
    let conversion = convert_bytes(&data)?;
    conversion.save(output)?;
    Ok(conversion.diagnostics)
}

/// Parse and validate xml2rfc source bytes.
///
/// # Example
///
/// ```
/// let root = xml2docx::parse_bytes(br#"<rfc><front><title>T</title><author fullname="A"/></front><middle/></rfc>"#)?;
/// assert_eq!(root.tag, xml2docx::xml2rfc::Tag::Rfc);
/// # Ok::<(), xml2docx::Error>(())
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<xml2rfc::DocumentNode> {
    xml2rfc::parse_bytes(data)
}

/// Async variant of [`convert_file`]. Input is read with `tokio::fs` and
/// the conversion runs on the blocking pool.
#[cfg(feature = "async")]
pub async fn convert_file_async(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<Vec<Diagnostic>> {
    let data = tokio::fs::read(input.as_ref()).await?;
    let output = output.as_ref().to_path_buf();

    tokio::task::spawn_blocking(move || {
        let conversion = convert_bytes(&data)?;
        conversion.save(&output)?;
        Ok(conversion.diagnostics)
    })
    .await
    .map_err(|e| Error::InternalModel(format!("conversion task failed: {}", e)))?
}
