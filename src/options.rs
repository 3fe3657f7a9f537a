//! Conversion options configuration.

use chrono::{DateTime, Utc};

/// How package entries are stored in the ZIP container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// Deflate every entry
    #[default]
    Deflate,
    /// Store entries uncompressed
    Store,
}

impl Compression {
    pub(crate) fn method(&self) -> zip::CompressionMethod {
        match self {
            Compression::Deflate => zip::CompressionMethod::Deflated,
            Compression::Store => zip::CompressionMethod::Stored,
        }
    }
}

/// Options for a conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// BCP 47 language tag written to the styles and core properties
    pub language: String,

    /// Entry compression
    pub compression: Compression,

    /// Fixed `dcterms:modified` value. `None` uses the current time.
    pub modified: Option<DateTime<Utc>>,

    /// Application name written to `docProps/app.xml`
    pub application: String,

    /// Emit "Workgroup:", "Category:" and "Docname:" lines in the front matter
    pub front_matter_lines: bool,

    /// Column at which Markdown paragraphs wrap
    pub markdown_width: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            compression: Compression::Deflate,
            modified: None,
            application: format!("xml2docx/{}", env!("CARGO_PKG_VERSION")),
            front_matter_lines: true,
            markdown_width: 80,
        }
    }
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set entry compression.
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Pin the modification timestamp for reproducible packages.
    pub fn with_modified(mut self, modified: DateTime<Utc>) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Set the application name.
    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = application.into();
        self
    }

    /// Enable or disable front-matter metadata lines.
    pub fn with_front_matter_lines(mut self, enabled: bool) -> Self {
        self.front_matter_lines = enabled;
        self
    }

    /// Set the Markdown wrap column (minimum 20).
    pub fn with_markdown_width(mut self, width: usize) -> Self {
        self.markdown_width = width.max(20);
        self
    }

    /// Modification timestamp to write.
    pub(crate) fn modified_time(&self) -> DateTime<Utc> {
        self.modified.unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_options() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.language, "en-US");
        assert_eq!(opts.compression, Compression::Deflate);
        assert!(opts.modified.is_none());
        assert!(opts.front_matter_lines);
        assert!(opts.application.starts_with("xml2docx/"));
    }

    #[test]
    fn test_builder_pattern() {
        let pinned = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let opts = ConvertOptions::new()
            .with_language("de-DE")
            .with_compression(Compression::Store)
            .with_modified(pinned)
            .with_front_matter_lines(false);

        assert_eq!(opts.language, "de-DE");
        assert_eq!(opts.compression.method(), zip::CompressionMethod::Stored);
        assert_eq!(opts.modified_time(), pinned);
        assert!(!opts.front_matter_lines);
    }

    #[test]
    fn test_markdown_width_floor() {
        let opts = ConvertOptions::new().with_markdown_width(5);
        assert_eq!(opts.markdown_width, 20);
    }
}
