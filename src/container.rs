//! ZIP container writer for OOXML packages.
//!
//! A [`Package`] is an ordered set of named parts plus the relationships
//! between them. The content-types manifest and the `.rels` parts are derived
//! from that set when the package is written, so they cannot drift from the
//! parts that actually exist; [`Package::validate`] checks the remaining
//! invariants (every internal relationship resolves, every part is reachable).

use crate::error::{Error, Result};
use crate::options::Compression;
use quick_xml::escape::escape;
use std::collections::{BTreeMap, HashSet};
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Content type of `.rels` parts.
pub const RELATIONSHIPS_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-package.relationships+xml";

/// Name of the content-types manifest entry.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// A relationship entry of a .rels part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, relative to the source part's directory, or a URL
    pub target: String,
    /// Whether the target lives outside the package
    pub external: bool,
}

/// Relationships of one source part, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    items: Vec<Relationship>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an internal relationship and return its generated ID.
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        self.push(rel_type, target, false)
    }

    /// Add a relationship to an external URL and return its generated ID.
    pub fn add_external(&mut self, rel_type: &str, url: &str) -> String {
        // Identical links share one relationship
        if let Some(existing) = self
            .items
            .iter()
            .find(|r| r.external && r.rel_type == rel_type && r.target == url)
        {
            return existing.id.clone();
        }
        self.push(rel_type, url, true)
    }

    fn push(&mut self, rel_type: &str, target: &str, external: bool) -> String {
        let id = format!("rId{}", self.items.len() + 1);
        self.items.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            external,
        });
        id
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.id == id)
    }

    /// Get relationships by type.
    pub fn get_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.items.iter().filter(|r| r.rel_type == rel_type).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialize as a `.rels` part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.items.len() * 160);
        xml.push_str(XML_DECLARATION);
        xml.push_str(
            "\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
        );
        for rel in &self.items {
            xml.push_str(&format!(
                "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"{}/>",
                rel.id,
                escape(rel.rel_type.as_str()),
                escape(rel.target.as_str()),
                if rel.external {
                    " TargetMode=\"External\""
                } else {
                    ""
                }
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// One named part of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Path inside the container, without a leading slash
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Part {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Part content as text.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

/// An OOXML package ready to be written as a ZIP container.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
    // Keyed by source part name; "" is the package itself
    relationships: BTreeMap<String, Relationships>,
    compression: Compression,
}

impl Package {
    pub fn new(compression: Compression) -> Self {
        Self {
            compression,
            ..Self::default()
        }
    }

    /// Add a part. Parts are written in insertion order.
    pub fn add_part(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Relationships whose source is `source` ("" for package-level).
    pub fn relationships_mut(&mut self, source: &str) -> &mut Relationships {
        self.relationships.entry(source.to_string()).or_default()
    }

    pub fn relationships(&self, source: &str) -> Option<&Relationships> {
        self.relationships.get(source)
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.part(name).is_some()
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn set_compression(&mut self, compression: Compression) {
        self.compression = compression;
    }

    /// Build the `.rels` part path for a source part.
    pub fn rels_path(source: &str) -> String {
        if source.is_empty() || source == "/" {
            return "_rels/.rels".to_string();
        }
        match source.rsplit_once('/') {
            Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
            None => format!("_rels/{}.rels", source),
        }
    }

    /// Resolve a relative target against the directory of `source`.
    pub fn resolve_path(source: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let mut result: Vec<&str> = match source.rsplit_once('/') {
            Some((dir, _)) => dir.split('/').collect(),
            None => Vec::new(),
        };
        for component in relative.split('/') {
            match component {
                ".." => {
                    result.pop();
                }
                "." | "" => {}
                c => result.push(c),
            }
        }
        result.join("/")
    }

    /// The `[Content_Types].xml` manifest for the current parts.
    pub fn content_types_xml(&self) -> String {
        let mut xml = String::with_capacity(512 + self.parts.len() * 160);
        xml.push_str(XML_DECLARATION);
        xml.push_str(
            "\n<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
        );
        xml.push_str(&format!(
            "<Default Extension=\"rels\" ContentType=\"{}\"/>",
            RELATIONSHIPS_CONTENT_TYPE
        ));
        xml.push_str("<Default Extension=\"xml\" ContentType=\"application/xml\"/>");
        for part in &self.parts {
            xml.push_str(&format!(
                "<Override PartName=\"/{}\" ContentType=\"{}\"/>",
                escape(part.name.as_str()),
                escape(part.content_type.as_str())
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    /// Check that parts, content types and relationships agree.
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for part in &self.parts {
            if part.name.is_empty() || part.name.starts_with('/') {
                return Err(Error::PackageInvariant(format!(
                    "invalid part name `{}`",
                    part.name
                )));
            }
            if part.content_type.is_empty() {
                return Err(Error::PackageInvariant(format!(
                    "part `{}` has no content type",
                    part.name
                )));
            }
            if !names.insert(part.name.as_str()) {
                return Err(Error::PackageInvariant(format!(
                    "part `{}` appears more than once",
                    part.name
                )));
            }
        }

        let mut reachable = HashSet::new();
        for (source, rels) in &self.relationships {
            if !source.is_empty() && !names.contains(source.as_str()) {
                return Err(Error::PackageInvariant(format!(
                    "relationships declared for missing part `{}`",
                    source
                )));
            }
            for rel in rels.iter().filter(|r| !r.external) {
                let target = Self::resolve_path(source, &rel.target);
                if !names.contains(target.as_str()) {
                    return Err(Error::PackageInvariant(format!(
                        "relationship {} of `{}` points at missing part `{}`",
                        rel.id, source, target
                    )));
                }
                reachable.insert(target);
            }
        }

        if let Some(orphan) = self.parts.iter().find(|p| !reachable.contains(&p.name)) {
            return Err(Error::PackageInvariant(format!(
                "part `{}` is not the target of any relationship",
                orphan.name
            )));
        }

        Ok(())
    }

    /// Write the container to any [`Write`] + [`Seek`] destination.
    ///
    /// `[Content_Types].xml` is the first entry; every entry carries the
    /// fixed 1980-01-01 timestamp.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        self.validate()?;

        let options = SimpleFileOptions::default()
            .compression_method(self.compression.method())
            .last_modified_time(zip::DateTime::default());

        let mut zip = ZipWriter::new(writer);

        zip.start_file(CONTENT_TYPES_PART, options)?;
        zip.write_all(self.content_types_xml().as_bytes())
            .map_err(packaging)?;

        for (source, rels) in &self.relationships {
            if rels.is_empty() {
                continue;
            }
            zip.start_file(Self::rels_path(source), options)?;
            zip.write_all(rels.to_xml().as_bytes()).map_err(packaging)?;
        }

        for part in &self.parts {
            zip.start_file(part.name.as_str(), options)?;
            zip.write_all(&part.data).map_err(packaging)?;
        }

        zip.finish()?;
        log::debug!(
            "wrote package with {} parts ({:?})",
            self.parts.len(),
            self.compression
        );
        Ok(())
    }

    /// Write the container into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    /// Write the container to `path` atomically.
    ///
    /// The archive is written to a temporary file next to `path` and renamed
    /// into place once complete. On failure the temporary file is removed and
    /// `path` is left untouched.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(packaging)?;
        self.write_to(temp.as_file_mut())?;
        temp.as_file().sync_all().map_err(packaging)?;
        temp.persist(path).map_err(|e| packaging(e.error))?;

        log::info!("saved {}", path.display());
        Ok(())
    }
}

fn packaging(err: std::io::Error) -> Error {
    Error::Packaging(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    const DOCUMENT_REL: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    const STYLES_REL: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

    fn sample() -> Package {
        let mut package = Package::new(Compression::Deflate);
        package.add_part(Part::new("word/document.xml", "application/test.main+xml", "<doc/>"));
        package.add_part(Part::new("word/styles.xml", "application/test.styles+xml", "<styles/>"));
        package
            .relationships_mut("")
            .add(DOCUMENT_REL, "word/document.xml");
        package
            .relationships_mut("word/document.xml")
            .add(STYLES_REL, "styles.xml");
        package
    }

    #[test]
    fn test_rels_path() {
        assert_eq!(Package::rels_path(""), "_rels/.rels");
        assert_eq!(
            Package::rels_path("word/document.xml"),
            "word/_rels/document.xml.rels"
        );
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            Package::resolve_path("word/document.xml", "styles.xml"),
            "word/styles.xml"
        );
        assert_eq!(
            Package::resolve_path("word/document.xml", "../docProps/core.xml"),
            "docProps/core.xml"
        );
        assert_eq!(
            Package::resolve_path("", "word/document.xml"),
            "word/document.xml"
        );
        assert_eq!(
            Package::resolve_path("word/document.xml", "/word/theme/theme1.xml"),
            "word/theme/theme1.xml"
        );
    }

    #[test]
    fn test_relationship_ids() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add(STYLES_REL, "styles.xml"), "rId1");
        assert_eq!(rels.add_external("hyperlink", "https://example.com"), "rId2");
        assert_eq!(rels.add_external("hyperlink", "https://example.com"), "rId2");
        assert_eq!(rels.len(), 2);
        assert!(rels.get("rId2").unwrap().external);
        assert_eq!(rels.get_by_type(STYLES_REL).len(), 1);

        let xml = rels.to_xml();
        assert!(xml.contains("TargetMode=\"External\""));
        assert!(xml.contains("Target=\"styles.xml\""));
    }

    #[test]
    fn test_validate_accepts_consistent_package() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_dangling_relationship() {
        let mut package = sample();
        package
            .relationships_mut("word/document.xml")
            .add("numbering", "numbering.xml");
        let err = package.validate().unwrap_err();
        assert!(matches!(err, Error::PackageInvariant(_)));
        assert!(err.to_string().contains("word/numbering.xml"));
    }

    #[test]
    fn test_validate_rejects_orphan_part() {
        let mut package = sample();
        package.add_part(Part::new("word/extra.xml", "application/xml", "<x/>"));
        let err = package.validate().unwrap_err();
        assert!(err.to_string().contains("word/extra.xml"));
    }

    #[test]
    fn test_validate_rejects_duplicate_part() {
        let mut package = sample();
        package.add_part(Part::new("word/styles.xml", "application/xml", "<x/>"));
        assert!(package.validate().is_err());
    }

    #[test]
    fn test_content_types_list_each_part_once() {
        let xml = sample().content_types_xml();
        assert_eq!(xml.matches("PartName=\"/word/document.xml\"").count(), 1);
        assert_eq!(xml.matches("PartName=\"/word/styles.xml\"").count(), 1);
        assert_eq!(xml.matches("<Override").count(), 2);
    }

    #[test]
    fn test_zip_layout() {
        let bytes = sample().to_bytes().unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 5);

        assert_eq!(archive.by_index(0).unwrap().name(), CONTENT_TYPES_PART);

        let mut rels = String::new();
        archive
            .by_name("word/_rels/document.xml.rels")
            .unwrap()
            .read_to_string(&mut rels)
            .unwrap();
        assert!(rels.contains("styles.xml"));
    }

    #[test]
    fn test_output_is_reproducible() {
        assert_eq!(sample().to_bytes().unwrap(), sample().to_bytes().unwrap());
    }

    #[test]
    fn test_store_compression() {
        let mut package = sample();
        package.set_compression(Compression::Store);
        let bytes = package.to_bytes().unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let entry = archive.by_name("word/document.xml").unwrap();
        assert_eq!(entry.compression(), zip::CompressionMethod::Stored);
    }

    #[test]
    fn test_save_is_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.docx");

        let mut broken = sample();
        broken.add_part(Part::new("word/orphan.xml", "application/xml", "<x/>"));
        assert!(broken.save(&target).is_err());
        assert!(!target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        sample().save(&target).unwrap();
        assert!(target.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
