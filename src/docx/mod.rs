//! WordprocessingML (.docx) serializer.
//!
//! Turns a resolved [`Document`] into the parts of an Office Open XML
//! package: the main document, styles, numbering (only when a list needs
//! it), settings, font table, theme and the two property parts, wired
//! together with their relationships.

mod boilerplate;
mod document;
mod numbering;
mod props;
pub mod styles;

pub use numbering::NumberingMap;
pub use styles::{SemanticStyle, StylesCatalog};

use crate::container::{Package, Part};
use crate::error::Result;
use crate::model::Document;
use crate::options::ConvertOptions;

pub(crate) const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub(crate) const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const R_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Part names.
pub mod parts {
    pub const DOCUMENT: &str = "word/document.xml";
    pub const STYLES: &str = "word/styles.xml";
    pub const NUMBERING: &str = "word/numbering.xml";
    pub const SETTINGS: &str = "word/settings.xml";
    pub const FONT_TABLE: &str = "word/fontTable.xml";
    pub const THEME: &str = "word/theme/theme1.xml";
    pub const CORE: &str = "docProps/core.xml";
    pub const APP: &str = "docProps/app.xml";
}

/// Content types.
pub mod content_types {
    pub const DOCUMENT: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const STYLES: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
    pub const NUMBERING: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
    pub const SETTINGS: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml";
    pub const FONT_TABLE: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.fontTable+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const APP: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";
}

const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const CORE_PROPERTIES_REL: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const EXTENDED_PROPERTIES_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const STYLES_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const NUMBERING_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
const SETTINGS_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
const FONT_TABLE_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/fontTable";
const THEME_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
pub(crate) const HYPERLINK_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

/// Serialize a resolved document into a validated package.
pub fn serialize(
    document: &Document,
    styles: &StylesCatalog,
    options: &ConvertOptions,
) -> Result<Package> {
    let numbering = NumberingMap::collect(document);
    let mut package = Package::new(options.compression);

    let root = package.relationships_mut("");
    root.add(OFFICE_DOCUMENT_REL, parts::DOCUMENT);
    root.add(CORE_PROPERTIES_REL, parts::CORE);
    root.add(EXTENDED_PROPERTIES_REL, parts::APP);

    // Fixed relationships come first so their IDs do not depend on content
    let rels = package.relationships_mut(parts::DOCUMENT);
    rels.add(STYLES_REL, "styles.xml");
    rels.add(SETTINGS_REL, "settings.xml");
    rels.add(FONT_TABLE_REL, "fontTable.xml");
    rels.add(THEME_REL, "theme/theme1.xml");
    if !numbering.is_empty() {
        rels.add(NUMBERING_REL, "numbering.xml");
    }
    let body = document::document_xml(document, &numbering, rels);

    package.add_part(Part::new(parts::DOCUMENT, content_types::DOCUMENT, body));
    package.add_part(Part::new(parts::STYLES, content_types::STYLES, styles.to_xml()));
    if !numbering.is_empty() {
        package.add_part(Part::new(
            parts::NUMBERING,
            content_types::NUMBERING,
            numbering.to_xml(),
        ));
    }
    package.add_part(Part::new(
        parts::SETTINGS,
        content_types::SETTINGS,
        boilerplate::settings_xml(styles.language()),
    ));
    package.add_part(Part::new(
        parts::FONT_TABLE,
        content_types::FONT_TABLE,
        boilerplate::font_table_xml(),
    ));
    package.add_part(Part::new(parts::THEME, content_types::THEME, boilerplate::theme_xml()));
    package.add_part(Part::new(
        parts::CORE,
        content_types::CORE,
        props::core_xml(&document.metadata, options),
    ));
    package.add_part(Part::new(
        parts::APP,
        content_types::APP,
        props::app_xml(document, options),
    ));

    package.validate()?;
    log::debug!(
        "serialized {} blocks into {} parts ({} numbered lists)",
        document.blocks.len(),
        package.parts().len(),
        numbering.instances.len()
    );
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, ListItem, ListMarker, Run};

    fn serialize_blocks(blocks: Vec<Block>) -> Package {
        let mut document = Document::new();
        document.metadata.title = "T".into();
        document.blocks = blocks;
        let options = ConvertOptions::default();
        serialize(&document, &StylesCatalog::standard(&options.language), &options).unwrap()
    }

    #[test]
    fn test_minimal_package() {
        let package = serialize_blocks(Vec::new());
        for name in [
            parts::DOCUMENT,
            parts::STYLES,
            parts::SETTINGS,
            parts::FONT_TABLE,
            parts::THEME,
            parts::CORE,
            parts::APP,
        ] {
            assert!(package.contains(name), "missing {}", name);
        }
        assert!(!package.contains(parts::NUMBERING));

        let rels = package.relationships(parts::DOCUMENT).unwrap();
        assert!(rels.get_by_type(NUMBERING_REL).is_empty());
        assert!(!package.content_types_xml().contains("numbering"));
    }

    #[test]
    fn test_numbering_part_follows_lists() {
        let package = serialize_blocks(vec![Block::ListItem(ListItem {
            list_id: 0,
            depth: 0,
            marker: ListMarker::Bullet,
            runs: vec![Run::plain("item")],
            continuation: false,
            anchor: None,
        })]);
        assert!(package.contains(parts::NUMBERING));
        let rels = package.relationships(parts::DOCUMENT).unwrap();
        assert_eq!(rels.get_by_type(NUMBERING_REL).len(), 1);
        assert!(package
            .content_types_xml()
            .contains("PartName=\"/word/numbering.xml\""));
    }

    #[test]
    fn test_document_relationships_are_stable() {
        let package = serialize_blocks(vec![Block::Paragraph(crate::model::Paragraph::new(
            crate::model::ParagraphRole::Body,
            vec![Run::link("https://example.org", "link")],
        ))]);
        let rels = package.relationships(parts::DOCUMENT).unwrap();
        assert_eq!(rels.get("rId1").unwrap().rel_type, STYLES_REL);
        assert_eq!(rels.get("rId5").unwrap().rel_type, HYPERLINK_REL);
    }
}
