//! Style definitions written to `word/styles.xml`.
//!
//! Every paragraph the serializer emits references one of the semantic
//! styles below by its identifier, so the look of a converted document can
//! be changed in Word by editing a handful of styles.

use quick_xml::escape::escape;

/// Body font.
pub const BODY_FONT: &str = "Calibri";
/// Heading and title font.
pub const HEADING_FONT: &str = "Cambria";
/// Font for artwork and inline code.
pub const MONOSPACE_FONT: &str = "Courier New";

/// Style type (paragraph, character, table, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    Paragraph,
    Character,
}

impl StyleType {
    fn as_str(&self) -> &'static str {
        match self {
            StyleType::Paragraph => "paragraph",
            StyleType::Character => "character",
        }
    }
}

/// The semantic styles the serializer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticStyle {
    Normal,
    Title,
    /// Heading level 1..=6
    Heading(u8),
    Body,
    Abstract,
    FrontMatter,
    ListParagraph,
    FigureCaption,
    TableCaption,
    Artwork,
    Reference,
    Quote,
    TableText,
    /// Character style for internal and external links
    Hyperlink,
}

impl SemanticStyle {
    /// Style identifier as it appears in `w:pStyle` / `w:rStyle`.
    pub fn id(&self) -> &'static str {
        match self {
            SemanticStyle::Normal => "Normal",
            SemanticStyle::Title => "Title",
            SemanticStyle::Heading(level) => match level {
                0 | 1 => "Heading1",
                2 => "Heading2",
                3 => "Heading3",
                4 => "Heading4",
                5 => "Heading5",
                _ => "Heading6",
            },
            SemanticStyle::Body => "BodyText",
            SemanticStyle::Abstract => "Abstract",
            SemanticStyle::FrontMatter => "FrontMatter",
            SemanticStyle::ListParagraph => "ListParagraph",
            SemanticStyle::FigureCaption => "FigureCaption",
            SemanticStyle::TableCaption => "TableCaption",
            SemanticStyle::Artwork => "Artwork",
            SemanticStyle::Reference => "Reference",
            SemanticStyle::Quote => "Quote",
            SemanticStyle::TableText => "TableText",
            SemanticStyle::Hyperlink => "Hyperlink",
        }
    }
}

/// A style definition.
#[derive(Debug, Clone)]
pub struct Style {
    /// Style ID (e.g., "Heading1")
    pub id: String,
    /// Display name (e.g., "heading 1")
    pub name: String,
    pub style_type: StyleType,
    pub based_on: Option<String>,
    /// Style of the paragraph that follows
    pub next: Option<String>,
    pub paragraph_props: ParagraphProps,
    pub run_props: RunProps,
}

/// Paragraph-level properties. Distances are in twips.
#[derive(Debug, Clone, Default)]
pub struct ParagraphProps {
    pub keep_next: bool,
    pub keep_lines: bool,
    pub spacing_before: Option<u32>,
    pub spacing_after: Option<u32>,
    pub indent_left: Option<u32>,
    pub indent_right: Option<u32>,
    pub indent_hanging: Option<u32>,
    pub justification: Option<&'static str>,
    /// Outline level (for headings), 0-based
    pub outline_level: Option<u8>,
}

/// Run-level (character) properties. Sizes are in half-points.
#[derive(Debug, Clone, Default)]
pub struct RunProps {
    pub font_name: Option<&'static str>,
    pub bold: bool,
    pub italic: bool,
    pub color: Option<&'static str>,
    pub font_size: Option<u32>,
    pub underline: bool,
}

impl ParagraphProps {
    fn is_empty(&self) -> bool {
        !self.keep_next
            && !self.keep_lines
            && self.spacing_before.is_none()
            && self.spacing_after.is_none()
            && self.indent_left.is_none()
            && self.indent_right.is_none()
            && self.indent_hanging.is_none()
            && self.justification.is_none()
            && self.outline_level.is_none()
    }

    fn write(&self, xml: &mut String) {
        if self.is_empty() {
            return;
        }
        xml.push_str("<w:pPr>");
        if self.keep_next {
            xml.push_str("<w:keepNext/>");
        }
        if self.keep_lines {
            xml.push_str("<w:keepLines/>");
        }
        if self.spacing_before.is_some() || self.spacing_after.is_some() {
            xml.push_str("<w:spacing");
            if let Some(before) = self.spacing_before {
                xml.push_str(&format!(" w:before=\"{}\"", before));
            }
            if let Some(after) = self.spacing_after {
                xml.push_str(&format!(" w:after=\"{}\"", after));
            }
            xml.push_str("/>");
        }
        if self.indent_left.is_some() || self.indent_right.is_some() || self.indent_hanging.is_some()
        {
            xml.push_str("<w:ind");
            if let Some(left) = self.indent_left {
                xml.push_str(&format!(" w:left=\"{}\"", left));
            }
            if let Some(right) = self.indent_right {
                xml.push_str(&format!(" w:right=\"{}\"", right));
            }
            if let Some(hanging) = self.indent_hanging {
                xml.push_str(&format!(" w:hanging=\"{}\"", hanging));
            }
            xml.push_str("/>");
        }
        if let Some(jc) = self.justification {
            xml.push_str(&format!("<w:jc w:val=\"{}\"/>", jc));
        }
        if let Some(level) = self.outline_level {
            xml.push_str(&format!("<w:outlineLvl w:val=\"{}\"/>", level));
        }
        xml.push_str("</w:pPr>");
    }
}

impl RunProps {
    fn is_empty(&self) -> bool {
        self.font_name.is_none()
            && !self.bold
            && !self.italic
            && self.color.is_none()
            && self.font_size.is_none()
            && !self.underline
    }

    fn write(&self, xml: &mut String) {
        if self.is_empty() {
            return;
        }
        xml.push_str("<w:rPr>");
        if let Some(font) = self.font_name {
            xml.push_str(&fonts(font));
        }
        if self.bold {
            xml.push_str("<w:b/><w:bCs/>");
        }
        if self.italic {
            xml.push_str("<w:i/><w:iCs/>");
        }
        if let Some(color) = self.color {
            xml.push_str(&format!("<w:color w:val=\"{}\"/>", color));
        }
        if let Some(size) = self.font_size {
            xml.push_str(&format!(
                "<w:sz w:val=\"{}\"/><w:szCs w:val=\"{}\"/>",
                size, size
            ));
        }
        if self.underline {
            xml.push_str("<w:u w:val=\"single\"/>");
        }
        xml.push_str("</w:rPr>");
    }
}

/// `w:rFonts` selecting `font` for every script.
pub(crate) fn fonts(font: &str) -> String {
    format!(
        "<w:rFonts w:ascii=\"{0}\" w:hAnsi=\"{0}\" w:eastAsia=\"{0}\" w:cs=\"{0}\"/>",
        font
    )
}

impl Style {
    fn paragraph(style: SemanticStyle, name: &str) -> Self {
        Self {
            id: style.id().to_string(),
            name: name.to_string(),
            style_type: StyleType::Paragraph,
            based_on: Some(SemanticStyle::Normal.id().to_string()),
            next: None,
            paragraph_props: ParagraphProps::default(),
            run_props: RunProps::default(),
        }
    }

    fn write(&self, xml: &mut String, default: bool) {
        xml.push_str(&format!(
            "<w:style w:type=\"{}\"{} w:styleId=\"{}\">",
            self.style_type.as_str(),
            if default { " w:default=\"1\"" } else { "" },
            escape(self.id.as_str())
        ));
        xml.push_str(&format!("<w:name w:val=\"{}\"/>", escape(self.name.as_str())));
        if let Some(ref based_on) = self.based_on {
            xml.push_str(&format!("<w:basedOn w:val=\"{}\"/>", escape(based_on.as_str())));
        }
        if let Some(ref next) = self.next {
            xml.push_str(&format!("<w:next w:val=\"{}\"/>", escape(next.as_str())));
        }
        xml.push_str("<w:qFormat/>");
        if self.style_type == StyleType::Paragraph {
            self.paragraph_props.write(xml);
        }
        self.run_props.write(xml);
        xml.push_str("</w:style>");
    }
}

/// The immutable set of styles shared by every document a converter writes.
#[derive(Debug, Clone)]
pub struct StylesCatalog {
    styles: Vec<Style>,
    language: String,
}

impl StylesCatalog {
    /// The standard catalog, tagged with `language`.
    pub fn standard(language: &str) -> Self {
        let mut styles = Vec::new();

        let mut normal = Style::paragraph(SemanticStyle::Normal, "Normal");
        normal.based_on = None;
        styles.push(normal);

        let mut title = Style::paragraph(SemanticStyle::Title, "Title");
        title.next = Some(SemanticStyle::FrontMatter.id().to_string());
        title.paragraph_props = ParagraphProps {
            spacing_before: Some(480),
            spacing_after: Some(360),
            justification: Some("center"),
            ..Default::default()
        };
        title.run_props = RunProps {
            font_name: Some(HEADING_FONT),
            bold: true,
            font_size: Some(36),
            ..Default::default()
        };
        styles.push(title);

        const HEADING_SIZES: [u32; 6] = [30, 26, 24, 22, 22, 22];
        for (i, size) in HEADING_SIZES.iter().enumerate() {
            let level = i as u8 + 1;
            let mut heading =
                Style::paragraph(SemanticStyle::Heading(level), &format!("heading {}", level));
            heading.next = Some(SemanticStyle::Body.id().to_string());
            heading.paragraph_props = ParagraphProps {
                keep_next: true,
                keep_lines: true,
                spacing_before: Some(if level == 1 { 360 } else { 240 }),
                spacing_after: Some(120),
                outline_level: Some(level - 1),
                ..Default::default()
            };
            heading.run_props = RunProps {
                font_name: Some(HEADING_FONT),
                bold: true,
                italic: level >= 5,
                font_size: Some(*size),
                ..Default::default()
            };
            styles.push(heading);
        }

        let mut body = Style::paragraph(SemanticStyle::Body, "Body Text");
        body.paragraph_props.spacing_after = Some(160);
        styles.push(body);

        let mut abstract_style = Style::paragraph(SemanticStyle::Abstract, "Abstract");
        abstract_style.paragraph_props = ParagraphProps {
            spacing_after: Some(160),
            indent_left: Some(720),
            indent_right: Some(720),
            justification: Some("both"),
            ..Default::default()
        };
        styles.push(abstract_style);

        let mut front = Style::paragraph(SemanticStyle::FrontMatter, "Front Matter");
        front.paragraph_props = ParagraphProps {
            spacing_after: Some(0),
            justification: Some("right"),
            ..Default::default()
        };
        styles.push(front);

        let mut list = Style::paragraph(SemanticStyle::ListParagraph, "List Paragraph");
        list.paragraph_props = ParagraphProps {
            spacing_after: Some(80),
            indent_left: Some(720),
            ..Default::default()
        };
        styles.push(list);

        for (style, name) in [
            (SemanticStyle::FigureCaption, "Figure Caption"),
            (SemanticStyle::TableCaption, "Table Caption"),
        ] {
            let mut caption = Style::paragraph(style, name);
            caption.paragraph_props = ParagraphProps {
                spacing_before: Some(120),
                spacing_after: Some(240),
                justification: Some("center"),
                ..Default::default()
            };
            caption.run_props = RunProps {
                italic: true,
                font_size: Some(20),
                ..Default::default()
            };
            styles.push(caption);
        }

        let mut artwork = Style::paragraph(SemanticStyle::Artwork, "Artwork");
        artwork.paragraph_props = ParagraphProps {
            keep_lines: true,
            spacing_after: Some(120),
            indent_left: Some(360),
            ..Default::default()
        };
        artwork.run_props = RunProps {
            font_name: Some(MONOSPACE_FONT),
            font_size: Some(18),
            ..Default::default()
        };
        styles.push(artwork);

        let mut reference = Style::paragraph(SemanticStyle::Reference, "Reference");
        reference.paragraph_props = ParagraphProps {
            spacing_after: Some(160),
            indent_left: Some(2160),
            indent_hanging: Some(2160),
            ..Default::default()
        };
        styles.push(reference);

        let mut quote = Style::paragraph(SemanticStyle::Quote, "Quote");
        quote.paragraph_props = ParagraphProps {
            spacing_after: Some(160),
            indent_left: Some(864),
            indent_right: Some(864),
            ..Default::default()
        };
        quote.run_props.italic = true;
        styles.push(quote);

        let mut table_text = Style::paragraph(SemanticStyle::TableText, "Table Text");
        table_text.paragraph_props.spacing_after = Some(0);
        table_text.run_props.font_size = Some(20);
        styles.push(table_text);

        styles.push(Style {
            id: SemanticStyle::Hyperlink.id().to_string(),
            name: "Hyperlink".to_string(),
            style_type: StyleType::Character,
            based_on: None,
            next: None,
            paragraph_props: ParagraphProps::default(),
            run_props: RunProps {
                color: Some("0563C1"),
                underline: true,
                ..Default::default()
            },
        });

        Self {
            styles,
            language: language.to_string(),
        }
    }

    /// Get a style by ID.
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, style: SemanticStyle) -> bool {
        self.get(style.id()).is_some()
    }

    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Serialize as `word/styles.xml`.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(8 * 1024);
        xml.push_str(super::XML_DECLARATION);
        xml.push_str(&format!("\n<w:styles xmlns:w=\"{}\">", super::W_NS));

        xml.push_str("<w:docDefaults><w:rPrDefault><w:rPr>");
        xml.push_str(&fonts(BODY_FONT));
        xml.push_str(&format!(
            "<w:sz w:val=\"22\"/><w:szCs w:val=\"22\"/><w:lang w:val=\"{0}\" w:eastAsia=\"{0}\" w:bidi=\"ar-SA\"/>",
            escape(self.language.as_str())
        ));
        xml.push_str("</w:rPr></w:rPrDefault><w:pPrDefault><w:pPr>");
        xml.push_str("<w:spacing w:after=\"160\" w:line=\"259\" w:lineRule=\"auto\"/>");
        xml.push_str("</w:pPr></w:pPrDefault></w:docDefaults>");

        for style in &self.styles {
            style.write(&mut xml, style.id == SemanticStyle::Normal.id());
        }
        xml.push_str(
            "<w:style w:type=\"character\" w:default=\"1\" w:styleId=\"DefaultParagraphFont\">\
             <w:name w:val=\"Default Paragraph Font\"/><w:uiPriority w:val=\"1\"/><w:semiHidden/></w:style>",
        );
        xml.push_str("</w:styles>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_ids() {
        assert_eq!(SemanticStyle::Heading(1).id(), "Heading1");
        assert_eq!(SemanticStyle::Heading(9).id(), "Heading6");
        assert_eq!(SemanticStyle::Body.id(), "BodyText");
    }

    #[test]
    fn test_catalog_covers_semantic_styles() {
        let catalog = StylesCatalog::standard("en-US");
        let all = [
            SemanticStyle::Normal,
            SemanticStyle::Title,
            SemanticStyle::Body,
            SemanticStyle::Abstract,
            SemanticStyle::FrontMatter,
            SemanticStyle::ListParagraph,
            SemanticStyle::FigureCaption,
            SemanticStyle::TableCaption,
            SemanticStyle::Artwork,
            SemanticStyle::Reference,
            SemanticStyle::Quote,
            SemanticStyle::TableText,
            SemanticStyle::Hyperlink,
        ];
        for style in all {
            assert!(catalog.contains(style), "missing {}", style.id());
        }
        for level in 1..=6 {
            assert!(catalog.contains(SemanticStyle::Heading(level)));
        }
    }

    #[test]
    fn test_heading_outline_levels() {
        let catalog = StylesCatalog::standard("en-US");
        let h3 = catalog.get("Heading3").unwrap();
        assert_eq!(h3.paragraph_props.outline_level, Some(2));
        assert_eq!(h3.next.as_deref(), Some("BodyText"));
        assert!(h3.run_props.bold);
    }

    #[test]
    fn test_styles_xml() {
        let xml = StylesCatalog::standard("de-DE").to_xml();
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("w:styleId=\"FrontMatter\""));
        assert!(xml.contains("<w:jc w:val=\"right\"/>"));
        assert!(xml.contains("<w:lang w:val=\"de-DE\""));
        assert!(xml.contains("w:type=\"paragraph\" w:default=\"1\" w:styleId=\"Normal\""));
        assert!(xml.ends_with("</w:styles>"));
    }
}
