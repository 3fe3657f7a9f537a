//! The main document part, `word/document.xml`.

use std::collections::{HashMap, HashSet};

use quick_xml::escape::escape;
use unicode_width::UnicodeWidthStr;

use crate::container::Relationships;
use crate::model::{
    plain_text, Block, Cell, Document, Figure, Heading, ListItem, ListMarker, NumberingScheme,
    Paragraph, ParagraphRole, ReferenceEntry, Run, Table, TextStyle,
};

use super::numbering::{NumberingMap, LEVEL_INDENT};
use super::styles::{fonts, SemanticStyle, MONOSPACE_FONT};
use super::{HYPERLINK_REL, R_NS, W_NS, XML_DECLARATION};

/// Letter width minus two 1-inch margins, in twips.
const TEXT_WIDTH: u32 = 9360;

/// Longest bookmark name Word accepts.
const BOOKMARK_LIMIT: usize = 40;

const SECTION_PROPERTIES: &str = "<w:sectPr>\
    <w:pgSz w:w=\"12240\" w:h=\"15840\"/>\
    <w:pgMar w:top=\"1440\" w:right=\"1440\" w:bottom=\"1440\" w:left=\"1440\" \
    w:header=\"720\" w:footer=\"720\" w:gutter=\"0\"/>\
    <w:cols w:space=\"720\"/></w:sectPr>";

/// Turn an anchor into a legal bookmark name.
pub(crate) fn bookmark_name(anchor: &str) -> String {
    let mut name: String = anchor
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        name.insert(0, '_');
    }
    name.truncate(BOOKMARK_LIMIT);
    name
}

/// Bookmark names for every anchor, assigned in document order.
#[derive(Debug, Default)]
pub(crate) struct Bookmarks {
    names: HashMap<String, String>,
}

impl Bookmarks {
    pub(crate) fn collect(document: &Document) -> Self {
        let mut names = HashMap::new();
        let mut used = HashSet::new();
        for anchor in document.blocks.iter().filter_map(Block::anchor) {
            if names.contains_key(anchor) {
                continue;
            }
            let base = bookmark_name(anchor);
            let mut name = base.clone();
            let mut n = 1;
            while !used.insert(name.clone()) {
                n += 1;
                let suffix = format!("_{}", n);
                let mut stem = base.clone();
                stem.truncate(BOOKMARK_LIMIT - suffix.len());
                name = stem + &suffix;
            }
            names.insert(anchor.to_string(), name);
        }
        Self { names }
    }

    pub(crate) fn get(&self, anchor: &str) -> Option<&str> {
        self.names.get(anchor).map(String::as_str)
    }
}

/// A position in the table grid.
#[derive(Debug, Clone, Copy)]
enum Slot<'t> {
    Cell { cell: &'t Cell, span: usize },
    /// Continuation of a cell spanning rows from above
    Covered { span: usize },
    Pad,
}

impl Slot<'_> {
    fn span(&self) -> usize {
        match self {
            Slot::Cell { span, .. } | Slot::Covered { span } => *span,
            Slot::Pad => 1,
        }
    }
}

/// Place the cells of `table` on a grid, honouring row and column spans.
fn layout(table: &Table) -> (Vec<Vec<Slot<'_>>>, usize) {
    // Per grid column: rows still covered from above, and the covering span
    let mut covered: Vec<Option<(u32, usize)>> = Vec::new();
    let mut grid = Vec::with_capacity(table.rows.len());
    let mut columns = 0;

    for row in &table.rows {
        let mut slots = Vec::new();
        let mut col = 0;
        let mut cells = row.cells.iter();

        loop {
            if let Some(Some((remaining, span))) = covered.get(col).copied() {
                slots.push(Slot::Covered { span });
                covered[col] = (remaining > 1).then_some((remaining - 1, span));
                col += span;
                continue;
            }
            match cells.next() {
                Some(cell) => {
                    let span = cell.grid_span();
                    if cell.row_span > 1 {
                        if covered.len() <= col {
                            covered.resize(col + 1, None);
                        }
                        covered[col] = Some((cell.row_span - 1, span));
                    }
                    slots.push(Slot::Cell { cell, span });
                    col += span;
                }
                None => break,
            }
        }

        // Vertical merges to the right of the last cell
        while col < covered.len() {
            match covered[col] {
                Some((remaining, span)) => {
                    slots.push(Slot::Covered { span });
                    covered[col] = (remaining > 1).then_some((remaining - 1, span));
                    col += span;
                }
                None => {
                    slots.push(Slot::Pad);
                    col += 1;
                }
            }
        }
        while matches!(slots.last(), Some(Slot::Pad)) {
            slots.pop();
            col -= 1;
        }

        columns = columns.max(col);
        grid.push(slots);
    }

    (grid, columns)
}

/// Grid column widths proportional to the widest single-column content.
fn column_widths(grid: &[Vec<Slot<'_>>], columns: usize) -> Vec<u32> {
    let mut widest = vec![3usize; columns];
    for slots in grid {
        let mut col = 0;
        for slot in slots {
            if let Slot::Cell { cell, span: 1 } = slot {
                let width = cell.plain_text().width() + 2;
                widest[col] = widest[col].max(width);
            }
            col += slot.span();
        }
    }

    let total: usize = widest.iter().sum();
    let mut widths: Vec<u32> = widest
        .iter()
        .map(|w| (TEXT_WIDTH as usize * w / total.max(1)) as u32)
        .collect();
    let assigned: u32 = widths.iter().sum();
    if let Some(last) = widths.last_mut() {
        *last += TEXT_WIDTH.saturating_sub(assigned);
    }
    widths
}

fn combine(a: TextStyle, b: TextStyle) -> TextStyle {
    TextStyle {
        bold: a.bold || b.bold,
        italic: a.italic || b.italic,
        code: a.code || b.code,
        superscript: a.superscript || b.superscript,
        subscript: a.subscript || b.subscript,
    }
}

fn paragraph_style(role: ParagraphRole) -> SemanticStyle {
    match role {
        ParagraphRole::Body => SemanticStyle::Body,
        ParagraphRole::Title => SemanticStyle::Title,
        ParagraphRole::FrontMatter => SemanticStyle::FrontMatter,
        ParagraphRole::Abstract => SemanticStyle::Abstract,
        ParagraphRole::Quote => SemanticStyle::Quote,
    }
}

/// Heading text prefix: "3.2.  " or "Appendix A.  ".
fn heading_prefix(heading: &Heading) -> Option<String> {
    let number = heading.number.as_deref()?;
    Some(match heading.scheme {
        NumberingScheme::Appendix if heading.level <= 1 => format!("Appendix {}.  ", number),
        _ => format!("{}.  ", number),
    })
}

/// `w:t` content with tabs turned into `w:tab`.
fn push_text(xml: &mut String, text: &str) {
    for (i, piece) in text.split('\t').enumerate() {
        if i > 0 {
            xml.push_str("<w:tab/>");
        }
        if !piece.is_empty() {
            xml.push_str("<w:t xml:space=\"preserve\">");
            xml.push_str(&escape(piece));
            xml.push_str("</w:t>");
        }
    }
}

struct BodyWriter<'a> {
    xml: String,
    numbering: &'a NumberingMap,
    bookmarks: &'a Bookmarks,
    rels: &'a mut Relationships,
    next_bookmark: u32,
    placed: HashSet<String>,
}

impl BodyWriter<'_> {
    fn paragraph_start(&mut self, style: SemanticStyle, properties: &str) {
        self.xml.push_str(&format!(
            "<w:p><w:pPr><w:pStyle w:val=\"{}\"/>{}</w:pPr>",
            style.id(),
            properties
        ));
    }

    /// Open a bookmark for `anchor` unless one was already placed.
    fn bookmark_start(&mut self, anchor: Option<&str>) -> Option<u32> {
        let anchor = anchor?;
        let bookmarks = self.bookmarks;
        let name = bookmarks.get(anchor)?;
        if !self.placed.insert(anchor.to_string()) {
            return None;
        }
        let id = self.next_bookmark;
        self.next_bookmark += 1;
        self.xml.push_str(&format!(
            "<w:bookmarkStart w:id=\"{}\" w:name=\"{}\"/>",
            id, name
        ));
        Some(id)
    }

    fn bookmark_end(&mut self, id: Option<u32>) {
        if let Some(id) = id {
            self.xml
                .push_str(&format!("<w:bookmarkEnd w:id=\"{}\"/>", id));
        }
    }

    fn text_run(&mut self, text: &str, style: TextStyle, character_style: Option<SemanticStyle>) {
        self.xml.push_str("<w:r>");
        if character_style.is_some() || style.has_formatting() {
            self.xml.push_str("<w:rPr>");
            if let Some(cs) = character_style {
                self.xml
                    .push_str(&format!("<w:rStyle w:val=\"{}\"/>", cs.id()));
            }
            if style.code {
                self.xml.push_str(&fonts(MONOSPACE_FONT));
            }
            if style.bold {
                self.xml.push_str("<w:b/><w:bCs/>");
            }
            if style.italic {
                self.xml.push_str("<w:i/><w:iCs/>");
            }
            if style.superscript {
                self.xml.push_str("<w:vertAlign w:val=\"superscript\"/>");
            } else if style.subscript {
                self.xml.push_str("<w:vertAlign w:val=\"subscript\"/>");
            }
            self.xml.push_str("</w:rPr>");
        }
        push_text(&mut self.xml, text);
        self.xml.push_str("</w:r>");
    }

    fn runs(&mut self, runs: &[Run], base: TextStyle) {
        for run in runs {
            match run {
                Run::Text { text, style } => self.text_run(text, combine(base, *style), None),
                Run::Break => self.xml.push_str("<w:r><w:br/></w:r>"),
                Run::Xref(xref) => {
                    let text = xref.display_text();
                    if text.is_empty() {
                        continue;
                    }
                    let style = combine(base, xref.style);
                    let bookmarks = self.bookmarks;
                    let bookmark = if xref.resolved {
                        bookmarks.get(&xref.target)
                    } else {
                        None
                    };
                    match bookmark {
                        Some(name) => {
                            self.xml.push_str(&format!(
                                "<w:hyperlink w:anchor=\"{}\" w:history=\"1\">",
                                name
                            ));
                            self.text_run(text, style, Some(SemanticStyle::Hyperlink));
                            self.xml.push_str("</w:hyperlink>");
                        }
                        None => self.text_run(text, style, None),
                    }
                }
                Run::Link { url, text, style } => {
                    let label = if text.is_empty() { url } else { text };
                    let style = combine(base, *style);
                    if url.is_empty() {
                        self.text_run(label, style, None);
                        continue;
                    }
                    let id = self.rels.add_external(HYPERLINK_REL, url);
                    self.xml.push_str(&format!(
                        "<w:hyperlink r:id=\"{}\" w:history=\"1\">",
                        id
                    ));
                    self.text_run(label, style, Some(SemanticStyle::Hyperlink));
                    self.xml.push_str("</w:hyperlink>");
                }
            }
        }
    }

    fn heading(&mut self, heading: &Heading) {
        self.paragraph_start(SemanticStyle::Heading(heading.style_level()), "");
        let mark = self.bookmark_start(heading.anchor.as_deref());
        if let Some(prefix) = heading_prefix(heading) {
            self.text_run(&prefix, TextStyle::default(), None);
        }
        self.runs(&heading.title, TextStyle::default());
        self.bookmark_end(mark);
        self.xml.push_str("</w:p>");
    }

    fn paragraph(&mut self, paragraph: &Paragraph) {
        self.paragraph_start(paragraph_style(paragraph.role), "");
        let mark = self.bookmark_start(paragraph.anchor.as_deref());
        self.runs(&paragraph.runs, TextStyle::default());
        self.bookmark_end(mark);
        self.xml.push_str("</w:p>");
    }

    fn list_item(&mut self, item: &ListItem) {
        let depth = u32::from(item.depth.min(8));
        let num_id = if item.marker.uses_numbering() {
            self.numbering.num_id(item.list_id)
        } else {
            None
        };
        let properties = match (num_id, &item.marker) {
            (Some(num_id), _) => format!(
                "<w:numPr><w:ilvl w:val=\"{}\"/><w:numId w:val=\"{}\"/></w:numPr>",
                depth, num_id
            ),
            (None, ListMarker::Hanging { .. }) => format!(
                "<w:ind w:left=\"{}\" w:hanging=\"{}\"/>",
                LEVEL_INDENT * (depth + 2),
                LEVEL_INDENT
            ),
            (None, _) => format!("<w:ind w:left=\"{}\"/>", LEVEL_INDENT * (depth + 1)),
        };

        self.paragraph_start(SemanticStyle::ListParagraph, &properties);
        let mark = self.bookmark_start(item.anchor.as_deref());
        if let ListMarker::Hanging { label } = &item.marker {
            self.runs(label, TextStyle::bold());
            self.xml.push_str("<w:r><w:tab/></w:r>");
        }
        self.runs(&item.runs, TextStyle::default());
        self.bookmark_end(mark);
        self.xml.push_str("</w:p>");
    }

    /// "Figure 3: caption", or the bare caption for unnumbered floats.
    fn caption(
        &mut self,
        style: SemanticStyle,
        kind: &str,
        number: Option<u32>,
        caption: &[Run],
        anchor: Option<&str>,
    ) -> bool {
        let has_caption = !plain_text(caption).trim().is_empty();
        if number.is_none() && !has_caption {
            return false;
        }
        self.paragraph_start(style, "");
        let mark = self.bookmark_start(anchor);
        if let Some(n) = number {
            let label = if has_caption {
                format!("{} {}: ", kind, n)
            } else {
                format!("{} {}", kind, n)
            };
            self.text_run(&label, TextStyle::default(), None);
        }
        self.runs(caption, TextStyle::default());
        self.bookmark_end(mark);
        self.xml.push_str("</w:p>");
        true
    }

    fn figure(&mut self, figure: &Figure) {
        let mut anchor = figure.anchor.as_deref();
        for artwork in &figure.artwork {
            self.paragraph_start(SemanticStyle::Artwork, "");
            let mark = self.bookmark_start(anchor.take());
            self.xml.push_str("<w:r>");
            for (i, line) in artwork.lines.iter().enumerate() {
                if i > 0 {
                    self.xml.push_str("<w:br/>");
                }
                if !line.is_empty() {
                    self.xml.push_str("<w:t xml:space=\"preserve\">");
                    self.xml.push_str(&escape(line.as_str()));
                    self.xml.push_str("</w:t>");
                }
            }
            self.xml.push_str("</w:r>");
            self.bookmark_end(mark);
            self.xml.push_str("</w:p>");
        }

        let captioned = self.caption(
            SemanticStyle::FigureCaption,
            "Figure",
            figure.number,
            &figure.caption,
            anchor,
        );
        if !captioned && anchor.is_some() {
            // Keep the anchor addressable
            self.paragraph_start(SemanticStyle::Body, "");
            let mark = self.bookmark_start(anchor);
            self.bookmark_end(mark);
            self.xml.push_str("</w:p>");
        }
    }

    fn table(&mut self, table: &Table) {
        let (grid, columns) = layout(table);
        if columns > 0 {
            let widths = column_widths(&grid, columns);
            self.xml.push_str(
                "<w:tbl><w:tblPr><w:tblW w:w=\"0\" w:type=\"auto\"/><w:jc w:val=\"center\"/><w:tblBorders>",
            );
            for side in ["top", "left", "bottom", "right", "insideH", "insideV"] {
                self.xml.push_str(&format!(
                    "<w:{} w:val=\"single\" w:sz=\"4\" w:space=\"0\" w:color=\"auto\"/>",
                    side
                ));
            }
            self.xml
                .push_str("</w:tblBorders><w:tblLayout w:type=\"fixed\"/></w:tblPr><w:tblGrid>");
            for width in &widths {
                self.xml.push_str(&format!("<w:gridCol w:w=\"{}\"/>", width));
            }
            self.xml.push_str("</w:tblGrid>");

            for (row, slots) in table.rows.iter().zip(&grid) {
                self.xml.push_str("<w:tr>");
                if row.is_header {
                    self.xml.push_str("<w:trPr><w:tblHeader/></w:trPr>");
                }
                let mut col = 0;
                for slot in slots {
                    let span = slot.span().min(columns - col.min(columns)).max(1);
                    let width: u32 = widths.iter().skip(col).take(span).sum();
                    self.cell(*slot, span, width, row.is_header);
                    col += span;
                }
                while col < columns {
                    self.cell(Slot::Pad, 1, widths[col], row.is_header);
                    col += 1;
                }
                self.xml.push_str("</w:tr>");
            }
            self.xml.push_str("</w:tbl>");
        }

        let captioned = self.caption(
            SemanticStyle::TableCaption,
            "Table",
            table.number,
            &table.caption,
            table.anchor.as_deref(),
        );
        if !captioned && columns > 0 {
            // Adjacent tables would otherwise merge
            self.xml.push_str("<w:p/>");
        }
    }

    fn cell(&mut self, slot: Slot<'_>, span: usize, width: u32, header_row: bool) {
        self.xml.push_str(&format!(
            "<w:tc><w:tcPr><w:tcW w:w=\"{}\" w:type=\"dxa\"/>",
            width
        ));
        if span > 1 {
            self.xml
                .push_str(&format!("<w:gridSpan w:val=\"{}\"/>", span));
        }
        let header = match slot {
            Slot::Cell { cell, .. } => {
                if cell.row_span > 1 {
                    self.xml.push_str("<w:vMerge w:val=\"restart\"/>");
                }
                cell.is_header || header_row
            }
            Slot::Covered { .. } => {
                self.xml.push_str("<w:vMerge/>");
                header_row
            }
            Slot::Pad => header_row,
        };
        if header {
            self.xml
                .push_str("<w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"F2F2F2\"/>");
        }
        self.xml.push_str("</w:tcPr>");

        let alignment = match slot {
            Slot::Cell { cell, .. } if cell.alignment != Default::default() => {
                format!("<w:jc w:val=\"{}\"/>", cell.alignment.ooxml_name())
            }
            _ => String::new(),
        };
        self.paragraph_start(SemanticStyle::TableText, &alignment);
        if let Slot::Cell { cell, .. } = slot {
            let base = if header { TextStyle::bold() } else { TextStyle::default() };
            self.runs(&cell.runs, base);
        }
        self.xml.push_str("</w:p></w:tc>");
    }

    fn reference(&mut self, entry: &ReferenceEntry) {
        self.paragraph_start(SemanticStyle::Reference, "");
        let mark = self.bookmark_start(entry.anchor.as_deref());
        let label = entry
            .label
            .clone()
            .or_else(|| entry.anchor.as_ref().map(|a| format!("[{}]", a)));
        if let Some(label) = label {
            self.text_run(&label, TextStyle::default(), None);
            self.xml.push_str("<w:r><w:tab/></w:r>");
        }
        self.runs(&entry.citation, TextStyle::default());
        self.bookmark_end(mark);
        self.xml.push_str("</w:p>");
    }
}

/// Serialize the resolved `document`. External links are registered in
/// `rels` as they are met.
pub(crate) fn document_xml(
    document: &Document,
    numbering: &NumberingMap,
    rels: &mut Relationships,
) -> String {
    let bookmarks = Bookmarks::collect(document);
    let mut writer = BodyWriter {
        xml: String::with_capacity(4096 + document.blocks.len() * 256),
        numbering,
        bookmarks: &bookmarks,
        rels,
        next_bookmark: 0,
        placed: HashSet::new(),
    };

    writer.xml.push_str(XML_DECLARATION);
    writer.xml.push_str(&format!(
        "\n<w:document xmlns:w=\"{}\" xmlns:r=\"{}\"><w:body>",
        W_NS, R_NS
    ));

    for block in &document.blocks {
        match block {
            Block::PartStart { .. } => {}
            Block::Heading(heading) => writer.heading(heading),
            Block::Paragraph(paragraph) => writer.paragraph(paragraph),
            Block::ListItem(item) => writer.list_item(item),
            Block::Table(table) => writer.table(table),
            Block::Figure(figure) => writer.figure(figure),
            Block::ReferenceEntry(entry) => writer.reference(entry),
        }
    }

    writer.xml.push_str(SECTION_PROPERTIES);
    writer.xml.push_str("</w:body></w:document>");
    writer.xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Artwork, ArtworkKind, Row, XrefRun};
    use crate::xml2rfc::vocab::XrefFormat;

    fn render(blocks: Vec<Block>) -> (String, Relationships) {
        let mut document = Document::new();
        document.blocks = blocks;
        let numbering = NumberingMap::collect(&document);
        let mut rels = Relationships::new();
        let xml = document_xml(&document, &numbering, &mut rels);
        (xml, rels)
    }

    fn body(runs: Vec<Run>) -> Block {
        Block::Paragraph(Paragraph::new(ParagraphRole::Body, runs))
    }

    #[test]
    fn test_bookmark_names() {
        assert_eq!(bookmark_name("sec-intro"), "sec_intro");
        assert_eq!(bookmark_name("RFC2119"), "RFC2119");
        assert_eq!(bookmark_name("1.intro"), "_1_intro");
        assert_eq!(bookmark_name(&"a".repeat(60)).len(), 40);
    }

    #[test]
    fn test_bookmark_collisions() {
        let mut doc = Document::new();
        for anchor in ["a-b", "a.b", "a-b"] {
            let mut p = Paragraph::with_text(ParagraphRole::Body, "x");
            p.anchor = Some(anchor.to_string());
            doc.push(Block::Paragraph(p));
        }
        let bookmarks = Bookmarks::collect(&doc);
        assert_eq!(bookmarks.get("a-b"), Some("a_b"));
        assert_eq!(bookmarks.get("a.b"), Some("a_b_2"));
    }

    #[test]
    fn test_empty_body_has_section_properties() {
        let (xml, rels) = render(Vec::new());
        assert!(xml.contains("<w:body><w:sectPr>"));
        assert!(xml.contains("<w:pgSz w:w=\"12240\" w:h=\"15840\"/>"));
        assert!(xml.contains("w:left=\"1440\""));
        assert!(rels.is_empty());
    }

    #[test]
    fn test_bold_and_italic_spans() {
        let (xml, _) = render(vec![body(vec![
            Run::plain("a "),
            Run::styled("strong", TextStyle::bold()),
            Run::plain(" b "),
            Run::styled("em", TextStyle::italic()),
        ])]);
        assert!(xml.contains(
            "<w:r><w:rPr><w:b/><w:bCs/></w:rPr><w:t xml:space=\"preserve\">strong</w:t></w:r>"
        ));
        assert!(xml.contains(
            "<w:r><w:rPr><w:i/><w:iCs/></w:rPr><w:t xml:space=\"preserve\">em</w:t></w:r>"
        ));
        assert!(xml.contains("<w:r><w:t xml:space=\"preserve\">a </w:t></w:r>"));
        assert_eq!(xml.matches("<w:b/>").count(), 1);
    }

    #[test]
    fn test_text_is_escaped() {
        let (xml, _) = render(vec![body(vec![Run::plain("a < b & c")])]);
        assert!(xml.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_internal_link_targets_bookmark() {
        let mut heading = Heading::unnumbered(1, "Intro");
        heading.anchor = Some("sec-intro".into());
        heading.scheme = NumberingScheme::Section;
        heading.number = Some("1".into());

        let mut xref = XrefRun::new("sec-intro", XrefFormat::Default);
        xref.label = Some("Section 1".into());
        xref.resolved = true;

        let (xml, _) = render(vec![Block::Heading(heading), body(vec![Run::Xref(xref)])]);
        assert!(xml.contains("<w:pStyle w:val=\"Heading1\"/>"));
        assert!(xml.contains("<w:bookmarkStart w:id=\"0\" w:name=\"sec_intro\"/>"));
        assert!(xml.contains("1.  </w:t>"));
        assert!(xml.contains("<w:hyperlink w:anchor=\"sec_intro\" w:history=\"1\">"));
        assert!(xml.contains(">Section 1</w:t>"));
    }

    #[test]
    fn test_unresolved_reference_is_plain_text() {
        let mut xref = XrefRun::new("missing", XrefFormat::Default);
        xref.label = Some("[?missing]".into());
        let (xml, _) = render(vec![body(vec![Run::Xref(xref)])]);
        assert!(xml.contains("[?missing]"));
        assert!(!xml.contains("w:hyperlink"));
    }

    #[test]
    fn test_external_link_relationship() {
        let (xml, rels) = render(vec![body(vec![
            Run::link("https://example.com/?a=1&b=2", "example"),
            Run::link("https://example.com/?a=1&b=2", "again"),
        ])]);
        assert_eq!(rels.len(), 1);
        let rel = rels.get("rId1").unwrap();
        assert!(rel.external);
        assert_eq!(rel.rel_type, HYPERLINK_REL);
        assert_eq!(xml.matches("<w:hyperlink r:id=\"rId1\"").count(), 2);
    }

    #[test]
    fn test_artwork_preserves_whitespace() {
        let figure = Figure {
            anchor: Some("fig-1".into()),
            caption: vec![Run::plain("Layout")],
            artwork: vec![Artwork::from_text(
                ArtworkKind::Art,
                None,
                "\n  +--+\n  |  |\n\n  +--+\n",
            )],
            numbered: true,
            number: Some(1),
        };
        let (xml, _) = render(vec![Block::Figure(figure)]);
        assert!(xml.contains("<w:pStyle w:val=\"Artwork\"/>"));
        assert!(xml.contains(
            "<w:t xml:space=\"preserve\">  +--+</w:t><w:br/><w:t xml:space=\"preserve\">  |  |</w:t><w:br/><w:br/>"
        ));
        assert!(xml.contains("Figure 1: </w:t>"));
        assert_eq!(xml.matches("w:name=\"fig_1\"").count(), 1);
    }

    #[test]
    fn test_list_numbering_properties() {
        let item = |list_id, marker| {
            Block::ListItem(ListItem {
                list_id,
                depth: 1,
                marker,
                runs: vec![Run::plain("x")],
                continuation: false,
                anchor: None,
            })
        };
        let (xml, _) = render(vec![
            item(4, ListMarker::Bullet),
            item(
                7,
                ListMarker::Hanging {
                    label: vec![Run::plain("term")],
                },
            ),
            item(4, ListMarker::Empty),
        ]);
        assert!(xml.contains("<w:numPr><w:ilvl w:val=\"1\"/><w:numId w:val=\"1\"/></w:numPr>"));
        assert!(xml.contains("<w:ind w:left=\"2160\" w:hanging=\"720\"/>"));
        assert!(xml.contains("<w:ind w:left=\"1440\"/>"));
        assert!(xml.contains("<w:b/><w:bCs/></w:rPr><w:t xml:space=\"preserve\">term</w:t>"));
    }

    #[test]
    fn test_table_grid_and_merges() {
        let mut wide = Cell::with_text("wide");
        wide.col_span = 2;
        let mut tall = Cell::with_text("tall");
        tall.row_span = 2;
        let table = Table {
            anchor: Some("tab".into()),
            caption: Vec::new(),
            rows: vec![
                Row::header(vec![Cell::header("A"), Cell::header("B"), Cell::header("C")]),
                Row {
                    cells: vec![tall, wide],
                    is_header: false,
                },
                Row {
                    cells: vec![Cell::with_text("1"), Cell::with_text("2")],
                    is_header: false,
                },
            ],
            number: Some(2),
        };

        let (grid, columns) = layout(&table);
        assert_eq!(columns, 3);
        assert!(matches!(grid[2][0], Slot::Covered { span: 1 }));

        let (xml, _) = render(vec![Block::Table(table)]);
        assert_eq!(xml.matches("<w:gridCol ").count(), 3);
        assert!(xml.contains("<w:tblHeader/>"));
        assert!(xml.contains("<w:gridSpan w:val=\"2\"/>"));
        assert!(xml.contains("<w:vMerge w:val=\"restart\"/>"));
        assert!(xml.contains("<w:vMerge/>"));
        assert!(xml.contains(">Table 2</w:t>"));
    }

    #[test]
    fn test_column_widths_fill_text_width() {
        let table = Table {
            rows: vec![Row {
                cells: vec![Cell::with_text("short"), Cell::with_text("a much longer cell")],
                is_header: false,
            }],
            ..Default::default()
        };
        let (grid, columns) = layout(&table);
        let widths = column_widths(&grid, columns);
        assert_eq!(widths.iter().sum::<u32>(), TEXT_WIDTH);
        assert!(widths[1] > widths[0]);
    }

    #[test]
    fn test_reference_label() {
        let entry = ReferenceEntry {
            anchor: Some("RFC2119".into()),
            title: None,
            citation: vec![Run::plain("Bradner, S.")],
            target: None,
            group: Default::default(),
            label: Some("[RFC2119]".into()),
        };
        let (xml, _) = render(vec![Block::ReferenceEntry(entry)]);
        assert!(xml.contains("<w:pStyle w:val=\"Reference\"/>"));
        assert!(xml.contains(">[RFC2119]</w:t></w:r><w:r><w:tab/></w:r>"));
    }
}
