//! List numbering definitions written to `word/numbering.xml`.

use crate::model::{Block, Document, ListMarker};
use quick_xml::escape::escape;

/// Bullet glyphs, cycled by level.
const BULLETS: [&str; 3] = ["\u{2022}", "\u{25E6}", "\u{25AA}"];

/// Indentation step per level, in twips.
pub(crate) const LEVEL_INDENT: u32 = 720;

/// Hanging indent of a numbered paragraph, in twips.
const HANGING: u32 = 360;

/// Abstract numbering definition.
#[derive(Debug, Clone)]
pub struct AbstractNum {
    pub id: usize,
    /// Levels (0-8)
    pub levels: Vec<NumLevel>,
}

/// A numbering level definition.
#[derive(Debug, Clone)]
pub struct NumLevel {
    /// Level index (0-8)
    pub level: u8,
    pub start: u32,
    /// Number format (decimal, bullet, lowerLetter, etc.)
    pub num_fmt: &'static str,
    /// Level text (e.g., "%1.", "(%2)")
    pub level_text: String,
}

impl NumLevel {
    fn for_marker(marker: &ListMarker, level: u8) -> Self {
        match marker {
            ListMarker::Ordered {
                format,
                template,
                start,
            } => NumLevel {
                level,
                start: *start,
                num_fmt: format.ooxml_name(),
                level_text: template.replace("%d", &format!("%{}", level + 1)),
            },
            _ => NumLevel {
                level,
                start: 1,
                num_fmt: "bullet",
                level_text: BULLETS[usize::from(level) % BULLETS.len()].to_string(),
            },
        }
    }

    fn write(&self, xml: &mut String) {
        let left = LEVEL_INDENT * (u32::from(self.level) + 1);
        xml.push_str(&format!(
            "<w:lvl w:ilvl=\"{}\"><w:start w:val=\"{}\"/><w:numFmt w:val=\"{}\"/>\
             <w:lvlText w:val=\"{}\"/><w:lvlJc w:val=\"left\"/>\
             <w:pPr><w:ind w:left=\"{}\" w:hanging=\"{}\"/></w:pPr></w:lvl>",
            self.level,
            self.start,
            self.num_fmt,
            escape(self.level_text.as_str()),
            left,
            HANGING
        ));
    }
}

/// Concrete numbering instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumInstance {
    pub num_id: usize,
    pub abstract_num_id: usize,
    /// Model list this instance numbers
    pub list_id: usize,
}

/// Numbering definitions for one document: one abstract definition and one
/// instance per list that shows bullets or counters.
#[derive(Debug, Clone, Default)]
pub struct NumberingMap {
    pub abstract_nums: Vec<AbstractNum>,
    pub instances: Vec<NumInstance>,
}

impl NumberingMap {
    /// Collect definitions for every numbered list in `document`, in order
    /// of first appearance.
    pub fn collect(document: &Document) -> Self {
        let mut map = NumberingMap::default();
        for block in &document.blocks {
            let Block::ListItem(item) = block else {
                continue;
            };
            if !item.marker.uses_numbering() || map.num_id(item.list_id).is_some() {
                continue;
            }

            let id = map.abstract_nums.len();
            map.abstract_nums.push(AbstractNum {
                id,
                levels: (0..9).map(|l| NumLevel::for_marker(&item.marker, l)).collect(),
            });
            map.instances.push(NumInstance {
                num_id: id + 1,
                abstract_num_id: id,
                list_id: item.list_id,
            });
        }
        map
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// `w:numId` assigned to a model list.
    pub fn num_id(&self, list_id: usize) -> Option<usize> {
        self.instances
            .iter()
            .find(|i| i.list_id == list_id)
            .map(|i| i.num_id)
    }

    /// Serialize as `word/numbering.xml`.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024 + self.abstract_nums.len() * 2048);
        xml.push_str(super::XML_DECLARATION);
        xml.push_str(&format!("\n<w:numbering xmlns:w=\"{}\">", super::W_NS));
        for abstract_num in &self.abstract_nums {
            xml.push_str(&format!(
                "<w:abstractNum w:abstractNumId=\"{}\"><w:multiLevelType w:val=\"hybridMultilevel\"/>",
                abstract_num.id
            ));
            for level in &abstract_num.levels {
                level.write(&mut xml);
            }
            xml.push_str("</w:abstractNum>");
        }
        for instance in &self.instances {
            xml.push_str(&format!(
                "<w:num w:numId=\"{}\"><w:abstractNumId w:val=\"{}\"/></w:num>",
                instance.num_id, instance.abstract_num_id
            ));
        }
        xml.push_str("</w:numbering>");
        xml
    }
}
