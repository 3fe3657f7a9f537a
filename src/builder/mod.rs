//! Document model builder.
//!
//! Walks a validated xml2rfc tree and produces the ordered block sequence
//! plus metadata. The walk runs over an explicit work-stack of [`Task`]s so
//! deeply nested sections and lists never grow the call stack.

mod front;
mod inline;
mod reference;

use crate::detect::detect_vocabulary;
use crate::diagnostic::Diagnostic;
use crate::error::{Error, Result};
use crate::model::{
    Artwork, ArtworkKind, Block, Cell, Document, Figure, Heading, ListItem, ListMarker,
    Metadata, NumberFormat, NumberingScheme, Paragraph, ParagraphRole, Part, ReferenceGroup, Row,
    Run, Table,
};
use crate::options::ConvertOptions;
use crate::xml2rfc::vocab::{
    read_alignment, read_span, ArtworkAttrs, FloatAttrs, ListAttrs, ListStyle, ReferencesAttrs, SectionAttrs,
    Tag, TextAttrs,
};
use crate::xml2rfc::{DocumentNode, Node};

use inline::{collect_runs, element_runs, finish_runs, runs_of};

/// Output of the builder.
#[derive(Debug, Clone, Default)]
pub struct Built {
    pub document: Document,
    /// Unknown elements met during the walk
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the semantic document for a validated tree.
pub fn build(root: &DocumentNode, options: &ConvertOptions) -> Result<Built> {
    if root.tag != Tag::Rfc {
        return Err(Error::InternalModel(format!(
            "builder expects an `rfc` root, got <{}>",
            root.tag.name()
        )));
    }

    let mut document = Document::new();
    document.metadata = front::read_metadata(root);
    document.vocabulary = detect_vocabulary(root);

    let mut builder = Builder {
        blocks: Vec::new(),
        next_list_id: 0,
        pending: None,
        options,
        metadata: &document.metadata,
    };
    builder.run(root)?;
    document.blocks = builder.blocks;

    let diagnostics = unknown_elements(root);
    log::debug!(
        "built {} blocks from {} source ({} unknown elements)",
        document.blocks.len(),
        document.vocabulary,
        diagnostics.len()
    );

    Ok(Built {
        document,
        diagnostics,
    })
}

fn unknown_elements(root: &DocumentNode) -> Vec<Diagnostic> {
    root.descendants()
        .flat_map(|node| node.children.iter())
        .filter_map(|child| match child {
            Node::Opaque(opaque) => Some(Diagnostic::unknown_element(&opaque.name, opaque.location)),
            _ => None,
        })
        .collect()
}

/// Position inside the list structure.
#[derive(Debug, Clone, Copy)]
struct ItemContext {
    list_id: usize,
    depth: u8,
}

/// Inherited state for a subtree.
#[derive(Debug, Clone)]
struct Context {
    part: Part,
    /// Depth of the enclosing section
    depth: u32,
    role: ParagraphRole,
    item: Option<ItemContext>,
    /// Style of the enclosing v2 list, inherited by unstyled nested lists
    list_style: Option<ListStyle>,
    group: ReferenceGroup,
}

impl Context {
    fn new(part: Part) -> Self {
        Self {
            part,
            depth: 0,
            role: ParagraphRole::Body,
            item: None,
            list_style: None,
            group: ReferenceGroup::default(),
        }
    }
}

enum Task<'a> {
    Visit(&'a DocumentNode, Context),
    Paragraph {
        runs: Vec<Run>,
        anchor: Option<String>,
        context: Context,
    },
    Emit(Block),
    StartItem {
        item: ItemContext,
        marker: ListMarker,
        anchor: Option<String>,
    },
    EndItem,
}

/// A list item whose marker has not been placed on a paragraph yet.
struct PendingItem {
    item: ItemContext,
    marker: ListMarker,
    anchor: Option<String>,
}

struct Builder<'a> {
    blocks: Vec<Block>,
    next_list_id: usize,
    pending: Option<PendingItem>,
    options: &'a ConvertOptions,
    metadata: &'a Metadata,
}

impl<'a> Builder<'a> {
    fn run(&mut self, root: &'a DocumentNode) -> Result<()> {
        let mut stack: Vec<Task<'a>> = Vec::new();
        for (tag, part) in [(Tag::Back, Part::Back), (Tag::Middle, Part::Middle), (Tag::Front, Part::Front)] {
            if let Some(node) = root.child(tag) {
                stack.push(Task::Visit(node, Context::new(part)));
            }
        }

        while let Some(task) = stack.pop() {
            let mut tasks = Vec::new();
            match task {
                Task::Visit(node, context) => self.visit(node, context, &mut tasks)?,
                Task::Paragraph {
                    runs,
                    anchor,
                    context,
                } => self.emit_paragraph(runs, anchor, &context),
                Task::Emit(block) => self.blocks.push(block),
                Task::StartItem {
                    item,
                    marker,
                    anchor,
                } => {
                    self.flush_pending();
                    self.pending = Some(PendingItem {
                        item,
                        marker,
                        anchor,
                    });
                }
                Task::EndItem => self.flush_pending(),
            }
            stack.extend(tasks.into_iter().rev());
        }

        self.flush_pending();
        Ok(())
    }

    /// An item that never received a paragraph still shows its marker.
    fn flush_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.blocks.push(Block::ListItem(ListItem {
                list_id: pending.item.list_id,
                depth: pending.item.depth,
                marker: pending.marker,
                runs: Vec::new(),
                continuation: false,
                anchor: pending.anchor,
            }));
        }
    }

    fn emit_paragraph(&mut self, runs: Vec<Run>, anchor: Option<String>, context: &Context) {
        let runs = finish_runs(runs);
        if runs.is_empty() && anchor.is_none() {
            return;
        }

        let Some(item) = context.item else {
            self.blocks.push(Block::Paragraph(Paragraph {
                runs,
                role: context.role,
                anchor,
            }));
            return;
        };

        let block = match self.pending.take() {
            Some(pending) => ListItem {
                list_id: pending.item.list_id,
                depth: pending.item.depth,
                marker: pending.marker,
                runs,
                continuation: false,
                anchor: pending.anchor.or(anchor),
            },
            None => ListItem {
                list_id: item.list_id,
                depth: item.depth,
                marker: ListMarker::Empty,
                runs,
                continuation: true,
                anchor,
            },
        };
        self.blocks.push(Block::ListItem(block));
    }

    fn visit(&mut self, node: &'a DocumentNode, context: Context, tasks: &mut Vec<Task<'a>>) -> Result<()> {
        match node.tag {
            Tag::Front => {
                self.blocks.push(Block::PartStart { part: Part::Front });
                self.blocks
                    .extend(front::title_page(node, self.metadata, self.options));
                for child in node.elements() {
                    if matches!(child.tag, Tag::Abstract | Tag::Note) {
                        tasks.push(Task::Visit(child, context.clone()));
                    }
                }
            }
            Tag::Middle | Tag::Back => {
                self.blocks.push(Block::PartStart { part: context.part });
                mixed_content(node, &[], &context, None, tasks);
            }
            Tag::Abstract => {
                let attrs = SectionAttrs::read(node);
                let mut heading = Heading::unnumbered(1, "Abstract");
                heading.anchor = attrs.anchor;
                tasks.push(Task::Emit(Block::Heading(heading)));
                let inner = Context {
                    role: ParagraphRole::Abstract,
                    ..context
                };
                mixed_content(node, &[], &inner, None, tasks);
            }
            Tag::Note => {
                let attrs = SectionAttrs::read(node);
                let mut heading = Heading::unnumbered(1, attrs.title.unwrap_or_else(|| "Note".into()));
                if let Some(name) = node.child(Tag::Name) {
                    heading.title = runs_of(name);
                }
                heading.anchor = attrs.anchor;
                tasks.push(Task::Emit(Block::Heading(heading)));
                mixed_content(node, &[Tag::Name], &context, None, tasks);
            }
            Tag::Section => self.section(node, context, tasks),
            Tag::References => self.references(node, context, tasks),
            Tag::Referencegroup => {
                if let Some(entry) = reference::group_entry(node, context.group) {
                    tasks.push(Task::Emit(Block::ReferenceEntry(entry)));
                }
                for child in node.children_tagged(Tag::Reference) {
                    tasks.push(Task::Visit(child, context.clone()));
                }
            }
            Tag::Reference => {
                let entry = reference::reference_entry(node, context.group);
                tasks.push(Task::Emit(Block::ReferenceEntry(entry)));
            }
            Tag::T | Tag::Preamble | Tag::Postamble | Tag::Li | Tag::Dd | Tag::Dt => {
                let anchor = TextAttrs::read(node).anchor;
                mixed_content(node, &[], &context, anchor, tasks);
            }
            Tag::Blockquote | Tag::Aside => {
                let inner = Context {
                    role: ParagraphRole::Quote,
                    ..context
                };
                let anchor = TextAttrs::read(node).anchor;
                mixed_content(node, &[Tag::Name], &inner, anchor, tasks);
            }
            Tag::List | Tag::Ul | Tag::Ol | Tag::Dl => self.list(node, &context, tasks),
            Tag::Figure => figure(node, &context, tasks),
            Tag::Artwork | Tag::Sourcecode => {
                tasks.push(Task::Emit(Block::Figure(Figure {
                    anchor: ArtworkAttrs::read(node).anchor,
                    caption: Vec::new(),
                    artwork: vec![artwork(node)],
                    numbered: false,
                    number: None,
                })));
            }
            Tag::Table => table(node, tasks),
            Tag::Texttable => texttable(node, &context, tasks),
            Tag::Boilerplate | Tag::Name | Tag::Iref => {}
            tag if tag.is_inline() => {
                // Inline element at block level, e.g. an xref directly in a section
                tasks.push(Task::Paragraph {
                    runs: element_runs(node),
                    anchor: None,
                    context,
                });
            }
            tag => {
                log::debug!("treating <{}> at {} as text container", tag.name(), node.location);
                mixed_content(node, &[], &context, None, tasks);
            }
        }
        Ok(())
    }

    fn section(&mut self, node: &'a DocumentNode, context: Context, tasks: &mut Vec<Task<'a>>) {
        let attrs = SectionAttrs::read(node);
        let level = context.depth.saturating_add(1);
        let scheme = if !attrs.numbered {
            NumberingScheme::Unnumbered
        } else if context.part == Part::Back {
            NumberingScheme::Appendix
        } else if context.part == Part::Front {
            NumberingScheme::Unnumbered
        } else {
            NumberingScheme::Section
        };

        let title = match node.child(Tag::Name) {
            Some(name) => runs_of(name),
            None => attrs.title.map(|t| vec![Run::plain(t)]).unwrap_or_default(),
        };

        tasks.push(Task::Emit(Block::Heading(Heading {
            level,
            title,
            anchor: attrs.anchor,
            scheme,
            number: None,
        })));

        let inner = Context {
            depth: level,
            item: None,
            ..context
        };
        mixed_content(node, &[Tag::Name], &inner, None, tasks);
    }

    fn references(&mut self, node: &'a DocumentNode, context: Context, tasks: &mut Vec<Task<'a>>) {
        let attrs = ReferencesAttrs::read(node);
        let level = context.depth.saturating_add(1);
        // Top-level references in back continue the section numbering
        let scheme = match context.part {
            Part::Back if context.depth > 0 => NumberingScheme::Appendix,
            Part::Front => NumberingScheme::Unnumbered,
            _ => NumberingScheme::Section,
        };

        let title = match node.child(Tag::Name) {
            Some(name) => runs_of(name),
            None => vec![Run::plain(attrs.title.clone())],
        };

        tasks.push(Task::Emit(Block::Heading(Heading {
            level,
            title,
            anchor: attrs.anchor,
            scheme,
            number: None,
        })));

        let inner = Context {
            depth: level,
            group: ReferenceGroup::from_title(&attrs.title),
            ..context
        };
        mixed_content(node, &[Tag::Name], &inner, None, tasks);
    }

    fn list(&mut self, node: &'a DocumentNode, context: &Context, tasks: &mut Vec<Task<'a>>) {
        let attrs = ListAttrs::read(node, context.list_style.as_ref());
        let item = ItemContext {
            list_id: self.next_list_id,
            depth: context.item.map_or(0, |outer| outer.depth.saturating_add(1)),
        };
        self.next_list_id += 1;

        let inner = Context {
            item: Some(item),
            list_style: Some(attrs.style.clone()),
            ..context.clone()
        };

        match node.tag {
            Tag::Dl => {
                let mut elements = node.elements().peekable();
                while let Some(el) = elements.next() {
                    match el.tag {
                        Tag::Dt => {
                            tasks.push(Task::StartItem {
                                item,
                                marker: ListMarker::Hanging { label: runs_of(el) },
                                anchor: TextAttrs::read(el).anchor,
                            });
                            if let Some(dd) = elements.next_if(|n| n.tag == Tag::Dd) {
                                tasks.push(Task::Visit(dd, inner.clone()));
                            }
                            tasks.push(Task::EndItem);
                        }
                        // A dd without a preceding dt continues the previous item
                        _ => tasks.push(Task::Visit(el, inner.clone())),
                    }
                }
            }
            _ => {
                let item_tag = if node.tag == Tag::List { Tag::T } else { Tag::Li };
                for el in node.elements() {
                    if el.tag != item_tag {
                        tasks.push(Task::Visit(el, inner.clone()));
                        continue;
                    }
                    let text_attrs = TextAttrs::read(el);
                    let marker = match (&attrs.style, text_attrs.hang_text) {
                        (ListStyle::Hanging, hang) => ListMarker::Hanging {
                            label: hang.map(|h| vec![Run::plain(h)]).unwrap_or_default(),
                        },
                        (style, _) => marker_for(style, attrs.start),
                    };
                    tasks.push(Task::StartItem {
                        item,
                        marker,
                        anchor: None,
                    });
                    tasks.push(Task::Visit(el, inner.clone()));
                    tasks.push(Task::EndItem);
                }
            }
        }
    }
}

fn marker_for(style: &ListStyle, start: u32) -> ListMarker {
    let ordered = |format: NumberFormat, template: &str| ListMarker::Ordered {
        format,
        template: template.to_string(),
        start,
    };
    match style {
        ListStyle::Symbols => ListMarker::Bullet,
        ListStyle::Numbers => ordered(NumberFormat::Decimal, "%d."),
        ListStyle::Letters => ordered(NumberFormat::LowerLetter, "%d."),
        ListStyle::UpperLetters => ordered(NumberFormat::UpperLetter, "%d."),
        ListStyle::LowerRoman => ordered(NumberFormat::LowerRoman, "%d."),
        ListStyle::UpperRoman => ordered(NumberFormat::UpperRoman, "%d."),
        ListStyle::Hanging => ListMarker::Hanging { label: Vec::new() },
        ListStyle::Empty => ListMarker::Empty,
        ListStyle::Format(template) => {
            let (format, directive) = [
                (NumberFormat::Decimal, "%d"),
                (NumberFormat::LowerLetter, "%c"),
                (NumberFormat::UpperLetter, "%C"),
                (NumberFormat::LowerRoman, "%i"),
                (NumberFormat::UpperRoman, "%I"),
            ]
            .into_iter()
            .find(|(_, d)| template.contains(d))
            .unwrap_or((NumberFormat::Decimal, "%d"));
            ordered(format, &template.replacen(directive, "%d", 1))
        }
    }
}

/// Split `node`'s children into paragraphs of inline content and block
/// children, queued in document order. The first paragraph takes `anchor`.
fn mixed_content<'a>(
    node: &'a DocumentNode,
    skip: &[Tag],
    context: &Context,
    mut anchor: Option<String>,
    tasks: &mut Vec<Task<'a>>,
) {
    let mut inline: Vec<&'a Node> = Vec::new();

    for child in &node.children {
        match child {
            Node::Element(el) if skip.contains(&el.tag) => {}
            Node::Element(el) if !el.tag.is_inline() => {
                flush(&mut inline, &mut anchor, context, tasks);
                tasks.push(Task::Visit(el, context.clone()));
            }
            other => inline.push(other),
        }
    }
    flush(&mut inline, &mut anchor, context, tasks);
}

fn flush<'a>(
    inline: &mut Vec<&'a Node>,
    anchor: &mut Option<String>,
    context: &Context,
    tasks: &mut Vec<Task<'a>>,
) {
    if inline.is_empty() {
        return;
    }
    let runs = collect_runs(inline.drain(..));
    let has_text = runs.iter().any(|r| !r.display_text().trim().is_empty());
    if has_text || anchor.is_some() {
        tasks.push(Task::Paragraph {
            runs,
            anchor: anchor.take(),
            context: context.clone(),
        });
    }
}

fn artwork(node: &DocumentNode) -> Artwork {
    let kind = if node.tag == Tag::Sourcecode {
        ArtworkKind::Source
    } else {
        ArtworkKind::Art
    };
    Artwork::from_text(kind, ArtworkAttrs::read(node).language, &node.text())
}

fn caption(node: &DocumentNode, attrs: &FloatAttrs) -> Vec<Run> {
    match node.child(Tag::Name) {
        Some(name) => runs_of(name),
        None => attrs
            .title
            .as_ref()
            .map(|t| vec![Run::plain(t.clone())])
            .unwrap_or_default(),
    }
}

fn amble<'a>(node: &'a DocumentNode, tag: Tag, context: &Context, tasks: &mut Vec<Task<'a>>) {
    if let Some(el) = node.child(tag) {
        tasks.push(Task::Visit(el, context.clone()));
    }
}

fn figure<'a>(node: &'a DocumentNode, context: &Context, tasks: &mut Vec<Task<'a>>) {
    let attrs = FloatAttrs::read(node);
    amble(node, Tag::Preamble, context, tasks);
    tasks.push(Task::Emit(Block::Figure(Figure {
        caption: caption(node, &attrs),
        anchor: attrs.anchor,
        artwork: node
            .elements()
            .filter(|el| matches!(el.tag, Tag::Artwork | Tag::Sourcecode))
            .map(artwork)
            .collect(),
        numbered: true,
        number: None,
    })));
    amble(node, Tag::Postamble, context, tasks);
}

/// Cell content: inline runs, with block children separated by breaks.
fn cell(node: &DocumentNode, is_header: bool) -> Cell {
    Cell {
        runs: runs_of(node),
        col_span: read_span(node, "colspan"),
        row_span: read_span(node, "rowspan"),
        alignment: read_alignment(node),
        is_header,
    }
}

fn table<'a>(node: &'a DocumentNode, tasks: &mut Vec<Task<'a>>) {
    let attrs = FloatAttrs::read(node);
    let mut rows = Vec::new();

    for section in node.elements() {
        let in_head = section.tag == Tag::Thead;
        let section_rows: Vec<&DocumentNode> = match section.tag {
            Tag::Thead | Tag::Tbody | Tag::Tfoot => section.children_tagged(Tag::Tr).collect(),
            Tag::Tr => vec![section],
            _ => continue,
        };
        for tr in section_rows {
            let cells: Vec<Cell> = tr
                .elements()
                .filter(|c| matches!(c.tag, Tag::Th | Tag::Td))
                .map(|c| cell(c, in_head || c.tag == Tag::Th))
                .collect();
            let is_header = in_head || (!cells.is_empty() && cells.iter().all(|c| c.is_header));
            rows.push(Row { cells, is_header });
        }
    }

    tasks.push(Task::Emit(Block::Table(Table {
        caption: caption(node, &attrs),
        anchor: attrs.anchor,
        rows,
        number: None,
    })));
}

fn texttable<'a>(node: &'a DocumentNode, context: &Context, tasks: &mut Vec<Task<'a>>) {
    let attrs = FloatAttrs::read(node);
    amble(node, Tag::Preamble, context, tasks);

    let columns: Vec<&DocumentNode> = node.children_tagged(Tag::Ttcol).collect();
    let alignments: Vec<_> = columns.iter().map(|c| read_alignment(c)).collect();
    let mut rows = Vec::new();

    if columns.iter().any(|c| !c.normalized_text().is_empty()) {
        rows.push(Row::header(
            columns.iter().map(|c| cell(c, true)).collect(),
        ));
    }

    let width = columns.len().max(1);
    let cells: Vec<&DocumentNode> = node.children_tagged(Tag::C).collect();
    for chunk in cells.chunks(width) {
        let cells = chunk
            .iter()
            .enumerate()
            .map(|(i, c)| Cell {
                alignment: alignments.get(i).copied().unwrap_or_default(),
                ..cell(c, false)
            })
            .collect();
        rows.push(Row {
            cells,
            is_header: false,
        });
    }

    tasks.push(Task::Emit(Block::Table(Table {
        caption: attrs.title.map(|t| vec![Run::plain(t)]).unwrap_or_default(),
        anchor: attrs.anchor,
        rows,
        number: None,
    })));
    amble(node, Tag::Postamble, context, tasks);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::plain_text;
    use crate::xml2rfc::parse_str;

    fn build_str(xml: &str) -> Document {
        let root = parse_str(xml).unwrap();
        build(&root, &ConvertOptions::default()).unwrap().document
    }

    fn doc(middle: &str) -> Document {
        build_str(&format!(
            "<rfc><front><title>T</title><author fullname=\"A\"/></front><middle>{}</middle><back/></rfc>",
            middle
        ))
    }

    fn middle_blocks(document: &Document) -> Vec<&Block> {
        document.part_blocks(Part::Middle).collect()
    }

    #[test]
    fn test_minimal_document() {
        let document = doc("");
        assert_eq!(document.metadata.title, "T");
        assert!(matches!(document.blocks[0], Block::PartStart { part: Part::Front }));
        assert!(document
            .blocks
            .iter()
            .any(|b| matches!(b, Block::PartStart { part: Part::Back })));
    }

    #[test]
    fn test_sections_and_paragraphs() {
        let document = doc(
            "<section anchor=\"intro\" title=\"Introduction\"><t>Hello   <em>world</em>.</t>\
             <section title=\"Sub\"><t>Nested</t></section></section>\
             <section numbered=\"false\"><name>Unnumbered</name></section>",
        );
        let blocks = middle_blocks(&document);
        match blocks[0] {
            Block::Heading(h) => {
                assert_eq!(h.level, 1);
                assert_eq!(h.anchor.as_deref(), Some("intro"));
                assert_eq!(h.scheme, NumberingScheme::Section);
                assert_eq!(h.title_text(), "Introduction");
            }
            other => panic!("expected heading, got {:?}", other),
        }
        assert_eq!(blocks[1].plain_text(), "Hello world.");
        assert!(matches!(blocks[2], Block::Heading(h) if h.level == 2));
        assert!(matches!(blocks[4], Block::Heading(h) if h.scheme == NumberingScheme::Unnumbered));
    }

    #[test]
    fn test_t_split_around_nested_list() {
        let document = doc(
            "<section title=\"S\"><t>Before<list style=\"numbers\"><t>one</t><t>two</t></list>After</t></section>",
        );
        let blocks = middle_blocks(&document);
        assert_eq!(blocks[1].plain_text(), "Before");
        match blocks[2] {
            Block::ListItem(item) => {
                assert_eq!(item.depth, 0);
                assert!(!item.continuation);
                assert!(matches!(item.marker, ListMarker::Ordered { format: NumberFormat::Decimal, .. }));
            }
            other => panic!("expected list item, got {:?}", other),
        }
        assert_eq!(blocks[3].plain_text(), "two");
        assert!(matches!(blocks[4], Block::Paragraph(p) if p.plain_text() == "After"));
    }

    #[test]
    fn test_v3_lists_nesting_and_continuation() {
        let document = doc(
            "<section><name>S</name><ul><li><t>first</t><t>more</t></li>\
             <li>second<ol type=\"a\"><li>inner</li></ol></li></ul></section>",
        );
        let items: Vec<&ListItem> = middle_blocks(&document)
            .into_iter()
            .filter_map(|b| match b {
                Block::ListItem(i) => Some(i),
                _ => None,
            })
            .collect();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].marker, ListMarker::Bullet);
        assert!(items[1].continuation);
        assert_eq!(plain_text(&items[2].runs), "second");
        assert_eq!(items[3].depth, 1);
        assert!(matches!(items[3].marker, ListMarker::Ordered { format: NumberFormat::LowerLetter, .. }));
        assert_ne!(items[3].list_id, items[0].list_id);
    }

    #[test]
    fn test_definition_list() {
        let document = doc("<section><name>S</name><dl><dt>term</dt><dd>meaning</dd></dl></section>");
        let blocks = middle_blocks(&document);
        match blocks[1] {
            Block::ListItem(item) => {
                assert_eq!(
                    item.marker,
                    ListMarker::Hanging {
                        label: vec![Run::plain("term")]
                    }
                );
                assert_eq!(plain_text(&item.runs), "meaning");
            }
            other => panic!("expected list item, got {:?}", other),
        }
    }

    #[test]
    fn test_hanging_v2_list() {
        let document = doc(
            "<section title=\"S\"><t><list style=\"hanging\"><t hangText=\"MUST\">required</t></list></t></section>",
        );
        let item = middle_blocks(&document)
            .into_iter()
            .find_map(|b| match b {
                Block::ListItem(i) => Some(i.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(item.marker, ListMarker::Hanging { label: vec![Run::plain("MUST")] });
    }

    #[test]
    fn test_format_list_template() {
        assert_eq!(
            marker_for(&ListStyle::Format("R%c:".into()), 1),
            ListMarker::Ordered {
                format: NumberFormat::LowerLetter,
                template: "R%d:".into(),
                start: 1
            }
        );
    }

    #[test]
    fn test_figure_with_preamble() {
        let document = doc(
            "<section title=\"S\"><figure anchor=\"fig-1\" title=\"Layout\">\
             <preamble>Before fig</preamble><artwork><![CDATA[\n  +--+\n  |  |\n]]></artwork>\
             <postamble>After fig</postamble></figure></section>",
        );
        let blocks = middle_blocks(&document);
        assert_eq!(blocks[1].plain_text(), "Before fig");
        match blocks[2] {
            Block::Figure(f) => {
                assert!(f.numbered);
                assert_eq!(f.anchor.as_deref(), Some("fig-1"));
                assert_eq!(plain_text(&f.caption), "Layout");
                assert_eq!(f.artwork[0].lines, vec!["  +--+", "  |  |"]);
            }
            other => panic!("expected figure, got {:?}", other),
        }
        assert_eq!(blocks[3].plain_text(), "After fig");
    }

    #[test]
    fn test_v3_table() {
        let document = doc(
            "<section><name>S</name><table anchor=\"tab\"><name>Codes</name>\
             <thead><tr><th>Code</th><th align=\"right\">Value</th></tr></thead>\
             <tbody><tr><td colspan=\"2\">all</td></tr></tbody></table></section>",
        );
        let table = middle_blocks(&document)
            .into_iter()
            .find_map(|b| match b {
                Block::Table(t) => Some(t.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(plain_text(&table.caption), "Codes");
        assert!(table.rows[0].is_header);
        assert_eq!(table.rows[0].cells[1].alignment, crate::model::CellAlignment::Right);
        assert_eq!(table.rows[1].cells[0].col_span, 2);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_texttable() {
        let document = doc(
            "<section title=\"S\"><texttable title=\"Old\"><ttcol>A</ttcol><ttcol align=\"center\">B</ttcol>\
             <c>1</c><c>2</c><c>3</c><c>4</c></texttable></section>",
        );
        let table = middle_blocks(&document)
            .into_iter()
            .find_map(|b| match b {
                Block::Table(t) => Some(t.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[2].cells[1].plain_text(), "4");
        assert_eq!(table.rows[2].cells[1].alignment, crate::model::CellAlignment::Center);
    }

    #[test]
    fn test_back_matter() {
        let document = build_str(
            "<rfc><front><title>T</title><author fullname=\"A\"/>\
             <abstract><t>Summary.</t></abstract></front><middle/>\
             <back><references title=\"Normative References\">\
             <reference anchor=\"RFC2119\"><front><title>Key words</title></front></reference>\
             </references><section title=\"Extra\"><t>x</t></section></back></rfc>",
        );
        let back: Vec<&Block> = document.part_blocks(Part::Back).collect();
        assert!(matches!(back[0], Block::Heading(h) if h.scheme == NumberingScheme::Section));
        assert!(matches!(back[1], Block::ReferenceEntry(r) if r.group == ReferenceGroup::Normative));
        assert!(matches!(back[2], Block::Heading(h) if h.scheme == NumberingScheme::Appendix));

        let abstract_para = document
            .blocks
            .iter()
            .find(|b| matches!(b, Block::Paragraph(p) if p.role == ParagraphRole::Abstract))
            .unwrap();
        assert_eq!(abstract_para.plain_text(), "Summary.");
    }

    #[test]
    fn test_blockquote_role() {
        let document = doc("<section><name>S</name><blockquote>Quoted text</blockquote></section>");
        assert!(middle_blocks(&document)
            .iter()
            .any(|b| matches!(b, Block::Paragraph(p) if p.role == ParagraphRole::Quote)));
    }

    #[test]
    fn test_unknown_element_diagnostic() {
        let root = parse_str(
            "<rfc><front><title>T</title><author fullname=\"A\"/></front>\
             <middle><section title=\"S\"><t>x <u>y</u></t></section></middle></rfc>",
        )
        .unwrap();
        let built = build(&root, &ConvertOptions::default()).unwrap();
        assert_eq!(built.diagnostics.len(), 1);
        assert_eq!(built.diagnostics[0].subject, "u");
    }
}
