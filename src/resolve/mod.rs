//! Numbering and cross-reference resolution.
//!
//! Two passes over the block sequence: the first assigns numbers and fills
//! the [`CrossReferenceTable`]; the second rewrites every `xref` run against
//! the complete table, so forward references resolve like backward ones.

mod numbering;
mod xref;

pub use numbering::NumberingContext;
pub use xref::{placeholder, CrossReferenceTable, TargetKind, XrefTarget};

use crate::diagnostic::Diagnostic;
use crate::model::{plain_text, Block, Document, NumberingScheme, Run};

/// Output of [`resolve`].
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub table: CrossReferenceTable,
    /// Duplicate anchors and unresolved references, in document order
    pub diagnostics: Vec<Diagnostic>,
}

/// Number `document` in place and resolve its cross-references.
pub fn resolve(document: &mut Document) -> Resolution {
    resolve_with(document, NumberingContext::new())
}

/// Like [`resolve`], starting from the given counters.
pub fn resolve_with(document: &mut Document, mut numbering: NumberingContext) -> Resolution {
    let mut table = CrossReferenceTable::new();
    let mut diagnostics = Vec::new();

    assign_numbers(document, &mut numbering, &mut table, &mut diagnostics);

    let mut unresolved = 0usize;
    for block in &mut document.blocks {
        for runs in block.runs_mut() {
            for run in runs.iter_mut() {
                if let Run::Xref(xref) = run {
                    if !table.apply(xref) {
                        log::warn!("unresolved cross-reference to `{}`", xref.target);
                        diagnostics.push(Diagnostic::unresolved_reference(&xref.target));
                        unresolved += 1;
                    }
                }
            }
        }
    }

    log::debug!(
        "resolved {} anchors, {} unresolved references",
        table.len(),
        unresolved
    );

    Resolution { table, diagnostics }
}

fn assign_numbers(
    document: &mut Document,
    numbering: &mut NumberingContext,
    table: &mut CrossReferenceTable,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Label of the latest heading, for anchored paragraphs and artwork
    let mut enclosing: Option<XrefTarget> = None;

    for block in &mut document.blocks {
        let target = match block {
            Block::PartStart { part } => {
                numbering.enter_part(*part);
                enclosing = None;
                continue;
            }
            Block::Heading(heading) => {
                let title = heading.title_text();
                let target = match heading.scheme {
                    NumberingScheme::Section => {
                        let number = numbering.next_section(heading.level);
                        heading.number = Some(number.clone());
                        XrefTarget {
                            kind: TargetKind::Section,
                            label: format!("Section {}", number),
                            counter: number,
                            title,
                        }
                    }
                    NumberingScheme::Appendix => {
                        let number = numbering.next_appendix(heading.level);
                        heading.number = Some(number.clone());
                        XrefTarget {
                            kind: TargetKind::Appendix,
                            label: format!("Appendix {}", number),
                            counter: number,
                            title,
                        }
                    }
                    NumberingScheme::Unnumbered => XrefTarget {
                        kind: TargetKind::Section,
                        label: title.clone(),
                        counter: title.clone(),
                        title,
                    },
                };
                enclosing = Some(target.clone());
                target
            }
            Block::Figure(figure) if figure.numbered => {
                let n = numbering.next_figure();
                figure.number = Some(n);
                let caption = plain_text(&figure.caption);
                XrefTarget {
                    kind: TargetKind::Figure,
                    label: format!("Figure {}", n),
                    counter: n.to_string(),
                    title: if caption.is_empty() {
                        format!("Figure {}", n)
                    } else {
                        caption
                    },
                }
            }
            Block::Table(table_block) => {
                let n = numbering.next_table();
                table_block.number = Some(n);
                let caption = plain_text(&table_block.caption);
                XrefTarget {
                    kind: TargetKind::Table,
                    label: format!("Table {}", n),
                    counter: n.to_string(),
                    title: if caption.is_empty() {
                        format!("Table {}", n)
                    } else {
                        caption
                    },
                }
            }
            Block::ReferenceEntry(entry) => {
                let n = numbering.next_reference();
                let counter = entry.anchor.clone().unwrap_or_else(|| n.to_string());
                let label = format!("[{}]", counter);
                entry.label = Some(label.clone());
                XrefTarget {
                    kind: TargetKind::Reference,
                    title: entry.title.clone().unwrap_or_else(|| label.clone()),
                    label,
                    counter,
                }
            }
            Block::Figure(_) | Block::Paragraph(_) | Block::ListItem(_) => {
                let Some(anchor) = block.anchor() else {
                    continue;
                };
                match enclosing {
                    Some(ref section) => XrefTarget {
                        kind: TargetKind::Paragraph,
                        ..section.clone()
                    },
                    None => XrefTarget {
                        kind: TargetKind::Paragraph,
                        label: anchor.to_string(),
                        counter: anchor.to_string(),
                        title: anchor.to_string(),
                    },
                }
            }
        };

        if let Some(anchor) = block.anchor() {
            if !table.insert(anchor, target) {
                log::warn!("duplicate anchor `{}`", anchor);
                diagnostics.push(Diagnostic::duplicate_anchor(anchor));
            }
        }
    }
}
