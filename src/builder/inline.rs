//! Inline markup to typed runs.

use unicode_normalization::UnicodeNormalization;

use crate::model::{merge_adjacent_runs, normalize_whitespace, Run, TextStyle, XrefRun};
use crate::xml2rfc::vocab::{CrefAttrs, ErefAttrs, SpanxStyle, Tag, XrefAttrs};
use crate::xml2rfc::{DocumentNode, Node};

fn nfc(text: &str) -> String {
    text.nfc().collect()
}

enum Step<'a> {
    Visit(&'a Node, TextStyle),
    Element(&'a DocumentNode, TextStyle),
    Break,
}

/// Collect runs from a sequence of sibling nodes. Block elements met along
/// the way contribute their text followed by a line break.
pub(super) fn collect_runs<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Vec<Run> {
    let nodes: Vec<&Node> = nodes.into_iter().collect();
    run_steps(
        nodes
            .into_iter()
            .rev()
            .map(|n| Step::Visit(n, TextStyle::default()))
            .collect(),
    )
}

/// Runs for a single inline element, including its own markup.
pub(super) fn element_runs(el: &DocumentNode) -> Vec<Run> {
    run_steps(vec![Step::Element(el, TextStyle::default())])
}

fn run_steps(mut stack: Vec<Step<'_>>) -> Vec<Run> {
    let mut runs = Vec::new();

    while let Some(step) = stack.pop() {
        let (el, style) = match step {
            Step::Element(el, style) => (el, style),
            Step::Visit(Node::Element(el), style) => (el, style),
            Step::Visit(Node::Text(text), style) => {
                runs.push(Run::styled(nfc(text), style));
                continue;
            }
            Step::Visit(Node::Opaque(opaque), style) => {
                runs.push(Run::styled(nfc(&opaque.text), style));
                continue;
            }
            Step::Break => {
                runs.push(Run::Break);
                continue;
            }
        };

        let mut inner = style;
        match el.tag {
            Tag::Bold | Tag::Strong | Tag::Bcp14 => inner.bold = true,
            Tag::Em => inner.italic = true,
            Tag::Tt => inner.code = true,
            Tag::Sub => inner.subscript = true,
            Tag::Sup => inner.superscript = true,
            Tag::Spanx => match SpanxStyle::read(el) {
                SpanxStyle::Emph => inner.italic = true,
                SpanxStyle::Strong => inner.bold = true,
                SpanxStyle::Verb => inner.code = true,
            },
            Tag::Xref => {
                if let Ok(attrs) = XrefAttrs::read(el) {
                    runs.push(xref_run(el, attrs, style));
                }
                continue;
            }
            Tag::Eref => {
                if let Ok(ErefAttrs { target }) = ErefAttrs::read(el) {
                    let text = nfc(&el.normalized_text());
                    runs.push(Run::Link {
                        text: if text.is_empty() { target.clone() } else { text },
                        url: target,
                        style,
                    });
                }
                continue;
            }
            Tag::Vspace | Tag::Br => {
                runs.push(Run::Break);
                continue;
            }
            Tag::Cref => {
                let text = nfc(&el.normalized_text());
                let note = match CrefAttrs::read(el).source {
                    Some(source) => format!(" [{}: {}] ", source, text),
                    None => format!(" [{}] ", text),
                };
                runs.push(Run::styled(note, TextStyle { italic: true, ..style }));
                continue;
            }
            Tag::Iref => continue,
            tag if !tag.is_inline() => stack.push(Step::Break),
            _ => {}
        }

        stack.extend(el.children.iter().rev().map(|c| Step::Visit(c, inner)));
    }

    runs
}

fn xref_run(el: &DocumentNode, attrs: XrefAttrs, style: TextStyle) -> Run {
    let content = nfc(&el.normalized_text());

    let mut xref = XrefRun::new(attrs.target, attrs.format);
    xref.content = (!content.is_empty()).then_some(content);
    xref.style = style;
    Run::Xref(xref)
}

/// Collapse whitespace, trim edge breaks and merge like-styled runs.
pub(super) fn finish_runs(mut runs: Vec<Run>) -> Vec<Run> {
    normalize_whitespace(&mut runs);
    while matches!(runs.first(), Some(Run::Break)) {
        runs.remove(0);
    }
    while matches!(runs.last(), Some(Run::Break)) {
        runs.pop();
    }
    merge_adjacent_runs(&mut runs);
    runs
}

/// Runs for an element's content, finished.
pub(super) fn runs_of(el: &DocumentNode) -> Vec<Run> {
    finish_runs(collect_runs(&el.children))
}
