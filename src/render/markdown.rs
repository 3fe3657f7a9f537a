//! Markdown renderer in the kramdown-rfc layout.
//!
//! The output starts with a YAML header carrying the front matter and the
//! bibliography anchors, followed by `--- abstract`, `--- note_*`,
//! `--- middle` and `--- back` sections. Cross-references are written as
//! `{{anchor}}` so kramdown-rfc regenerates their labels.

use std::collections::HashMap;

use unicode_width::UnicodeWidthStr;

use crate::error::Result;
use crate::model::{
    Block, Document, Figure, Heading, ListItem, ListMarker, NumberingScheme, Paragraph,
    ParagraphRole, Part, ReferenceGroup, Run, Table, TextStyle,
};
use crate::options::ConvertOptions;

/// Convert a Document to kramdown-rfc Markdown.
pub fn to_markdown(doc: &Document, options: &ConvertOptions) -> Result<String> {
    let width = options.markdown_width.max(20);
    let mut output = render_frontmatter(doc);
    let mut sections: Vec<String> = Vec::new();
    let mut ordinals: HashMap<usize, u32> = HashMap::new();

    let mut part = None;
    let blocks = &doc.blocks;
    let mut i = 0;
    while i < blocks.len() {
        let block = &blocks[i];
        match block {
            Block::PartStart { part: p } => {
                part = Some(*p);
                match p {
                    Part::Front => {}
                    Part::Middle => sections.push("--- middle".to_string()),
                    Part::Back => sections.push("--- back".to_string()),
                }
            }
            Block::Heading(h) if part == Some(Part::Front) => {
                sections.push(front_section_marker(h));
            }
            Block::Paragraph(p)
                if matches!(p.role, ParagraphRole::Title | ParagraphRole::FrontMatter) => {}
            Block::Heading(h) if part == Some(Part::Back) && is_reference_heading(blocks, i) => {
                // kramdown-rfc generates reference sections from the header
                let level = h.level;
                i += 1;
                while i < blocks.len() {
                    match &blocks[i] {
                        Block::Heading(next) if next.level > level => i += 1,
                        Block::ReferenceEntry(_) => i += 1,
                        _ => break,
                    }
                }
                continue;
            }
            Block::ReferenceEntry(_) => {}
            Block::Heading(h) => sections.push(render_heading(h)),
            Block::Paragraph(p) => sections.push(render_paragraph(p, width)),
            Block::ListItem(item) => {
                let ordinal = ordinals.entry(item.list_id).or_insert(0);
                if !item.continuation {
                    *ordinal += 1;
                }
                sections.push(render_list_item(item, *ordinal, width));
            }
            Block::Figure(f) => {
                let rendered = render_figure(f);
                if !rendered.is_empty() {
                    sections.push(rendered);
                }
            }
            Block::Table(t) => {
                let rendered = render_table(t);
                if !rendered.is_empty() {
                    sections.push(rendered);
                }
            }
        }
        i += 1;
    }

    output.push_str(&sections.join("\n\n"));
    output.push('\n');
    Ok(output)
}

/// Render the YAML header.
fn render_frontmatter(doc: &Document) -> String {
    let meta = &doc.metadata;
    let mut fm = String::from("---\ncoding: utf-8\n\n");

    fm.push_str(&format!("title: \"{}\"\n", escape_yaml(&meta.title)));
    if let Some(ref abbrev) = meta.abbrev {
        fm.push_str(&format!("abbrev: \"{}\"\n", escape_yaml(abbrev)));
    }
    if let Some(ref name) = meta.doc_name {
        fm.push_str(&format!("docname: {}\n", name));
    }
    if let Some(ref number) = meta.number {
        fm.push_str(&format!("number: {}\n", number));
    }
    if let Some(ref category) = meta.category {
        fm.push_str(&format!("category: {}\n", category));
    }
    if let Some(ref ipr) = meta.ipr {
        fm.push_str(&format!("ipr: {}\n", ipr));
    }
    if let Some(ref submission) = meta.submission_type {
        fm.push_str(&format!("submissiontype: {}\n", submission));
    }
    if let Some(ref area) = meta.area {
        fm.push_str(&format!("area: \"{}\"\n", escape_yaml(area)));
    }
    if let Some(workgroup) = meta.workgroups.first() {
        fm.push_str(&format!("workgroup: \"{}\"\n", escape_yaml(workgroup)));
    }
    if !meta.keywords.is_empty() {
        fm.push_str("keyword:\n");
        for keyword in &meta.keywords {
            fm.push_str(&format!("  - \"{}\"\n", escape_yaml(keyword)));
        }
    }
    if let Some(ref date) = meta.date {
        match (date.iso(), date.year) {
            (Some(iso), _) => fm.push_str(&format!("date: {}\n", iso)),
            (None, Some(year)) => fm.push_str(&format!("date: {}\n", year)),
            (None, None) => {}
        }
    }
    fm.push_str("\nstand_alone: yes\npi: [toc, sortrefs, symrefs, comments]\n");

    if !meta.authors.is_empty() {
        fm.push_str("\nauthor:\n");
        for author in &meta.authors {
            fm.push_str(&format!("  -\n    name: \"{}\"\n", escape_yaml(&author.name)));
            if let Some(ref org) = author.organization {
                fm.push_str(&format!("    org: \"{}\"\n", escape_yaml(org)));
            }
            if let Some(ref email) = author.email {
                fm.push_str(&format!("    email: {}\n", email));
            }
        }
    }

    for group in [ReferenceGroup::Normative, ReferenceGroup::Informative] {
        let anchors: Vec<&str> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::ReferenceEntry(r) if r.group == group => r.anchor.as_deref(),
                _ => None,
            })
            .collect();
        if anchors.is_empty() {
            continue;
        }
        let key = match group {
            ReferenceGroup::Normative => "normative",
            ReferenceGroup::Informative => "informative",
        };
        fm.push_str(&format!("\n{}:\n", key));
        for anchor in anchors {
            fm.push_str(&format!("  {}:\n", anchor));
        }
    }

    fm.push('\n');
    fm
}

/// Escape special characters in YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn front_section_marker(heading: &Heading) -> String {
    let title = heading.title_text();
    if heading.level == 1 && title.eq_ignore_ascii_case("abstract") {
        return "--- abstract".to_string();
    }
    let name: String = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("--- note_{}", name)
}

/// A back-matter heading whose subtree holds only bibliography entries.
fn is_reference_heading(blocks: &[Block], index: usize) -> bool {
    let Some(Block::Heading(heading)) = blocks.get(index) else {
        return false;
    };
    let mut found = false;
    for block in &blocks[index + 1..] {
        match block {
            Block::ReferenceEntry(_) => found = true,
            Block::Heading(h) if h.level > heading.level => {}
            Block::Heading(_) | Block::PartStart { .. } => break,
            _ => return false,
        }
    }
    found
}

fn render_heading(heading: &Heading) -> String {
    let mut output = format!(
        "{} {}",
        "#".repeat(heading.level.clamp(1, 6) as usize),
        render_runs(&heading.title)
    );
    if let Some(ref anchor) = heading.anchor {
        output.push_str(&format!(" {{#{}}}", anchor));
    }
    if heading.scheme == NumberingScheme::Unnumbered {
        output.push_str("\n{:numbered=\"false\"}");
    }
    output
}

fn render_paragraph(para: &Paragraph, width: usize) -> String {
    let text = render_runs(&para.runs);
    let mut output = match para.role {
        ParagraphRole::Quote => wrap(&text, width, "> ", "> "),
        _ => wrap(&text, width, "", ""),
    };
    if let Some(ref anchor) = para.anchor {
        output.push_str(&format!("\n{{: #{}}}", anchor));
    }
    output
}

fn render_list_item(item: &ListItem, ordinal: u32, width: usize) -> String {
    let indent = "    ".repeat(item.depth as usize);
    let text = render_runs(&item.runs);

    if item.continuation {
        let prefix = format!("{}    ", indent);
        return wrap(&text, width, &prefix, &prefix);
    }

    match &item.marker {
        ListMarker::Bullet => {
            let first = format!("{}* ", indent);
            let rest = format!("{}  ", indent);
            wrap(&text, width, &first, &rest)
        }
        ListMarker::Ordered { start, .. } => {
            let n = start + ordinal.saturating_sub(1);
            let first = format!("{}{}. ", indent, n);
            let rest = format!("{}{}", indent, " ".repeat(first.len() - indent.len()));
            wrap(&text, width, &first, &rest)
        }
        ListMarker::Hanging { label } => {
            let term = format!("{}{}", indent, render_runs(label));
            let first = format!("{}: ", indent);
            let rest = format!("{}  ", indent);
            format!("{}\n{}", term, wrap(&text, width, &first, &rest))
        }
        ListMarker::Empty => {
            let prefix = format!("{}    ", indent);
            wrap(&text, width, &prefix, &prefix)
        }
    }
}

fn render_figure(figure: &Figure) -> String {
    let mut blocks = Vec::new();
    for art in &figure.artwork {
        let mut fence = String::from("~~~");
        if let Some(ref language) = art.language {
            fence.push(' ');
            fence.push_str(language);
        }
        let mut block = fence;
        for line in &art.lines {
            block.push('\n');
            block.push_str(line);
        }
        block.push_str("\n~~~");
        blocks.push(block);
    }
    if blocks.is_empty() {
        return String::new();
    }

    let mut output = blocks.join("\n\n");
    if let Some(attrs) = block_attributes(figure.anchor.as_deref(), &figure.caption) {
        output.push('\n');
        output.push_str(&attrs);
    }
    output
}

/// `{: #anchor title="caption"}` line, if either is present.
fn block_attributes(anchor: Option<&str>, caption: &[Run]) -> Option<String> {
    let mut attrs = Vec::new();
    if let Some(anchor) = anchor {
        attrs.push(format!("#{}", anchor));
    }
    let title = crate::model::plain_text(caption);
    if !title.is_empty() {
        attrs.push(format!("title=\"{}\"", escape_yaml(&title)));
    }
    (!attrs.is_empty()).then(|| format!("{{: {}}}", attrs.join(" ")))
}

/// Render a table as a pipe table. Spanned cells are padded with empty
/// cells so every row keeps the full column count.
fn render_table(table: &Table) -> String {
    let col_count = table.column_count();
    if table.is_empty() || col_count == 0 {
        return String::new();
    }

    let mut output = String::new();
    for (i, row) in table.rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(col_count);
        for cell in &row.cells {
            cells.push(render_runs(&cell.runs).replace('\n', " "));
            for _ in 1..cell.grid_span() {
                cells.push(String::new());
            }
        }
        cells.resize(col_count, String::new());

        output.push('|');
        for cell in &cells {
            output.push_str(&format!(" {} |", cell));
        }
        output.push('\n');

        // Separator after the first row
        if i == 0 {
            output.push('|');
            for col in 0..col_count {
                let separator = match column_alignment(table, col) {
                    crate::model::CellAlignment::Left => "---",
                    crate::model::CellAlignment::Center => ":---:",
                    crate::model::CellAlignment::Right => "---:",
                };
                output.push_str(&format!(" {} |", separator));
            }
            output.push('\n');
        }
    }

    if let Some(attrs) = block_attributes(table.anchor.as_deref(), &table.caption) {
        output.push_str(&attrs);
    } else {
        output.pop();
    }
    output
}

/// Alignment of the first cell that starts in `col` of the first row.
fn column_alignment(table: &Table, col: usize) -> crate::model::CellAlignment {
    let mut position = 0;
    if let Some(row) = table.rows.first() {
        for cell in &row.cells {
            if position == col {
                return cell.alignment;
            }
            position += cell.grid_span();
        }
    }
    crate::model::CellAlignment::Left
}

fn render_runs(runs: &[Run]) -> String {
    let mut output = String::new();
    for run in runs {
        match run {
            Run::Text { text, style } => output.push_str(&apply_style(text, *style)),
            Run::Xref(xref) => {
                let rendered = match xref.content {
                    Some(ref content) if !content.is_empty() => {
                        format!("[{}](#{})", escape_markdown(content), xref.target)
                    }
                    _ => format!("{{{{{}}}}}", xref.target),
                };
                output.push_str(&rendered);
            }
            Run::Link { url, text, .. } => {
                if text == url {
                    output.push_str(&format!("<{}>", url));
                } else {
                    output.push_str(&format!("[{}]({})", escape_markdown(text), url));
                }
            }
            Run::Break => output.push('\n'),
        }
    }
    output
}

fn apply_style(text: &str, style: TextStyle) -> String {
    if text.is_empty() {
        return String::new();
    }
    let mut out = if style.code {
        format!("`{}`", text)
    } else {
        escape_markdown(text)
    };
    if style.superscript {
        out = format!("<sup>{}</sup>", out);
    } else if style.subscript {
        out = format!("<sub>{}</sub>", out);
    }
    if style.bold && style.italic {
        out = format!("***{}***", out);
    } else if style.bold {
        out = format!("**{}**", out);
    } else if style.italic {
        out = format!("*{}*", out);
    }
    out
}

/// Escape Markdown control characters in text.
fn escape_markdown(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let chars: Vec<char> = s.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\\' | '`' | '|' | '{' | '}' => {
                result.push('\\');
                result.push(c);
            }
            // Emphasis markers only matter when flanked by non-whitespace
            '*' | '_' => {
                let prev = if i > 0 { Some(chars[i - 1]) } else { None };
                let next = chars.get(i + 1).copied();
                let after_opener = prev.is_none_or(|p| {
                    matches!(p, '(' | '[' | ':' | '-' | '/') || p.is_whitespace()
                });
                let before_closer = next.is_none_or(|n| {
                    matches!(n, ')' | ']' | ':' | '-' | '/') || n.is_whitespace()
                });
                if !(after_opener || before_closer) {
                    result.push('\\');
                }
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

/// Wrap text at `width` display columns. Lines separated by a hard break
/// end with two spaces. Only ASCII blanks break, so no-break spaces hold.
fn wrap(text: &str, width: usize, first_prefix: &str, rest_prefix: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let segments: Vec<&str> = text.split('\n').collect();
    let last = segments.len() - 1;

    for (s, segment) in segments.iter().enumerate() {
        let mut line = String::new();
        for word in segment.split([' ', '\t']).filter(|w| !w.is_empty()) {
            let prefix = if lines.is_empty() { first_prefix } else { rest_prefix };
            if !line.is_empty() && prefix.width() + line.width() + 1 + word.width() > width {
                lines.push(format!("{}{}", prefix, line));
                line.clear();
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        let prefix = if lines.is_empty() { first_prefix } else { rest_prefix };
        let mut finished = format!("{}{}", prefix, line).trim_end().to_string();
        if s < last {
            finished.push_str("  ");
        }
        lines.push(finished);
    }
    lines.join("\n")
}
