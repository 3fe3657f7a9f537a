//! Front matter: document metadata and the title-page blocks.

use crate::model::{Author, Block, DocumentDate, Metadata, Paragraph, ParagraphRole, Run};
use crate::options::ConvertOptions;
use crate::xml2rfc::vocab::{AuthorAttrs, DateAttrs, RfcAttrs, Tag, TitleAttrs};
use crate::xml2rfc::DocumentNode;

use super::inline::runs_of;

fn child_text(node: &DocumentNode, tag: Tag) -> Option<String> {
    node.child(tag)
        .map(DocumentNode::normalized_text)
        .filter(|t| !t.is_empty())
}

pub(super) fn read_author(node: &DocumentNode) -> Option<Author> {
    let attrs = AuthorAttrs::read(node);
    let organization = child_text(node, Tag::Organization);
    let name = attrs.display_name().or_else(|| organization.clone())?;
    let email = node
        .child(Tag::Address)
        .and_then(|address| child_text(address, Tag::Email));

    Some(Author {
        name,
        citation_name: attrs.citation_name(),
        organization,
        email,
        role: attrs.role,
    })
}

pub(super) fn read_date(node: &DocumentNode) -> DocumentDate {
    let attrs = DateAttrs::read(node);
    DocumentDate {
        day: attrs.day.and_then(|d| d.parse().ok()),
        month: attrs.month,
        year: attrs.year.and_then(|y| y.parse().ok()),
    }
}

/// Read metadata from `rfc` and its `front`.
pub(super) fn read_metadata(root: &DocumentNode) -> Metadata {
    let rfc = RfcAttrs::read(root);
    let Some(front) = root.child(Tag::Front) else {
        return Metadata::default();
    };

    let authors: Vec<Author> = front.children_tagged(Tag::Author).filter_map(read_author).collect();

    let mut organizations: Vec<String> = Vec::new();
    for org in authors.iter().filter_map(|a| a.organization.as_ref()) {
        if !organizations.contains(org) {
            organizations.push(org.clone());
        }
    }

    let keywords = front
        .children_tagged(Tag::Keyword)
        .flat_map(|k| {
            k.normalized_text()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        })
        .collect();

    let title = front.child(Tag::Title);

    Metadata {
        title: title.map(DocumentNode::normalized_text).unwrap_or_default(),
        abbrev: title.and_then(|t| TitleAttrs::read(t).abbrev),
        authors,
        organizations,
        date: front.child(Tag::Date).map(read_date),
        keywords,
        area: child_text(front, Tag::Area),
        workgroups: front
            .children_tagged(Tag::Workgroup)
            .map(DocumentNode::normalized_text)
            .filter(|w| !w.is_empty())
            .collect(),
        doc_name: rfc.doc_name,
        number: rfc.number,
        category: rfc.category,
        ipr: rfc.ipr,
        submission_type: rfc.submission_type,
    }
}

fn front_line(text: String) -> Block {
    Block::Paragraph(Paragraph::with_text(ParagraphRole::FrontMatter, text))
}

/// Title, authors, date and metadata lines.
pub(super) fn title_page(front: &DocumentNode, metadata: &Metadata, options: &ConvertOptions) -> Vec<Block> {
    let mut blocks = Vec::new();

    let title_runs = front.child(Tag::Title).map(runs_of).unwrap_or_default();
    blocks.push(Block::Paragraph(Paragraph::new(
        ParagraphRole::Title,
        if title_runs.is_empty() {
            vec![Run::plain(metadata.title.clone())]
        } else {
            title_runs
        },
    )));

    for author in &metadata.authors {
        blocks.push(front_line(author.name.clone()));
    }

    if let Some(date) = metadata.date.as_ref().map(DocumentDate::display) {
        if !date.is_empty() {
            blocks.push(front_line(date));
        }
    }

    if options.front_matter_lines {
        for workgroup in &metadata.workgroups {
            blocks.push(front_line(format!("Workgroup: {}", workgroup)));
        }
        if let Some(ref category) = metadata.category {
            blocks.push(front_line(format!("Category: {}", category)));
        }
        if let Some(ref doc_name) = metadata.doc_name {
            blocks.push(front_line(format!("Docname: {}", doc_name)));
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml2rfc::parse_str;

    const FRONT: &str = r#"<rfc docName="draft-ietf-foo-bar-03" category="std">
  <front>
    <title abbrev="Foo">The Foo Protocol</title>
    <author initials="J." surname="Doe" fullname="Jane Doe">
      <organization>Example Corp</organization>
      <address><email>jane@example.com</email></address>
    </author>
    <author initials="R." surname="Roe"><organization>Example Corp</organization></author>
    <date day="4" month="March" year="2024"/>
    <area>Internet</area>
    <workgroup>FOO Working Group</workgroup>
    <keyword>foo, bar</keyword>
    <keyword>baz</keyword>
  </front>
  <middle/>
</rfc>"#;

    #[test]
    fn test_read_metadata() {
        let root = parse_str(FRONT).unwrap();
        let meta = read_metadata(&root);
        assert_eq!(meta.title, "The Foo Protocol");
        assert_eq!(meta.abbrev.as_deref(), Some("Foo"));
        assert_eq!(meta.authors.len(), 2);
        assert_eq!(meta.authors[1].name, "R. Roe");
        assert_eq!(meta.authors[0].email.as_deref(), Some("jane@example.com"));
        assert_eq!(meta.organizations, vec!["Example Corp"]);
        assert_eq!(meta.keywords, vec!["foo", "bar", "baz"]);
        assert_eq!(meta.date.as_ref().and_then(|d| d.iso()).as_deref(), Some("2024-03-04"));
        assert_eq!(meta.doc_name.as_deref(), Some("draft-ietf-foo-bar-03"));
    }

    #[test]
    fn test_title_page() {
        let root = parse_str(FRONT).unwrap();
        let meta = read_metadata(&root);
        let front = root.child(Tag::Front).unwrap();

        let blocks = title_page(front, &meta, &ConvertOptions::default());
        let texts: Vec<String> = blocks.iter().map(Block::plain_text).collect();
        assert_eq!(
            texts,
            vec![
                "The Foo Protocol",
                "Jane Doe",
                "R. Roe",
                "4 March 2024",
                "Workgroup: FOO Working Group",
                "Category: std",
                "Docname: draft-ietf-foo-bar-03",
            ]
        );

        let bare = title_page(front, &meta, &ConvertOptions::new().with_front_matter_lines(false));
        assert_eq!(bare.len(), 4);
    }
}
