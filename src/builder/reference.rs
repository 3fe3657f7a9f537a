//! Bibliography entries.

use crate::model::{ReferenceEntry, ReferenceGroup, Run};
use crate::xml2rfc::vocab::{ReferenceAttrs, SeriesInfoAttrs, Tag};
use crate::xml2rfc::DocumentNode;

use super::front::{read_author, read_date};
use super::inline::finish_runs;

/// "Doe, J., Roe, R., and S. Poe" style author list.
fn author_list(front: &DocumentNode) -> Option<String> {
    let names: Vec<String> = front
        .children_tagged(Tag::Author)
        .filter_map(read_author)
        .map(|a| a.citation_name.unwrap_or(a.name))
        .collect();

    match names.len() {
        0 => None,
        1 => Some(names[0].clone()),
        2 => Some(format!("{} and {}", names[0], names[1])),
        n => Some(format!("{}, and {}", names[..n - 1].join(", "), names[n - 1])),
    }
}

fn series(node: &DocumentNode) -> impl Iterator<Item = String> + '_ {
    node.children_tagged(Tag::SeriesInfo)
        .filter_map(|s| SeriesInfoAttrs::read(s).display())
}

/// Title of a `reference`, from its `front`.
fn reference_title(node: &DocumentNode) -> Option<String> {
    node.child(Tag::Front)
        .and_then(|f| f.child(Tag::Title))
        .map(DocumentNode::normalized_text)
        .filter(|t| !t.is_empty())
}

/// Build the entry for one `reference`.
///
/// The citation reads `Authors, "Title", Series, Date, <URL>.`, followed by
/// any annotation.
pub(super) fn reference_entry(node: &DocumentNode, group: ReferenceGroup) -> ReferenceEntry {
    let attrs = ReferenceAttrs::read(node);
    let front = node.child(Tag::Front);

    let mut parts: Vec<String> = Vec::new();
    if let Some(authors) = front.and_then(author_list) {
        parts.push(authors);
    }
    if let Some(title) = reference_title(node) {
        parts.push(format!("\"{}\"", title));
    }
    parts.extend(series(node));
    if let Some(front) = front {
        parts.extend(series(front));
    }
    parts.extend(
        node.children_tagged(Tag::Refcontent)
            .map(DocumentNode::normalized_text)
            .filter(|t| !t.is_empty()),
    );
    if let Some(date) = front.and_then(|f| f.child(Tag::Date)).map(read_date) {
        let date = date.display();
        if !date.is_empty() {
            parts.push(date);
        }
    }

    let target = attrs.target.or_else(|| {
        node.children_tagged(Tag::Format)
            .find_map(|f| ReferenceAttrs::read(f).target)
    });

    let mut citation = vec![Run::plain(parts.join(", "))];
    if let Some(ref url) = target {
        citation.push(Run::plain(if parts.is_empty() { "<" } else { ", <" }));
        citation.push(Run::link(url.clone(), url.clone()));
        citation.push(Run::plain(">"));
    }
    citation.push(Run::plain("."));

    for annotation in node.children_tagged(Tag::Annotation) {
        citation.push(Run::plain(" "));
        citation.push(Run::plain(annotation.normalized_text()));
    }

    ReferenceEntry {
        anchor: attrs.anchor,
        title: reference_title(node),
        citation: finish_runs(citation),
        target,
        group,
        label: None,
    }
}

/// Entry standing for a whole `referencegroup`, listing its members' titles.
pub(super) fn group_entry(node: &DocumentNode, group: ReferenceGroup) -> Option<ReferenceEntry> {
    let attrs = ReferenceAttrs::read(node);
    let anchor = attrs.anchor?;
    let titles: Vec<String> = node
        .children_tagged(Tag::Reference)
        .filter_map(reference_title)
        .collect();

    Some(ReferenceEntry {
        anchor: Some(anchor),
        title: None,
        citation: vec![Run::plain(format!("{}.", titles.join("; ")))],
        target: attrs.target,
        group,
        label: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::plain_text;
    use crate::xml2rfc::parse_str;

    fn reference(xml: &str) -> DocumentNode {
        let doc = format!(
            "<rfc><front><title>T</title><author fullname=\"A\"/></front><middle/>\
             <back><references title=\"Normative References\">{}</references></back></rfc>",
            xml
        );
        let root = parse_str(&doc).unwrap();
        root.descendants()
            .find(|n| n.tag == Tag::Reference)
            .unwrap()
            .clone()
    }

    #[test]
    fn test_rfc2119_citation() {
        let node = reference(
            r#"<reference anchor="RFC2119" target="https://www.rfc-editor.org/info/rfc2119">
                 <front>
                   <title>Key words for use in RFCs to Indicate Requirement Levels</title>
                   <author initials="S." surname="Bradner" fullname="S. Bradner"/>
                   <date year="1997" month="March"/>
                 </front>
                 <seriesInfo name="BCP" value="14"/>
                 <seriesInfo name="RFC" value="2119"/>
               </reference>"#,
        );
        let entry = reference_entry(&node, ReferenceGroup::Normative);
        assert_eq!(entry.anchor.as_deref(), Some("RFC2119"));
        assert_eq!(
            plain_text(&entry.citation),
            "Bradner, S., \"Key words for use in RFCs to Indicate Requirement Levels\", \
             BCP 14, RFC 2119, March 1997, <https://www.rfc-editor.org/info/rfc2119>."
        );
        assert!(entry.citation.iter().any(|r| matches!(r, Run::Link { .. })));
    }

    #[test]
    fn test_author_list_forms() {
        let node = reference(
            r#"<reference anchor="X">
                 <front><title>X</title>
                   <author initials="A." surname="One"/>
                   <author initials="B." surname="Two"/>
                   <author initials="C." surname="Three"/>
                 </front>
               </reference>"#,
        );
        let entry = reference_entry(&node, ReferenceGroup::Informative);
        assert!(plain_text(&entry.citation).starts_with("One, A., Two, B., and Three, C., \"X\""));
        assert!(entry.target.is_none());
    }
}
