//! End-to-end conversion tests over small xml2rfc documents.

use xml2docx::model::{Block, NumberingScheme};
use xml2docx::render::{to_json, to_markdown, JsonFormat};
use xml2docx::{
    convert_bytes, Converter, ConvertOptions, DiagnosticKind, Document, ErrorKind, Run,
};

const V3_DRAFT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rfc version="3" docName="draft-example-tea-01" category="std" ipr="trust200902">
  <front>
    <title abbrev="Tea">The Tea Transfer Protocol</title>
    <author fullname="A. Writer" initials="A." surname="Writer">
      <organization>Example Org</organization>
      <address><email>a@example.org</email></address>
    </author>
    <date day="1" month="April" year="2024"/>
    <keyword>tea</keyword>
    <abstract><t>This document specifies how to move tea.</t></abstract>
  </front>
  <middle>
    <section anchor="intro">
      <name>Introduction</name>
      <t>Procedures are in <xref target="proc"/>. Terms follow <xref target="RFC2119"/>.</t>
      <section anchor="terms">
        <name>Terminology</name>
        <t>A <strong>kettle</strong> heats water; a <em>cup</em> holds it.</t>
        <section anchor="deep">
          <name>Deep</name>
          <t>Nested.</t>
        </section>
      </section>
      <section anchor="scope">
        <name>Scope</name>
        <t>Only tea.</t>
      </section>
    </section>
    <section anchor="proc">
      <name>Procedures</name>
      <ol>
        <li>Boil water.</li>
        <li>Steep leaves.</li>
      </ol>
      <figure anchor="fig-pot">
        <name>The pot</name>
        <artwork>
   +-----+
   | pot |
   +-----+
        </artwork>
      </figure>
      <t>See <xref target="fig-pot"/> and <xref target="nowhere"/>.</t>
    </section>
  </middle>
  <back>
    <references>
      <name>Normative References</name>
      <reference anchor="RFC2119" target="https://www.rfc-editor.org/info/rfc2119">
        <front>
          <title>Key words for use in RFCs to Indicate Requirement Levels</title>
          <author initials="S." surname="Bradner" fullname="S. Bradner"/>
          <date year="1997" month="March"/>
        </front>
      </reference>
    </references>
  </back>
</rfc>"#;

fn headings(doc: &Document) -> Vec<(String, String)> {
    doc.headings()
        .filter(|h| h.scheme == NumberingScheme::Section)
        .map(|h| (h.number.clone().unwrap_or_default(), h.title_text()))
        .collect()
}

fn xref_labels(doc: &Document) -> Vec<(String, String)> {
    let mut labels = Vec::new();
    for block in &doc.blocks {
        if let Block::Paragraph(p) = block {
            for run in &p.runs {
                if let Run::Xref(x) = run {
                    labels.push((x.target.clone(), x.label.clone().unwrap_or_default()));
                }
            }
        }
    }
    labels
}

#[test]
fn test_minimal_document_converts() {
    let xml = br#"<rfc><front><title>Minimal</title><author fullname="A"/></front><middle/><back/></rfc>"#;
    let conversion = convert_bytes(xml).unwrap();
    assert!(conversion.diagnostics.is_empty());
    assert!(!conversion.to_bytes().unwrap().is_empty());
}

#[test]
fn test_missing_title_is_schema_error() {
    let xml = br#"<rfc><front><author fullname="A"/></front><middle/></rfc>"#;
    let err = convert_bytes(xml).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert_eq!(err.element(), Some("title"));
}

#[test]
fn test_malformed_xml_is_schema_error() {
    let err = convert_bytes(b"<rfc><front><title>x</front></rfc>").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn test_section_numbering() {
    let conversion = convert_bytes(V3_DRAFT.as_bytes()).unwrap();
    let numbers: Vec<String> = headings(&conversion.document)
        .into_iter()
        .map(|(n, _)| n)
        .collect();
    assert_eq!(numbers, vec!["1", "1.1", "1.1.1", "1.2", "2"]);
}

#[test]
fn test_cross_references() {
    let conversion = convert_bytes(V3_DRAFT.as_bytes()).unwrap();
    let labels = xref_labels(&conversion.document);
    assert!(labels.contains(&("proc".to_string(), "Section 2".to_string())));
    assert!(labels.contains(&("RFC2119".to_string(), "[RFC2119]".to_string())));
    assert!(labels.contains(&("fig-pot".to_string(), "Figure 1".to_string())));
    assert!(labels.contains(&("nowhere".to_string(), "[?nowhere]".to_string())));
}

#[test]
fn test_unresolved_reference_single_diagnostic() {
    let conversion = convert_bytes(V3_DRAFT.as_bytes()).unwrap();
    let unresolved: Vec<_> = conversion
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::UnresolvedReference)
        .collect();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].subject, "nowhere");
}

#[test]
fn test_v2_document() {
    let xml = br#"<rfc docName="draft-v2-00">
  <front><title>Old Style</title><author fullname="B. Author"/></front>
  <middle>
    <section title="One" anchor="one">
      <t>First <spanx style="strong">bold</spanx>.</t>
      <t><list style="symbols"><t>alpha</t><t>beta</t></list></t>
    </section>
    <section title="Two"><t>See <xref target="one"/>.</t></section>
  </middle>
</rfc>"#;
    let conversion = convert_bytes(xml).unwrap();
    let doc = &conversion.document;
    assert_eq!(doc.vocabulary, xml2docx::Vocabulary::V2);
    assert_eq!(
        headings(doc),
        vec![("1".to_string(), "One".to_string()), ("2".to_string(), "Two".to_string())]
    );
    assert!(doc.uses_numbering());
    assert!(xref_labels(doc).contains(&("one".to_string(), "Section 1".to_string())));
}

#[test]
fn test_document_xml_is_idempotent() {
    let converter = Converter::new(ConvertOptions::default());
    let first = converter.convert(V3_DRAFT.as_bytes()).unwrap();
    let second = converter.convert(V3_DRAFT.as_bytes()).unwrap();
    assert_eq!(
        first.package.part("word/document.xml").unwrap().data,
        second.package.part("word/document.xml").unwrap().data
    );
}

#[test]
fn test_bold_and_italic_spans() {
    let conversion = convert_bytes(V3_DRAFT.as_bytes()).unwrap();
    let xml = conversion.package.part("word/document.xml").unwrap().text().into_owned();
    assert!(xml.contains(
        "<w:r><w:rPr><w:b/><w:bCs/></w:rPr><w:t xml:space=\"preserve\">kettle</w:t></w:r>"
    ));
    assert!(xml.contains(
        "<w:r><w:rPr><w:i/><w:iCs/></w:rPr><w:t xml:space=\"preserve\">cup</w:t></w:r>"
    ));
    assert!(xml.contains("<w:r><w:t xml:space=\"preserve\"> heats water; a </w:t></w:r>"));
}

#[test]
fn test_title_page_and_headings_in_body() {
    let conversion = convert_bytes(V3_DRAFT.as_bytes()).unwrap();
    let xml = conversion.package.part("word/document.xml").unwrap().text().into_owned();
    assert!(xml.contains("<w:pStyle w:val=\"Title\"/>"));
    assert!(xml.contains(">The Tea Transfer Protocol</w:t>"));
    assert!(xml.contains(">1.1.1.  </w:t>"));
    assert!(xml.contains("<w:pStyle w:val=\"Abstract\"/>"));
}

#[test]
fn test_markdown_and_json_side_outputs() {
    let converter = Converter::default();
    let built = converter.build(V3_DRAFT.as_bytes()).unwrap();

    let md = to_markdown(&built.document, converter.options()).unwrap();
    assert!(md.contains("docname: draft-example-tea-01\n"));
    assert!(md.contains("normative:\n  RFC2119:\n"));
    assert!(md.contains("--- abstract\n\nThis document specifies how to move tea."));
    assert!(md.contains("# Introduction {#intro}"));
    assert!(md.contains("### Deep {#deep}"));
    assert!(md.contains("Procedures are in {{proc}}."));
    assert!(md.contains("1. Boil water.\n\n2. Steep leaves."));

    let json = to_json(&built.document, JsonFormat::Pretty).unwrap();
    let back = xml2docx::render::from_json(&json).unwrap();
    assert_eq!(back, built.document);
}

fn wrap_middle(middle: &str) -> String {
    format!(
        "<rfc><front><title>T</title><author fullname=\"A\"/></front><middle>{}</middle><back/></rfc>",
        middle
    )
}

#[test]
fn test_deeply_nested_sections() {
    let depth = 300;
    let mut middle = String::new();
    for i in 0..depth {
        middle.push_str(&format!("<section anchor=\"s{}\"><name>Level {}</name>", i, i + 1));
    }
    middle.push_str("<t>Bottom.</t>");
    middle.push_str(&"</section>".repeat(depth));

    let conversion = convert_bytes(wrap_middle(&middle).as_bytes()).unwrap();
    let headings: Vec<_> = conversion.document.headings().collect();
    assert_eq!(headings.len(), depth);
    for (i, heading) in headings.iter().enumerate() {
        assert_eq!(heading.level as usize, i + 1);
    }

    let deepest = headings[depth - 1];
    assert_eq!(deepest.style_level(), 6);
    let number = deepest.number.clone().unwrap();
    assert_eq!(number.split('.').count(), depth);
    assert!(number.split('.').all(|part| part == "1"));
}

#[test]
fn test_excessive_nesting_is_schema_error() {
    let depth = 200_000;
    let middle = format!(
        "<section><name>S</name>{}deep{}</section>",
        "<aside>".repeat(depth),
        "</aside>".repeat(depth)
    );
    let err = convert_bytes(wrap_middle(&middle).as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert_eq!(err.element(), Some("aside"));
}

#[test]
fn test_invalid_utf8_is_schema_error() {
    let mut xml = b"<rfc><front><title>Bad ".to_vec();
    xml.extend_from_slice(&[0xFF, 0xFE, 0x80]);
    xml.extend_from_slice(
        b"</title><author fullname=\"A\"/></front><middle/><back/></rfc>",
    );
    let err = convert_bytes(&xml).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(err.to_string().contains("invalid UTF-8"));
}

#[test]
fn test_huge_column_span_is_clamped() {
    let middle = "<section><name>S</name><table><tbody>\
                  <tr><td colspan=\"200000\">wide</td></tr>\
                  <tr><td rowspan=\"4294967295\">tall</td><td>x</td></tr>\
                  </tbody></table></section>";
    let conversion = convert_bytes(wrap_middle(middle).as_bytes()).unwrap();
    let xml = conversion.package.part("word/document.xml").unwrap().text().into_owned();
    assert_eq!(
        xml.matches("<w:gridCol ").count(),
        xml2docx::model::MAX_SPAN as usize
    );
    assert!(xml.contains(&format!("<w:gridSpan w:val=\"{}\"/>", xml2docx::model::MAX_SPAN)));
}
