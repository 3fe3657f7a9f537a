//! Document property parts: `docProps/core.xml` and `docProps/app.xml`.

use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

use crate::model::{Document, Metadata};
use crate::options::ConvertOptions;

use super::XML_DECLARATION;

const W3CDTF: &str = "%Y-%m-%dT%H:%M:%SZ";

fn element(xml: &mut String, name: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    xml.push_str(&format!("<{0}>{1}</{0}>", name, escape(value)));
}

/// `dcterms:created` value: the document date when known, else `modified`.
fn created(metadata: &Metadata, modified: DateTime<Utc>) -> String {
    metadata
        .date
        .as_ref()
        .and_then(|d| d.iso())
        .map(|day| format!("{}T00:00:00Z", day))
        .unwrap_or_else(|| modified.format(W3CDTF).to_string())
}

/// Serialize `docProps/core.xml`.
pub(crate) fn core_xml(metadata: &Metadata, options: &ConvertOptions) -> String {
    let modified = options.modified_time();

    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECLARATION);
    xml.push_str(
        "\n<cp:coreProperties \
         xmlns:cp=\"http://schemas.openxmlformats.org/package/2006/metadata/core-properties\" \
         xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
         xmlns:dcterms=\"http://purl.org/dc/terms/\" \
         xmlns:dcmitype=\"http://purl.org/dc/dcmitype/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
    );
    element(&mut xml, "dc:title", &metadata.title);
    element(
        &mut xml,
        "dc:subject",
        metadata
            .doc_name
            .as_deref()
            .or(metadata.number.as_deref())
            .unwrap_or_default(),
    );
    element(&mut xml, "dc:creator", &metadata.creators());
    element(&mut xml, "cp:keywords", &metadata.keywords.join(", "));
    element(
        &mut xml,
        "cp:category",
        metadata.category.as_deref().unwrap_or_default(),
    );
    element(&mut xml, "dc:language", &options.language);
    element(&mut xml, "cp:lastModifiedBy", &options.application);
    xml.push_str(&format!(
        "<dcterms:created xsi:type=\"dcterms:W3CDTF\">{}</dcterms:created>",
        created(metadata, modified)
    ));
    xml.push_str(&format!(
        "<dcterms:modified xsi:type=\"dcterms:W3CDTF\">{}</dcterms:modified>",
        modified.format(W3CDTF)
    ));
    xml.push_str("</cp:coreProperties>");
    xml
}

/// Serialize `docProps/app.xml`.
pub(crate) fn app_xml(document: &Document, options: &ConvertOptions) -> String {
    let stats = document.statistics();
    let words = document.plain_text().split_whitespace().count();
    let paragraphs = stats.headings + stats.paragraphs + stats.list_items + stats.references;

    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECLARATION);
    xml.push_str(
        "\n<Properties \
         xmlns=\"http://schemas.openxmlformats.org/officeDocument/2006/extended-properties\" \
         xmlns:vt=\"http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes\">",
    );
    element(&mut xml, "Application", &options.application);
    xml.push_str("<DocSecurity>0</DocSecurity>");
    xml.push_str(&format!("<Words>{}</Words>", words));
    xml.push_str(&format!("<Paragraphs>{}</Paragraphs>", paragraphs));
    element(
        &mut xml,
        "Company",
        document
            .metadata
            .organizations
            .first()
            .map(String::as_str)
            .unwrap_or_default(),
    );
    xml.push_str("</Properties>");
    xml
}
