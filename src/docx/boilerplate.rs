//! Static parts: settings, font table and theme.

use quick_xml::escape::escape;

use super::styles::{BODY_FONT, HEADING_FONT, MONOSPACE_FONT};
use super::{W_NS, XML_DECLARATION};

/// Serialize `word/settings.xml`.
pub(crate) fn settings_xml(language: &str) -> String {
    format!(
        "{}\n<w:settings xmlns:w=\"{}\">\
         <w:zoom w:percent=\"100\"/>\
         <w:defaultTabStop w:val=\"720\"/>\
         <w:characterSpacingControl w:val=\"doNotCompress\"/>\
         <w:compat><w:compatSetting w:name=\"compatibilityMode\" \
         w:uri=\"http://schemas.microsoft.com/office/word\" w:val=\"15\"/></w:compat>\
         <w:themeFontLang w:val=\"{}\"/>\
         </w:settings>",
        XML_DECLARATION,
        W_NS,
        escape(language)
    )
}

/// Serialize `word/fontTable.xml`.
pub(crate) fn font_table_xml() -> String {
    const FONTS: [(&str, &str, &str); 3] = [
        (BODY_FONT, "swiss", "variable"),
        (HEADING_FONT, "roman", "variable"),
        (MONOSPACE_FONT, "modern", "fixed"),
    ];

    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECLARATION);
    xml.push_str(&format!("\n<w:fonts xmlns:w=\"{}\">", W_NS));
    for (name, family, pitch) in FONTS {
        xml.push_str(&format!(
            "<w:font w:name=\"{}\"><w:charset w:val=\"00\"/><w:family w:val=\"{}\"/><w:pitch w:val=\"{}\"/></w:font>",
            name, family, pitch
        ));
    }
    xml.push_str("</w:fonts>");
    xml
}

/// Serialize `word/theme/theme1.xml`.
pub(crate) fn theme_xml() -> String {
    // Scheme order after dk1/lt1
    const COLORS: [(&str, &str); 10] = [
        ("dk2", "44546A"),
        ("lt2", "E7E6E6"),
        ("accent1", "4472C4"),
        ("accent2", "ED7D31"),
        ("accent3", "A5A5A5"),
        ("accent4", "FFC000"),
        ("accent5", "5B9BD5"),
        ("accent6", "70AD47"),
        ("hlink", "0563C1"),
        ("folHlink", "954F72"),
    ];

    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECLARATION);
    xml.push_str(
        "\n<a:theme xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" name=\"Office Theme\">\
         <a:themeElements><a:clrScheme name=\"Office\">\
         <a:dk1><a:sysClr val=\"windowText\" lastClr=\"000000\"/></a:dk1>\
         <a:lt1><a:sysClr val=\"window\" lastClr=\"FFFFFF\"/></a:lt1>",
    );
    for (name, rgb) in COLORS {
        xml.push_str(&format!(
            "<a:{0}><a:srgbClr val=\"{1}\"/></a:{0}>",
            name, rgb
        ));
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(&format!(
        "<a:fontScheme name=\"Office\">\
         <a:majorFont><a:latin typeface=\"{}\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:majorFont>\
         <a:minorFont><a:latin typeface=\"{}\"/><a:ea typeface=\"\"/><a:cs typeface=\"\"/></a:minorFont>\
         </a:fontScheme>",
        HEADING_FONT, BODY_FONT
    ));

    let solid = "<a:solidFill><a:schemeClr val=\"phClr\"/></a:solidFill>";
    let line = format!(
        "<a:ln w=\"6350\" cap=\"flat\" cmpd=\"sng\" algn=\"ctr\">{}<a:prstDash val=\"solid\"/></a:ln>",
        solid
    );
    xml.push_str("<a:fmtScheme name=\"Office\"><a:fillStyleLst>");
    xml.push_str(&solid.repeat(3));
    xml.push_str("</a:fillStyleLst><a:lnStyleLst>");
    xml.push_str(&line.repeat(3));
    xml.push_str("</a:lnStyleLst><a:effectStyleLst>");
    xml.push_str(&"<a:effectStyle><a:effectLst/></a:effectStyle>".repeat(3));
    xml.push_str("</a:effectStyleLst><a:bgFillStyleLst>");
    xml.push_str(&solid.repeat(3));
    xml.push_str("</a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_language() {
        let xml = settings_xml("fr-FR");
        assert!(xml.contains("<w:themeFontLang w:val=\"fr-FR\"/>"));
        assert!(xml.contains("<w:defaultTabStop w:val=\"720\"/>"));
    }

    #[test]
    fn test_font_table_lists_catalog_fonts() {
        let xml = font_table_xml();
        for font in [BODY_FONT, HEADING_FONT, MONOSPACE_FONT] {
            assert!(xml.contains(&format!("w:name=\"{}\"", font)));
        }
    }

    #[test]
    fn test_theme_color_scheme_complete() {
        let xml = theme_xml();
        assert_eq!(xml.matches("<a:srgbClr ").count(), 10);
        assert_eq!(xml.matches("<a:sysClr ").count(), 2);
        assert!(xml.find("<a:dk2>").unwrap() < xml.find("<a:accent1>").unwrap());
        assert!(xml.ends_with("</a:theme>"));
    }
}
