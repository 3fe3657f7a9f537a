//! Input detection: text encoding and xml2rfc vocabulary version.

use crate::error::{Error, Result};
use crate::xml2rfc::vocab::RfcAttrs;
use crate::xml2rfc::{DocumentNode, LineIndex, Location, Tag};
use serde::{Deserialize, Serialize};

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Elements that only exist in the v3 vocabulary (RFC 7991).
const V3_ONLY: &[Tag] = &[
    Tag::Ul,
    Tag::Ol,
    Tag::Dl,
    Tag::Table,
    Tag::Sourcecode,
    Tag::Name,
    Tag::Strong,
    Tag::Em,
    Tag::Blockquote,
    Tag::Aside,
];

/// xml2rfc vocabulary revision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vocabulary {
    /// RFC 7749 / rfc2629.dtd
    #[default]
    V2,
    /// RFC 7991
    V3,
}

impl Vocabulary {
    /// Short human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Vocabulary::V2 => "xml2rfc v2",
            Vocabulary::V3 => "xml2rfc v3",
        }
    }
}

impl std::fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the vocabulary revision of a parsed tree.
///
/// The `version` attribute on `rfc` wins; otherwise the presence of any
/// v3-only element marks the document as v3.
pub fn detect_vocabulary(root: &DocumentNode) -> Vocabulary {
    if let Some(version) = RfcAttrs::read(root).version {
        return if version == "3" {
            Vocabulary::V3
        } else {
            Vocabulary::V2
        };
    }

    if root.descendants().any(|node| V3_ONLY.contains(&node.tag)) {
        Vocabulary::V3
    } else {
        Vocabulary::V2
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

/// Decode raw input bytes into a string.
///
/// Handles UTF-8 (with or without BOM) and UTF-16 LE/BE with BOM. A ZIP
/// container (for example a `.docx` passed by mistake) is rejected.
pub fn decode_input(bytes: &[u8]) -> Result<String> {
    if is_zip_file(bytes) {
        return Err(Error::schema(
            "rfc",
            Location::default(),
            "input is a ZIP container, not xml2rfc XML",
        ));
    }

    // UTF-8 BOM: EF BB BF
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return decode_utf8(rest);
    }

    // UTF-16 LE BOM: FF FE
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let content = decode_utf16(rest, u16::from_le_bytes)?;
        return Ok(fix_encoding_declaration(&content));
    }

    // UTF-16 BE BOM: FE FF
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let content = decode_utf16(rest, u16::from_be_bytes)?;
        return Ok(fix_encoding_declaration(&content));
    }

    decode_utf8(bytes)
}

/// Strict UTF-8; the error points at the first invalid byte.
fn decode_utf8(bytes: &[u8]) -> Result<String> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(e) => {
            let valid = &bytes[..e.valid_up_to()];
            // The prefix was just validated
            let prefix = std::str::from_utf8(valid).unwrap_or_default();
            let location = LineIndex::new(prefix).locate(prefix.len());
            Err(Error::schema(
                "rfc",
                location,
                format!("invalid UTF-8 at byte {}", e.valid_up_to()),
            ))
        }
    }
}

fn decode_utf16(bytes: &[u8], combine: fn([u8; 2]) -> u16) -> Result<String> {
    let len = bytes.len() & !1;
    let units = (0..len).step_by(2).map(|i| combine([bytes[i], bytes[i + 1]]));

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| {
            Error::schema(
                "rfc",
                Location::default(),
                format!("invalid UTF-16 input: {}", e),
            )
        })
}

/// After transcoding to UTF-8 the declaration must stop claiming UTF-16.
fn fix_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];
            let fixed = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");
            return format!("{}{}", fixed, rest);
        }
    }
    content.to_string()
}
