//! OOXML package writing shared by the DOCX and PPTX renderers.
//!
//! A package is a ZIP archive of XML parts tied together by
//! `[Content_Types].xml` and `.rels` relationship parts.

use crate::error::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::{Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Relationship type URIs.
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const NUMBERING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
}

/// Content type of the core properties part.
pub const CORE_PROPERTIES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-package.core-properties+xml";

const RELATIONSHIPS_CONTENT_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";

const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Writes parts into a deflated ZIP archive.
pub struct PackageWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: FileOptions,
}

impl<W: Write + Seek> PackageWriter<W> {
    /// Start a package on top of a seekable writer.
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            options: FileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Add one part at `path` (no leading slash).
    pub fn add_part(&mut self, path: &str, content: &[u8]) -> Result<()> {
        self.zip
            .start_file(path, self.options)
            .map_err(|e| Error::ZipError(format!("Failed to start part '{}': {}", path, e)))?;
        self.zip
            .write_all(content)
            .map_err(|e| Error::ZipError(format!("Failed to write part '{}': {}", path, e)))?;

        log::trace!("Wrote part {} ({} bytes)", path, content.len());
        Ok(())
    }

    /// Write the central directory and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))
    }
}

/// Builds one XML part with a standalone UTF-8 declaration.
pub struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    /// Start a part, writing the XML declaration.
    pub fn new() -> Result<Self> {
        let mut part = Self {
            writer: Writer::new(Vec::new()),
        };
        part.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(part)
    }

    /// Open an element.
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.write(Event::Start(element(name, attrs)))
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.write(Event::Empty(element(name, attrs)))
    }

    /// Close an element.
    pub fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Write escaped text. Characters XML 1.0 cannot carry are dropped.
    pub fn text(&mut self, text: &str) -> Result<()> {
        let clean = sanitize_xml_text(text);
        self.write(Event::Text(BytesText::new(&clean)))
    }

    /// `<name attrs>text</name>`.
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    /// The serialized part.
    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner()
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::XmlError(e.to_string()))
    }
}

fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut elem = BytesStart::new(name);
    for &attr in attrs {
        elem.push_attribute(attr);
    }
    elem
}

/// Drop characters that are not allowed in XML 1.0 documents.
pub fn sanitize_xml_text(text: &str) -> Cow<'_, str> {
    fn allowed(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
    }

    if text.chars().all(allowed) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| allowed(c)).collect())
    }
}

/// One entry of a relationships part.
#[derive(Debug, Clone)]
pub struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    pub target: String,
}

impl Relationship {
    /// Create a relationship.
    pub fn new(id: impl Into<String>, rel_type: &'static str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type,
            target: target.into(),
        }
    }
}

/// Serialize a `.rels` part.
pub fn relationships_xml(rels: &[Relationship]) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.start("Relationships", &[("xmlns", NS_RELATIONSHIPS)])?;
    for rel in rels {
        part.empty(
            "Relationship",
            &[
                ("Id", rel.id.as_str()),
                ("Type", rel.rel_type),
                ("Target", rel.target.as_str()),
            ],
        )?;
    }
    part.end("Relationships")?;
    Ok(part.into_bytes())
}

/// Serialize `[Content_Types].xml`; `overrides` are (part name, content type).
pub fn content_types_xml(overrides: &[(String, &str)]) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    part.empty(
        "Default",
        &[("Extension", "rels"), ("ContentType", RELATIONSHIPS_CONTENT_TYPE)],
    )?;
    part.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    for (name, content_type) in overrides {
        part.empty(
            "Override",
            &[("PartName", name.as_str()), ("ContentType", *content_type)],
        )?;
    }
    part.end("Types")?;
    Ok(part.into_bytes())
}

/// Serialize `docProps/core.xml` with a title and creator.
pub fn core_properties_xml(title: &str, creator: &str) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    part.text_element("dc:title", &[], title)?;
    part.text_element("dc:creator", &[], creator)?;
    part.end("cp:coreProperties")?;
    Ok(part.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    #[test]
    fn test_xml_part_escapes_text() {
        let mut part = XmlPart::new().unwrap();
        part.text_element("t", &[("k", "a\"b")], "x < y & z").unwrap();
        let xml = String::from_utf8(part.into_bytes()).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(xml.contains("<t k=\"a&quot;b\">x &lt; y &amp; z</t>"));
    }

    #[test]
    fn test_sanitize_drops_control_characters() {
        assert_eq!(sanitize_xml_text("a\u{1}b\u{b}c"), "abc");
        assert_eq!(sanitize_xml_text("tab\tok"), "tab\tok");
        assert!(matches!(sanitize_xml_text("clean"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_relationships_xml() {
        let xml = relationships_xml(&[Relationship::new(
            "rId1",
            rel_types::STYLES,
            "styles.xml",
        )])
        .unwrap();
        let xml = String::from_utf8(xml).unwrap();

        assert!(xml.contains(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#));
    }

    #[test]
    fn test_package_round_trip() {
        let mut package = PackageWriter::new(Cursor::new(Vec::new()));
        let types = content_types_xml(&[(
            "/docProps/core.xml".to_string(),
            CORE_PROPERTIES_CONTENT_TYPE,
        )])
        .unwrap();
        package.add_part("[Content_Types].xml", &types).unwrap();
        package
            .add_part("docProps/core.xml", &core_properties_xml("T & C", "DocForge").unwrap())
            .unwrap();
        let bytes = package.finish().unwrap().into_inner();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut core = String::new();
        archive
            .by_name("docProps/core.xml")
            .unwrap()
            .read_to_string(&mut core)
            .unwrap();
        assert!(core.contains("<dc:title>T &amp; C</dc:title>"));
        assert!(core.contains("<dc:creator>DocForge</dc:creator>"));
    }
}
