//! DOCX package writer.

use docforge_core::package::{
    content_types_xml, core_properties_xml, rel_types, relationships_xml, PackageWriter,
    Relationship, XmlPart, CORE_PROPERTIES_CONTENT_TYPE,
};
use docforge_core::{ContentNode, DocumentTree, Error, HeadingLevel, Result, StructuralTree};
use std::io::{Cursor, Seek, Write};

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const STYLES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const NUMBERING_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";

/// Author recorded in the package properties.
const CREATOR: &str = "DocForge";

/// Numbering instance used for bullet items.
const BULLET_NUM_ID: &str = "1";

/// Paragraph style for bullet items.
const LIST_PARAGRAPH_STYLE: &str = "ListParagraph";

/// Heading styles: (style id, name, size in half-points, outline level).
const HEADING_STYLES: &[(&str, &str, &str, Option<&str>)] = &[
    ("Title", "Title", "56", None),
    ("Heading1", "heading 1", "32", Some("0")),
    ("Heading2", "heading 2", "28", Some("1")),
    ("Heading3", "heading 3", "26", Some("2")),
    ("Heading4", "heading 4", "24", Some("3")),
    ("Heading5", "heading 5", "22", Some("4")),
    ("Heading6", "heading 6", "22", Some("5")),
];

/// Renderer for document-mode trees.
pub struct DocxWriter;

impl DocxWriter {
    /// Create a new DOCX writer.
    pub fn new() -> Self {
        Self
    }

    /// Render a structural tree to package bytes.
    ///
    /// Deck trees are rejected; they belong to the PPTX renderer.
    pub fn render(&self, tree: &StructuralTree) -> Result<Vec<u8>> {
        match tree {
            StructuralTree::Document(doc) => self.to_bytes(doc),
            StructuralTree::Deck(_) => Err(Error::RenderError(
                "DOCX renderer needs a document tree, got a deck".to_string(),
            )),
        }
    }

    /// Render a document tree to package bytes.
    pub fn to_bytes(&self, doc: &DocumentTree) -> Result<Vec<u8>> {
        Ok(self.write(doc, Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write a document tree as a .docx package into `writer`.
    pub fn write<W: Write + Seek>(&self, doc: &DocumentTree, writer: W) -> Result<W> {
        let mut package = PackageWriter::new(writer);

        let content_types = content_types_xml(&[
            ("/word/document.xml".to_string(), DOCUMENT_CONTENT_TYPE),
            ("/word/styles.xml".to_string(), STYLES_CONTENT_TYPE),
            ("/word/numbering.xml".to_string(), NUMBERING_CONTENT_TYPE),
            ("/docProps/core.xml".to_string(), CORE_PROPERTIES_CONTENT_TYPE),
        ])?;
        package.add_part("[Content_Types].xml", &content_types)?;

        let root_rels = relationships_xml(&[
            Relationship::new("rId1", rel_types::OFFICE_DOCUMENT, "word/document.xml"),
            Relationship::new("rId2", rel_types::CORE_PROPERTIES, "docProps/core.xml"),
        ])?;
        package.add_part("_rels/.rels", &root_rels)?;
        package.add_part("docProps/core.xml", &core_properties_xml(&doc.title, CREATOR)?)?;

        let document_rels = relationships_xml(&[
            Relationship::new("rId1", rel_types::STYLES, "styles.xml"),
            Relationship::new("rId2", rel_types::NUMBERING, "numbering.xml"),
        ])?;
        package.add_part("word/_rels/document.xml.rels", &document_rels)?;
        package.add_part("word/document.xml", &document_xml(&doc.nodes)?)?;
        package.add_part("word/styles.xml", &styles_xml()?)?;
        package.add_part("word/numbering.xml", &numbering_xml()?)?;

        log::debug!("Wrote DOCX with {} paragraphs", doc.nodes.len());

        package.finish()
    }
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Style id for a heading level.
fn heading_style_id(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::Title => "Title",
        HeadingLevel::H1 => "Heading1",
        HeadingLevel::H2 => "Heading2",
        HeadingLevel::H3 => "Heading3",
        HeadingLevel::H4 => "Heading4",
        HeadingLevel::H5 => "Heading5",
        HeadingLevel::H6 => "Heading6",
    }
}

fn document_xml(nodes: &[ContentNode]) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.start("w:document", &[("xmlns:w", NS_W)])?;
    part.start("w:body", &[])?;

    for node in nodes {
        write_paragraph(&mut part, node)?;
    }

    // US Letter, one-inch margins
    part.start("w:sectPr", &[])?;
    part.empty("w:pgSz", &[("w:w", "12240"), ("w:h", "15840")])?;
    part.empty(
        "w:pgMar",
        &[
            ("w:top", "1440"),
            ("w:right", "1440"),
            ("w:bottom", "1440"),
            ("w:left", "1440"),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    part.end("w:sectPr")?;

    part.end("w:body")?;
    part.end("w:document")?;
    Ok(part.into_bytes())
}

fn write_paragraph(part: &mut XmlPart, node: &ContentNode) -> Result<()> {
    part.start("w:p", &[])?;

    match node {
        ContentNode::Heading { level, text } => {
            part.start("w:pPr", &[])?;
            part.empty("w:pStyle", &[("w:val", heading_style_id(*level))])?;
            part.end("w:pPr")?;
            write_run(part, text)?;
        }
        ContentNode::BulletItem { text } => {
            part.start("w:pPr", &[])?;
            part.empty("w:pStyle", &[("w:val", LIST_PARAGRAPH_STYLE)])?;
            part.start("w:numPr", &[])?;
            part.empty("w:ilvl", &[("w:val", "0")])?;
            part.empty("w:numId", &[("w:val", BULLET_NUM_ID)])?;
            part.end("w:numPr")?;
            part.end("w:pPr")?;
            write_run(part, text)?;
        }
        ContentNode::Paragraph { text } => write_run(part, text)?,
    }

    part.end("w:p")
}

/// One run of text; an empty string leaves the paragraph empty.
fn write_run(part: &mut XmlPart, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    part.start("w:r", &[])?;
    part.text_element("w:t", &[("xml:space", "preserve")], text)?;
    part.end("w:r")
}

fn styles_xml() -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.start("w:styles", &[("xmlns:w", NS_W)])?;

    part.start("w:docDefaults", &[])?;
    part.start("w:rPrDefault", &[])?;
    part.start("w:rPr", &[])?;
    part.empty(
        "w:rFonts",
        &[("w:ascii", "Calibri"), ("w:hAnsi", "Calibri"), ("w:cs", "Calibri")],
    )?;
    part.empty("w:sz", &[("w:val", "22")])?;
    part.end("w:rPr")?;
    part.end("w:rPrDefault")?;
    part.start("w:pPrDefault", &[])?;
    part.start("w:pPr", &[])?;
    part.empty("w:spacing", &[("w:after", "160"), ("w:line", "259"), ("w:lineRule", "auto")])?;
    part.end("w:pPr")?;
    part.end("w:pPrDefault")?;
    part.end("w:docDefaults")?;

    part.start(
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    part.empty("w:name", &[("w:val", "Normal")])?;
    part.empty("w:qFormat", &[])?;
    part.end("w:style")?;

    for &(id, name, size, outline) in HEADING_STYLES {
        part.start("w:style", &[("w:type", "paragraph"), ("w:styleId", id)])?;
        part.empty("w:name", &[("w:val", name)])?;
        part.empty("w:basedOn", &[("w:val", "Normal")])?;
        part.empty("w:next", &[("w:val", "Normal")])?;
        part.empty("w:qFormat", &[])?;
        part.start("w:pPr", &[])?;
        part.empty("w:keepNext", &[])?;
        part.empty("w:spacing", &[("w:before", "240"), ("w:after", "120")])?;
        if let Some(level) = outline {
            part.empty("w:outlineLvl", &[("w:val", level)])?;
        }
        part.end("w:pPr")?;
        part.start("w:rPr", &[])?;
        part.empty("w:b", &[])?;
        part.empty("w:sz", &[("w:val", size)])?;
        part.end("w:rPr")?;
        part.end("w:style")?;
    }

    part.start(
        "w:style",
        &[("w:type", "paragraph"), ("w:styleId", LIST_PARAGRAPH_STYLE)],
    )?;
    part.empty("w:name", &[("w:val", "List Paragraph")])?;
    part.empty("w:basedOn", &[("w:val", "Normal")])?;
    part.empty("w:qFormat", &[])?;
    part.start("w:pPr", &[])?;
    part.empty("w:ind", &[("w:left", "720")])?;
    part.empty("w:contextualSpacing", &[])?;
    part.end("w:pPr")?;
    part.end("w:style")?;

    part.end("w:styles")?;
    Ok(part.into_bytes())
}

fn numbering_xml() -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.start("w:numbering", &[("xmlns:w", NS_W)])?;

    part.start("w:abstractNum", &[("w:abstractNumId", "0")])?;
    part.empty("w:multiLevelType", &[("w:val", "hybridMultilevel")])?;
    part.start("w:lvl", &[("w:ilvl", "0")])?;
    part.empty("w:start", &[("w:val", "1")])?;
    part.empty("w:numFmt", &[("w:val", "bullet")])?;
    part.empty("w:lvlText", &[("w:val", "\u{2022}")])?;
    part.empty("w:lvlJc", &[("w:val", "left")])?;
    part.start("w:pPr", &[])?;
    part.empty("w:ind", &[("w:left", "720"), ("w:hanging", "360")])?;
    part.end("w:pPr")?;
    part.end("w:lvl")?;
    part.end("w:abstractNum")?;

    part.start("w:num", &[("w:numId", BULLET_NUM_ID)])?;
    part.empty("w:abstractNumId", &[("w:val", "0")])?;
    part.end("w:num")?;

    part.end("w:numbering")?;
    Ok(part.into_bytes())
}
