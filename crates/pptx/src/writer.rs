//! PPTX package writer.

use crate::theme::THEME_XML;
use docforge_core::package::{
    content_types_xml, core_properties_xml, rel_types, relationships_xml, PackageWriter,
    Relationship, XmlPart, CORE_PROPERTIES_CONTENT_TYPE,
};
use docforge_core::{DeckTree, Error, Result, Slide, SlideKind, StructuralTree};
use std::io::{Cursor, Seek, Write};

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const PRESENTATION_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const SLIDE_MASTER_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const SLIDE_LAYOUT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const SLIDE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const THEME_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

/// Author recorded in the package properties.
const AUTHOR: &str = "DocForge";

/// 16:9 slide, 10in x 5.625in, in EMU.
const SLIDE_WIDTH: i64 = 9_144_000;
const SLIDE_HEIGHT: i64 = 5_143_500;
const EMU_PER_INCH: i64 = 914_400;

/// Font sizes in hundredths of a point.
const TITLE_FONT_SIZE: &str = "2800";
const COVER_TITLE_FONT_SIZE: &str = "3600";
const BODY_FONT_SIZE: &str = "1800";

/// First slide id; PresentationML reserves ids below 256.
const FIRST_SLIDE_ID: usize = 256;

/// Relationship ids 1 and 2 of the presentation go to the master and theme.
const FIRST_SLIDE_REL: usize = 3;

/// Position and size of a shape, in EMU.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
}

/// Title box: half an inch in, 0.3in down, full content width.
const TITLE_FRAME: Frame = Frame {
    x: EMU_PER_INCH / 2,
    y: EMU_PER_INCH * 3 / 10,
    cx: SLIDE_WIDTH * 9 / 10,
    cy: EMU_PER_INCH * 3 / 4,
};

/// Cover title box: one inch down, same width as the section title.
const COVER_TITLE_FRAME: Frame = Frame {
    x: EMU_PER_INCH / 2,
    y: EMU_PER_INCH,
    cx: SLIDE_WIDTH * 9 / 10,
    cy: EMU_PER_INCH,
};

/// Shape names; the reader uses them to tell cover slides apart.
const TITLE_SHAPE: &str = "Title";
pub(crate) const COVER_TITLE_SHAPE: &str = "Cover Title";
const BODY_SHAPE: &str = "Body";

/// Body box: one inch down, 90% wide and 70% tall.
const BODY_FRAME: Frame = Frame {
    x: EMU_PER_INCH / 2,
    y: EMU_PER_INCH,
    cx: SLIDE_WIDTH * 9 / 10,
    cy: SLIDE_HEIGHT * 7 / 10,
};

/// Renderer for deck-mode trees.
pub struct PptxWriter;

impl PptxWriter {
    /// Create a new PPTX writer.
    pub fn new() -> Self {
        Self
    }

    /// Render a structural tree to package bytes.
    ///
    /// Document trees are rejected; they belong to the DOCX renderer.
    pub fn render(&self, tree: &StructuralTree) -> Result<Vec<u8>> {
        match tree {
            StructuralTree::Deck(deck) => self.to_bytes(deck),
            StructuralTree::Document(_) => Err(Error::RenderError(
                "PPTX renderer needs a deck tree, got a document".to_string(),
            )),
        }
    }

    /// Render a deck tree to package bytes.
    pub fn to_bytes(&self, deck: &DeckTree) -> Result<Vec<u8>> {
        Ok(self.write(deck, Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write a deck tree as a .pptx package into `writer`.
    pub fn write<W: Write + Seek>(&self, deck: &DeckTree, writer: W) -> Result<W> {
        let mut package = PackageWriter::new(writer);
        let slide_count = deck.slides.len();

        let mut overrides = vec![
            ("/ppt/presentation.xml".to_string(), PRESENTATION_CONTENT_TYPE),
            ("/ppt/slideMasters/slideMaster1.xml".to_string(), SLIDE_MASTER_CONTENT_TYPE),
            ("/ppt/slideLayouts/slideLayout1.xml".to_string(), SLIDE_LAYOUT_CONTENT_TYPE),
            ("/ppt/theme/theme1.xml".to_string(), THEME_CONTENT_TYPE),
            ("/docProps/core.xml".to_string(), CORE_PROPERTIES_CONTENT_TYPE),
        ];
        for n in 1..=slide_count {
            overrides.push((format!("/ppt/slides/slide{}.xml", n), SLIDE_CONTENT_TYPE));
        }
        package.add_part("[Content_Types].xml", &content_types_xml(&overrides)?)?;

        let root_rels = relationships_xml(&[
            Relationship::new("rId1", rel_types::OFFICE_DOCUMENT, "ppt/presentation.xml"),
            Relationship::new("rId2", rel_types::CORE_PROPERTIES, "docProps/core.xml"),
        ])?;
        package.add_part("_rels/.rels", &root_rels)?;
        package.add_part("docProps/core.xml", &core_properties_xml(&deck.title, AUTHOR)?)?;

        let mut presentation_rels = vec![
            Relationship::new("rId1", rel_types::SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
            Relationship::new("rId2", rel_types::THEME, "theme/theme1.xml"),
        ];
        for n in 1..=slide_count {
            presentation_rels.push(Relationship::new(
                slide_rel_id(n - 1),
                rel_types::SLIDE,
                format!("slides/slide{}.xml", n),
            ));
        }
        package.add_part("ppt/presentation.xml", &presentation_xml(slide_count)?)?;
        package.add_part(
            "ppt/_rels/presentation.xml.rels",
            &relationships_xml(&presentation_rels)?,
        )?;

        package.add_part("ppt/slideMasters/slideMaster1.xml", &slide_master_xml()?)?;
        package.add_part(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &relationships_xml(&[
                Relationship::new("rId1", rel_types::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
                Relationship::new("rId2", rel_types::THEME, "../theme/theme1.xml"),
            ])?,
        )?;
        package.add_part("ppt/slideLayouts/slideLayout1.xml", &slide_layout_xml()?)?;
        package.add_part(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &relationships_xml(&[Relationship::new(
                "rId1",
                rel_types::SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml",
            )])?,
        )?;
        package.add_part("ppt/theme/theme1.xml", THEME_XML.as_bytes())?;

        let slide_rels = relationships_xml(&[Relationship::new(
            "rId1",
            rel_types::SLIDE_LAYOUT,
            "../slideLayouts/slideLayout1.xml",
        )])?;
        for (idx, slide) in deck.slides.iter().enumerate() {
            let n = idx + 1;
            package.add_part(&format!("ppt/slides/slide{}.xml", n), &slide_xml(slide)?)?;
            package.add_part(&format!("ppt/slides/_rels/slide{}.xml.rels", n), &slide_rels)?;
        }

        log::debug!("Wrote PPTX with {} slides", slide_count);

        package.finish()
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn slide_rel_id(index: usize) -> String {
    format!("rId{}", index + FIRST_SLIDE_REL)
}

fn presentation_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.start(
        "p:presentation",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;

    part.start("p:sldMasterIdLst", &[])?;
    part.empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?;
    part.end("p:sldMasterIdLst")?;

    if slide_count > 0 {
        part.start("p:sldIdLst", &[])?;
        for idx in 0..slide_count {
            let id = (FIRST_SLIDE_ID + idx).to_string();
            let rel = slide_rel_id(idx);
            part.empty("p:sldId", &[("id", id.as_str()), ("r:id", rel.as_str())])?;
        }
        part.end("p:sldIdLst")?;
    }

    let cx = SLIDE_WIDTH.to_string();
    let cy = SLIDE_HEIGHT.to_string();
    part.empty("p:sldSz", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    part.empty("p:notesSz", &[("cx", "6858000"), ("cy", "9144000")])?;

    part.end("p:presentation")?;
    Ok(part.into_bytes())
}

fn slide_master_xml() -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.start(
        "p:sldMaster",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    part.start("p:cSld", &[])?;
    write_empty_shape_tree(&mut part)?;
    part.end("p:cSld")?;
    part.empty(
        "p:clrMap",
        &[
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ],
    )?;
    part.start("p:sldLayoutIdLst", &[])?;
    part.empty("p:sldLayoutId", &[("id", "2147483649"), ("r:id", "rId1")])?;
    part.end("p:sldLayoutIdLst")?;
    part.end("p:sldMaster")?;
    Ok(part.into_bytes())
}

fn slide_layout_xml() -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.start(
        "p:sldLayout",
        &[
            ("xmlns:a", NS_A),
            ("xmlns:r", NS_R),
            ("xmlns:p", NS_P),
            ("type", "blank"),
            ("preserve", "1"),
        ],
    )?;
    part.start("p:cSld", &[("name", "Blank")])?;
    write_empty_shape_tree(&mut part)?;
    part.end("p:cSld")?;
    write_master_color_mapping(&mut part)?;
    part.end("p:sldLayout")?;
    Ok(part.into_bytes())
}

fn slide_xml(slide: &Slide) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.start(
        "p:sld",
        &[("xmlns:a", NS_A), ("xmlns:r", NS_R), ("xmlns:p", NS_P)],
    )?;
    part.start("p:cSld", &[])?;
    part.start("p:spTree", &[])?;
    write_group_properties(&mut part)?;

    let (name, frame, size) = match slide.kind {
        SlideKind::Title => (COVER_TITLE_SHAPE, COVER_TITLE_FRAME, COVER_TITLE_FONT_SIZE),
        SlideKind::Content => (TITLE_SHAPE, TITLE_FRAME, TITLE_FONT_SIZE),
    };
    write_shape_start(&mut part, "2", name, frame)?;
    write_text_paragraph(&mut part, &slide.title, size, true)?;
    write_shape_end(&mut part)?;

    if !slide.bullets.is_empty() {
        write_shape_start(&mut part, "3", BODY_SHAPE, BODY_FRAME)?;
        for bullet in &slide.bullets {
            write_bullet_paragraph(&mut part, bullet)?;
        }
        write_shape_end(&mut part)?;
    }

    part.end("p:spTree")?;
    part.end("p:cSld")?;
    write_master_color_mapping(&mut part)?;
    part.end("p:sld")?;
    Ok(part.into_bytes())
}

fn write_empty_shape_tree(part: &mut XmlPart) -> Result<()> {
    part.start("p:spTree", &[])?;
    write_group_properties(part)?;
    part.end("p:spTree")
}

fn write_group_properties(part: &mut XmlPart) -> Result<()> {
    part.start("p:nvGrpSpPr", &[])?;
    part.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    part.empty("p:cNvGrpSpPr", &[])?;
    part.empty("p:nvPr", &[])?;
    part.end("p:nvGrpSpPr")?;

    part.start("p:grpSpPr", &[])?;
    part.start("a:xfrm", &[])?;
    part.empty("a:off", &[("x", "0"), ("y", "0")])?;
    part.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    part.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    part.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    part.end("a:xfrm")?;
    part.end("p:grpSpPr")
}

fn write_master_color_mapping(part: &mut XmlPart) -> Result<()> {
    part.start("p:clrMapOvr", &[])?;
    part.empty("a:masterClrMapping", &[])?;
    part.end("p:clrMapOvr")
}

/// Open a text box shape up to the start of its paragraphs.
fn write_shape_start(part: &mut XmlPart, id: &str, name: &str, frame: Frame) -> Result<()> {
    part.start("p:sp", &[])?;

    part.start("p:nvSpPr", &[])?;
    part.empty("p:cNvPr", &[("id", id), ("name", name)])?;
    part.empty("p:cNvSpPr", &[("txBox", "1")])?;
    part.empty("p:nvPr", &[])?;
    part.end("p:nvSpPr")?;

    let (x, y) = (frame.x.to_string(), frame.y.to_string());
    let (cx, cy) = (frame.cx.to_string(), frame.cy.to_string());
    part.start("p:spPr", &[])?;
    part.start("a:xfrm", &[])?;
    part.empty("a:off", &[("x", x.as_str()), ("y", y.as_str())])?;
    part.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    part.end("a:xfrm")?;
    part.start("a:prstGeom", &[("prst", "rect")])?;
    part.empty("a:avLst", &[])?;
    part.end("a:prstGeom")?;
    part.end("p:spPr")?;

    part.start("p:txBody", &[])?;
    part.empty("a:bodyPr", &[("wrap", "square"), ("rtlCol", "0")])?;
    part.empty("a:lstStyle", &[])
}

fn write_shape_end(part: &mut XmlPart) -> Result<()> {
    part.end("p:txBody")?;
    part.end("p:sp")
}

fn write_text_paragraph(part: &mut XmlPart, text: &str, size: &str, bold: bool) -> Result<()> {
    part.start("a:p", &[])?;
    write_run(part, text, size, bold)?;
    part.end("a:p")
}

fn write_bullet_paragraph(part: &mut XmlPart, text: &str) -> Result<()> {
    part.start("a:p", &[])?;
    part.start("a:pPr", &[("marL", "342900"), ("indent", "-342900")])?;
    part.empty("a:buFont", &[("typeface", "Arial")])?;
    part.empty("a:buChar", &[("char", "\u{2022}")])?;
    part.end("a:pPr")?;
    write_run(part, text, BODY_FONT_SIZE, false)?;
    part.end("a:p")
}

/// A run of text, or only the end-of-paragraph properties when empty.
fn write_run(part: &mut XmlPart, text: &str, size: &str, bold: bool) -> Result<()> {
    let mut props = vec![("lang", "en-US"), ("sz", size)];
    if bold {
        props.push(("b", "1"));
    }

    if text.is_empty() {
        return part.empty("a:endParaRPr", &props);
    }

    part.start("a:r", &[])?;
    part.empty("a:rPr", &props)?;
    part.text_element("a:t", &[], text)?;
    part.end("a:r")
}

#[cfg(test)]
mod tests {
    use super::*;
    use docforge_core::{assemble, ExportFormat, Project, ProjectKind, Section};
    use std::io::Read;
    use zip::ZipArchive;

    fn read_part(bytes: &[u8], path: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut content = String::new();
        archive
            .by_name(path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_package_has_one_part_per_slide() {
        let mut project = Project::new("Pitch", ProjectKind::Deck);
        project.add_section(Section::new("One", 0.0, "- a"));
        project.add_section(Section::new("Two", 1.0, "- b"));
        let bytes = PptxWriter::new()
            .render(&assemble(&project, ExportFormat::Pptx))
            .unwrap();

        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
        ] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
        assert!(!names.contains(&"ppt/slides/slide3.xml"));

        let types = read_part(&bytes, "[Content_Types].xml");
        assert!(types.contains("PartName=\"/ppt/slides/slide2.xml\""));

        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains("<p:sldId id=\"256\" r:id=\"rId3\"/>"));
        assert!(presentation.contains("<p:sldId id=\"257\" r:id=\"rId4\"/>"));
    }

    #[test]
    fn test_slide_without_bullets_has_no_body() {
        let deck = DeckTree {
            title: "Pitch".to_string(),
            slides: vec![Slide::new("Pitch")],
        };
        let bytes = PptxWriter::new().to_bytes(&deck).unwrap();
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");

        assert!(slide.contains("<a:t>Pitch</a:t>"));
        assert!(slide.contains("sz=\"2800\" b=\"1\""));
        assert!(!slide.contains("name=\"Body\""));
    }

    #[test]
    fn test_cover_slide_uses_large_title() {
        let tree = assemble(&Project::new("Pitch", ProjectKind::Deck), ExportFormat::Pptx);
        let bytes = PptxWriter::new().render(&tree).unwrap();
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");

        assert!(slide.contains("name=\"Cover Title\""));
        assert!(slide.contains("sz=\"3600\" b=\"1\""));
        assert!(slide.contains("<a:off x=\"457200\" y=\"914400\"/>"));
        assert!(!slide.contains("name=\"Body\""));
    }

    #[test]
    fn test_bullets_are_escaped() {
        let deck = DeckTree {
            title: "T".to_string(),
            slides: vec![Slide {
                title: "S".to_string(),
                bullets: vec!["a < b".to_string(), "R&D".to_string()],
                ..Slide::default()
            }],
        };
        let bytes = PptxWriter::new().to_bytes(&deck).unwrap();
        let slide = read_part(&bytes, "ppt/slides/slide1.xml");

        assert!(slide.contains("<a:t>a &lt; b</a:t>"));
        assert!(slide.contains("<a:t>R&amp;D</a:t>"));
        assert_eq!(slide.matches("<a:buChar").count(), 2);
    }

    #[test]
    fn test_core_properties() {
        let deck = DeckTree {
            title: "Roadmap".to_string(),
            slides: vec![Slide::new("Roadmap")],
        };
        let bytes = PptxWriter::new().to_bytes(&deck).unwrap();
        let core = read_part(&bytes, "docProps/core.xml");

        assert!(core.contains("<dc:title>Roadmap</dc:title>"));
        assert!(core.contains("<dc:creator>DocForge</dc:creator>"));
    }

    #[test]
    fn test_rejects_document_tree() {
        let tree = assemble(&Project::new("Doc", ProjectKind::Document), ExportFormat::Docx);
        let err = PptxWriter::new().render(&tree).unwrap_err();
        assert!(matches!(err, Error::RenderError(_)));
    }
}
