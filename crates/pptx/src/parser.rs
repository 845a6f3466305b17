//! PPTX reader that loads a deck back into slide titles and bullets.
//!
//! Shapes on a slide are ordered top-to-bottom, then left-to-right. The
//! first shape's text is the slide title; every paragraph of the remaining
//! shapes is a bullet. A first shape named like the writer's cover title
//! marks a cover slide.
//!
//! Used by `docforge-export --inspect` to check what an exported deck holds.

use crate::writer::COVER_TITLE_SHAPE;
use docforge_core::{DeckTree, Error, Result, Slide, SlideKind};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Reads decks written by [`crate::PptxWriter`] or any other PresentationML producer.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Load slide titles and bullets from a .pptx archive.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<DeckTree> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Not a PPTX archive: {}", e)))?;

        let title = match read_part(&mut archive, "docProps/core.xml") {
            Ok(core) => extract_core_title(&core)?,
            Err(e) => {
                log::warn!("No core properties ({}), leaving deck title empty", e);
                String::new()
            }
        };

        let rels = read_part(&mut archive, "ppt/_rels/presentation.xml.rels")?;
        let slides = slide_paths(&rels)?
            .iter()
            .map(|path| read_slide(&mut archive, path))
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Read PPTX {:?} with {} slides", title, slides.len());

        Ok(DeckTree { title, slides })
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// A slide relationship from `presentation.xml.rels`.
struct SlideRef {
    path: String,
    number: Option<usize>,
}

/// Slide part paths in presentation order.
///
/// Relationships are numbered by their id (falling back to the target name);
/// unnumbered ones go last, ordered by path.
fn slide_paths(rels_xml: &str) -> Result<Vec<String>> {
    let mut refs = Vec::new();
    let mut reader = Reader::from_str(rels_xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let is_slide = attribute(e, b"Type").is_some_and(|t| t.ends_with("/slide"));
                if !is_slide {
                    continue;
                }

                let target = attribute(e, b"Target").unwrap_or_default();
                let number = attribute(e, b"Id")
                    .and_then(|id| trailing_number(&id))
                    .or_else(|| trailing_number(&target));
                let path = match target.strip_prefix('/') {
                    Some(absolute) => absolute.to_string(),
                    None => format!("ppt/{}", target),
                };
                refs.push(SlideRef { path, number });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Bad presentation relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    refs.sort_by(|a, b| {
        (a.number.is_none(), a.number, &a.path).cmp(&(b.number.is_none(), b.number, &b.path))
    });

    Ok(refs.into_iter().map(|r| r.path).collect())
}

/// Read one slide: the topmost shape is the title, the rest are bullets.
fn read_slide<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<Slide> {
    let xml = read_part(archive, path)?;
    let mut shapes = extract_shapes_from_xml(&xml);

    shapes.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut shapes = shapes.into_iter();
    let (title, kind) = match shapes.next() {
        Some(shape) => {
            let kind = if shape.name == COVER_TITLE_SHAPE {
                SlideKind::Title
            } else {
                SlideKind::Content
            };
            (shape.paragraphs.join("\n"), kind)
        }
        None => (String::new(), SlideKind::Content),
    };
    let bullets = shapes.flat_map(|shape| shape.paragraphs).collect();

    Ok(Slide {
        title,
        bullets,
        kind,
    })
}

/// A part of the archive as UTF-8 text.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut part = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("Missing part '{}': {}", path, e)))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| Error::ZipError(format!("Unreadable part '{}': {}", path, e)))?;

    Ok(xml)
}

/// A text shape read from slide XML.
#[derive(Debug, Default)]
struct ShapeInfo {
    name: String,
    paragraphs: Vec<String>,
    x: f64,
    y: f64,
}

/// Extract text shapes with their position from slide XML.
fn extract_shapes_from_xml(xml_content: &str) -> Vec<ShapeInfo> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut current_shape: Option<ShapeInfo> = None;
    let mut current_paragraph: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => current_shape = Some(ShapeInfo::default()),
                b"p" if current_shape.is_some() => current_paragraph = Some(String::new()),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if let Some(ref mut shape) = current_shape {
                    match local_name(e.name().as_ref()) {
                        b"cNvPr" => shape.name = attribute(e, b"name").unwrap_or_default(),
                        b"off" => {
                            if let Some(x) = attribute(e, b"x").and_then(|v| v.parse().ok()) {
                                shape.x = x;
                            }
                            if let Some(y) = attribute(e, b"y").and_then(|v| v.parse().ok()) {
                                shape.y = y;
                            }
                        }
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(ref mut paragraph) = current_paragraph {
                    let text = e.unescape().unwrap_or_default();
                    paragraph.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"p" => {
                    if let (Some(shape), Some(paragraph)) =
                        (current_shape.as_mut(), current_paragraph.take())
                    {
                        shape.paragraphs.push(paragraph);
                    }
                }
                b"sp" => {
                    if let Some(shape) = current_shape.take() {
                        if !shape.paragraphs.is_empty() {
                            shapes.push(shape);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("XML parsing error, keeping shapes read so far: {}", e);
                break;
            }
            _ => {}
        }
    }

    shapes
}

/// Read `dc:title` from the core properties part.
fn extract_core_title(xml_content: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml_content);
    let mut in_title = false;
    let mut title = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"title" => {
                in_title = true;
            }
            Ok(Event::Text(ref e)) if in_title => {
                title.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"title" => {
                in_title = false;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing core properties: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(title)
}

/// Value of the attribute whose local name is `key`.
fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| local_name(attr.key.as_ref()) == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Element or attribute name without its namespace prefix.
fn local_name(name: &[u8]) -> &[u8] {
    name.rsplit(|&b| b == b':').next().unwrap_or(name)
}

/// The number at the end of `rId7` or `slide7.xml`.
fn trailing_number(s: &str) -> Option<usize> {
    let stem = s.strip_suffix(".xml").unwrap_or(s);
    let start = stem
        .rfind(|c: char| !c.is_ascii_digit())
        .map_or(0, |i| i + 1);
    stem[start..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PptxWriter;
    use docforge_core::{assemble, ExportFormat, Project, ProjectKind, Section, StructuralTree};
    use std::io::Cursor;

    #[test]
    fn test_trailing_number() {
        assert_eq!(trailing_number("rId3"), Some(3));
        assert_eq!(trailing_number("slide11.xml"), Some(11));
        assert_eq!(trailing_number("theme"), None);
        assert_eq!(trailing_number(""), None);
    }

    #[test]
    fn test_local_name_drops_prefix() {
        assert_eq!(local_name(b"a:off"), b"off");
        assert_eq!(local_name(b"Relationship"), b"Relationship");
    }

    #[test]
    fn test_slide_paths_numeric_order() {
        let rels = r#"<Relationships xmlns="r">
            <Relationship Id="rId12" Type="http://x/relationships/slide" Target="slides/slide10.xml"/>
            <Relationship Id="rId1" Type="http://x/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
            <Relationship Id="rId3" Type="http://x/relationships/slide" Target="/ppt/slides/slide1.xml"/>
            <Relationship Id="custom" Type="http://x/relationships/slide" Target="slides/extra.xml"/>
        </Relationships>"#;

        assert_eq!(
            slide_paths(rels).unwrap(),
            vec!["ppt/slides/slide1.xml", "ppt/slides/slide10.xml", "ppt/slides/extra.xml"]
        );
    }

    #[test]
    fn test_shapes_sorted_by_position() {
        let xml = r#"<p:sld xmlns:p="p" xmlns:a="a"><p:cSld><p:spTree>
            <p:sp><p:spPr><a:xfrm><a:off x="0" y="900"/></a:xfrm></p:spPr>
              <p:txBody><a:p><a:r><a:t>lower</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:spPr><a:xfrm><a:off x="0" y="100"/></a:xfrm></p:spPr>
              <p:txBody><a:p><a:r><a:t>upper</a:t></a:r></a:p></p:txBody></p:sp>
        </p:spTree></p:cSld></p:sld>"#;

        let mut shapes = extract_shapes_from_xml(xml);
        shapes.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap());
        assert_eq!(shapes[0].paragraphs, vec!["upper"]);
        assert_eq!(shapes[1].paragraphs, vec!["lower"]);
    }

    #[test]
    fn test_reads_back_written_deck() {
        let mut project = Project::new("Launch Plan", ProjectKind::Deck);
        for n in 1..=11 {
            project.add_section(Section::new(
                format!("## Step {}", n),
                n as f64,
                format!("- do {}\n- check {}", n, n),
            ));
        }

        let tree = assemble(&project, ExportFormat::Pptx);
        let bytes = PptxWriter::new().render(&tree).unwrap();
        let deck = PptxParser::new().parse(Cursor::new(bytes)).unwrap();

        let StructuralTree::Deck(expected) = tree else {
            panic!("expected a deck");
        };
        assert_eq!(deck, expected);
        assert_eq!(deck.slides[10].title, "Step 11");
    }

    #[test]
    fn test_reads_title_only_slide() {
        let tree = assemble(&Project::new("Empty Deck", ProjectKind::Deck), ExportFormat::Pptx);
        let bytes = PptxWriter::new().render(&tree).unwrap();
        let deck = PptxParser::new().parse(Cursor::new(bytes)).unwrap();

        assert_eq!(deck.title, "Empty Deck");
        assert_eq!(deck.slides, vec![Slide::cover("Empty Deck")]);
    }

    #[test]
    fn test_invalid_archive() {
        let err = PptxParser::new()
            .parse(Cursor::new(b"not a zip".to_vec()))
            .unwrap_err();
        assert!(matches!(err, Error::ZipError(_)));
    }
}
