//! Assembly of a project into a structural tree.
//!
//! Both policies read the same classified blocks; they differ only in how
//! the blocks are aggregated. Documents keep every node under a heading per
//! section. Decks collect a capped bullet list per slide.

use crate::classify::strip_heading_marker;
use crate::convert::{classify_block, convert_block, BlockBody};
use crate::split::split_blocks;
use crate::tree::{ContentNode, DeckTree, DocumentTree, HeadingLevel, Slide, StructuralTree};
use crate::types::{ExportFormat, Project, Section};

/// Title used for a document whose project has none.
pub const UNTITLED_DOCUMENT: &str = "Untitled";

/// Title used for a deck whose project has none.
pub const UNTITLED_DECK: &str = "Presentation";

/// Title used for a section that has none.
pub const UNTITLED_SECTION: &str = "Section";

/// Default cap on bullets per slide.
pub const DEFAULT_MAX_BULLETS: usize = 12;

/// Default number of lines taken from a prose block on a slide.
pub const DEFAULT_PROSE_LINES: usize = 3;

/// Assemble a project for the given export format.
pub fn assemble(project: &Project, format: ExportFormat) -> StructuralTree {
    match format {
        ExportFormat::Docx => StructuralTree::Document(DocumentAssembler::new().assemble(project)),
        ExportFormat::Pptx => StructuralTree::Deck(DeckAssembler::new().assemble(project)),
    }
}

/// Builds a page-flow document.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler;

impl DocumentAssembler {
    /// Create a document assembler.
    pub fn new() -> Self {
        Self
    }

    /// Title node, then per section a level-1 heading followed by its body.
    ///
    /// A section with no blocks gets one empty paragraph so it still shows up.
    pub fn assemble(&self, project: &Project) -> DocumentTree {
        let title = title_or(&project.title, UNTITLED_DOCUMENT, "project");
        let mut nodes = vec![ContentNode::heading(HeadingLevel::Title, title.as_str())];

        for section in project.ordered_sections() {
            let section_title = title_or(&section.title, UNTITLED_SECTION, "section");
            nodes.push(ContentNode::heading(HeadingLevel::H1, section_title));

            let before = nodes.len();
            for block in split_blocks(&section.current_content) {
                nodes.extend(convert_block(&block));
            }

            if nodes.len() == before {
                nodes.push(ContentNode::paragraph(""));
            }
        }

        log::debug!(
            "Assembled document {:?}: {} sections, {} nodes",
            title,
            project.sections.len(),
            nodes.len()
        );

        DocumentTree { title, nodes }
    }
}

/// Builds a slide deck, one slide per section.
#[derive(Debug, Clone)]
pub struct DeckAssembler {
    /// Bullets allowed on one slide.
    max_bullets: usize,

    /// Lines taken from a block that is not a bullet list.
    prose_lines: usize,
}

impl Default for DeckAssembler {
    fn default() -> Self {
        Self {
            max_bullets: DEFAULT_MAX_BULLETS,
            prose_lines: DEFAULT_PROSE_LINES,
        }
    }
}

impl DeckAssembler {
    /// Create a deck assembler with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bullet cap per slide.
    pub fn with_max_bullets(mut self, max: usize) -> Self {
        self.max_bullets = max.max(1);
        self
    }

    /// Set how many lines a prose block contributes.
    pub fn with_prose_lines(mut self, lines: usize) -> Self {
        self.prose_lines = lines.max(1);
        self
    }

    /// One slide per section, or a single title slide when there are none.
    pub fn assemble(&self, project: &Project) -> DeckTree {
        let title = title_or(&project.title, UNTITLED_DECK, "project");
        let sections = project.ordered_sections();

        let slides = if sections.is_empty() {
            vec![Slide::cover(title.as_str())]
        } else {
            sections.into_iter().map(|s| self.slide_for(s)).collect()
        };

        log::debug!("Assembled deck {:?}: {} slides", title, slides.len());

        DeckTree { title, slides }
    }

    fn slide_for(&self, section: &Section) -> Slide {
        let stripped = strip_heading_marker(&section.title);
        let title = title_or(stripped, UNTITLED_SECTION, "section");

        Slide {
            title,
            bullets: self.collect_bullets(&section.current_content),
            ..Slide::default()
        }
    }

    /// Gather bullets block by block until the cap is reached.
    ///
    /// A leading heading in each block is dropped. List blocks contribute all
    /// their items; other blocks contribute their first few lines verbatim.
    fn collect_bullets(&self, content: &str) -> Vec<String> {
        let mut bullets = Vec::new();

        for block in split_blocks(content) {
            let lines = match classify_block(&block).body {
                BlockBody::Bullets(items) => items,
                BlockBody::Lines(lines) => lines.into_iter().take(self.prose_lines).collect(),
            };

            for line in lines {
                if bullets.len() == self.max_bullets {
                    return bullets;
                }
                bullets.push(line.to_string());
            }
        }

        bullets
    }
}

fn title_or(title: &str, fallback: &str, what: &str) -> String {
    if title.is_empty() {
        log::warn!("Empty {} title, using {:?}", what, fallback);
        fallback.to_string()
    } else {
        title.to_string()
    }
}
