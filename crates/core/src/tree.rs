//! Structural trees handed to the renderers.

use serde::Serialize;

/// Heading depth of a content node.
///
/// `Title` is reserved for the project title at the top of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    Title,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// Level for a `#` count, clamped to `1..=6`.
    pub fn from_depth(depth: u8) -> Self {
        match depth {
            0 | 1 => Self::H1,
            2 => Self::H2,
            3 => Self::H3,
            4 => Self::H4,
            5 => Self::H5,
            _ => Self::H6,
        }
    }

    /// Numeric depth, or `None` for the title.
    pub fn depth(self) -> Option<u8> {
        match self {
            Self::Title => None,
            Self::H1 => Some(1),
            Self::H2 => Some(2),
            Self::H3 => Some(3),
            Self::H4 => Some(4),
            Self::H5 => Some(5),
            Self::H6 => Some(6),
        }
    }
}

/// The atomic unit handed to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContentNode {
    Heading { level: HeadingLevel, text: String },
    BulletItem { text: String },
    Paragraph { text: String },
}

impl ContentNode {
    /// Create a heading node.
    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self::Heading {
            level,
            text: text.into(),
        }
    }

    /// Create a bulleted list item.
    pub fn bullet(text: impl Into<String>) -> Self {
        Self::BulletItem { text: text.into() }
    }

    /// Create a plain paragraph.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    /// The node's text, whatever its kind.
    pub fn text(&self) -> &str {
        match self {
            Self::Heading { text, .. } | Self::BulletItem { text } | Self::Paragraph { text } => {
                text
            }
        }
    }
}

/// Page-flow document: content nodes in authoring order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentTree {
    /// Document title, also the first node.
    pub title: String,

    /// All nodes in order, starting with the title heading.
    pub nodes: Vec<ContentNode>,
}

/// How a slide is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    /// Cover slide carrying only the deck title, in a larger font.
    Title,
    /// Section slide: title at the top, optional bullet body.
    #[default]
    Content,
}

/// One slide of a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Slide {
    /// Slide title.
    pub title: String,

    /// Body bullets, already stripped of list markers.
    pub bullets: Vec<String>,

    /// Layout of the slide.
    pub kind: SlideKind,
}

impl Slide {
    /// Create a content slide with no bullets.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Create a cover slide for the deck title.
    pub fn cover(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: SlideKind::Title,
            ..Self::default()
        }
    }
}

/// Slide deck: one slide per section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeckTree {
    /// Presentation title, stored in the package properties.
    pub title: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

/// Output of assembly, ready for the matching renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum StructuralTree {
    Document(DocumentTree),
    Deck(DeckTree),
}
