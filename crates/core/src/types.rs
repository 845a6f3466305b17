//! Domain types for the project snapshot and export targets.

use crate::error::{Error, Result};
use crate::naming::export_filename;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// MIME type of a WordprocessingML package.
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME type of a PresentationML package.
pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// A read-only snapshot of a project, as fetched from the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project title. May be empty on input.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Free-form topic used when generating sections.
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: String,

    /// Whether the project is a flowed document or a slide deck.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: ProjectKind,

    /// Sections in storage order. Use [`Project::ordered_sections`] for export order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
}

impl Project {
    /// Create an empty project with the given title and kind.
    pub fn new(title: impl Into<String>, kind: ProjectKind) -> Self {
        Self {
            title: title.into(),
            kind,
            ..Self::default()
        }
    }

    /// Parse a project snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add a section to the end of the project.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Sections sorted by `order`; ties keep their storage position.
    pub fn ordered_sections(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.iter().collect();
        sections.sort_by(|a, b| a.order.total_cmp(&b.order));
        sections
    }
}

/// One authored unit of a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Section title. May be empty on input.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Presentation order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: f64,

    /// Raw body text, markdown-like.
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_content: String,

    /// Authoring status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: SectionStatus,
}

impl Section {
    /// Create a section with a title, order and body.
    pub fn new(title: impl Into<String>, order: f64, content: impl Into<String>) -> Self {
        let current_content = content.into();
        let status = if current_content.trim().is_empty() {
            SectionStatus::Empty
        } else {
            SectionStatus::Edited
        };
        Self {
            title: title.into(),
            order,
            current_content,
            status,
        }
    }
}

/// The kind of project, which picks the default export target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// Flowed-page document.
    #[default]
    #[serde(alias = "docx")]
    Document,
    /// Slide presentation.
    #[serde(alias = "pptx")]
    Deck,
}

/// Authoring status of a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    /// Body came from the language model.
    Generated,
    /// Body was written or changed by a user.
    Edited,
    /// No body yet.
    #[default]
    Empty,
}

/// The binary format an export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Word document (document mode).
    Docx,
    /// PowerPoint deck (deck mode).
    Pptx,
}

impl ExportFormat {
    /// Parse a format from a file extension or format name.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "docx" | "document" => Some(Self::Docx),
            "pptx" | "deck" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Resolve the format for a project, preferring an explicit request.
    pub fn resolve(requested: Option<Self>, project: &Project) -> Self {
        requested.unwrap_or_else(|| Self::from(project.kind))
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pptx => "pptx",
        }
    }

    /// MIME type of the produced artifact.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Docx => DOCX_CONTENT_TYPE,
            Self::Pptx => PPTX_CONTENT_TYPE,
        }
    }
}

impl From<ProjectKind> for ExportFormat {
    fn from(kind: ProjectKind) -> Self {
        match kind {
            ProjectKind::Document => Self::Docx,
            ProjectKind::Deck => Self::Pptx,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s).ok_or_else(|| Error::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A rendered file ready to hand back to the caller.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Download filename, derived from the project title.
    pub filename: String,

    /// MIME type of `bytes`.
    pub content_type: &'static str,

    /// The package bytes.
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Wrap rendered bytes, deriving the filename and MIME type.
    pub fn new(title: &str, format: ExportFormat, bytes: Vec<u8>) -> Self {
        Self {
            filename: export_filename(title, format),
            content_type: format.content_type(),
            bytes,
        }
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
