//! Core project model and markdown-to-structure conversion for DocForge
//! exports.
//!
//! A section body is split into blocks, each block's lines are classified,
//! and the blocks are converted into content nodes. The assemblers turn a
//! whole project into a [`StructuralTree`] that the DOCX and PPTX renderers
//! serialize.

pub mod assemble;
pub mod classify;
pub mod convert;
pub mod error;
pub mod naming;
pub mod package;
pub mod split;
pub mod tree;
pub mod types;

pub use assemble::{assemble, DeckAssembler, DocumentAssembler};
pub use classify::{classify_line, ClassifiedLine};
pub use convert::{classify_block, convert_block, BlockBody, ClassifiedBlock};
pub use error::{Error, Result};
pub use naming::export_filename;
pub use split::{split_blocks, Blocks, ContentBlock};
pub use tree::{ContentNode, DeckTree, DocumentTree, HeadingLevel, Slide, SlideKind, StructuralTree};
pub use types::{ExportArtifact, ExportFormat, Project, ProjectKind, Section, SectionStatus};
