//! DOCX (Office Open XML) renderer for DocForge document exports.
//!
//! Serializes a document-mode structural tree into a .docx package.

pub mod writer;

pub use writer::DocxWriter;
