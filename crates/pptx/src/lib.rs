//! PPTX (Office Open XML) renderer for DocForge deck exports.
//!
//! The writer serializes a deck-mode structural tree into a .pptx package.
//! The reader loads slide titles and bullets back from such a package.

pub mod parser;
pub mod theme;
pub mod writer;

pub use parser::PptxParser;
pub use writer::PptxWriter;
