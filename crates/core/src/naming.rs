//! Download filenames for exported artifacts.

use crate::types::ExportFormat;

/// Derive a download filename from a project title.
///
/// Every character outside `[A-Za-z0-9_-]` becomes `_`, one per
/// character, so a base letter followed by a combining mark keeps the
/// letter. An empty title falls back to `document` or `presentation`.
pub fn export_filename(title: &str, format: ExportFormat) -> String {
    let stem = if title.is_empty() {
        match format {
            ExportFormat::Docx => "document".to_string(),
            ExportFormat::Pptx => "presentation".to_string(),
        }
    } else {
        sanitize_stem(title)
    };

    format!("{}.{}", stem, format.extension())
}

fn sanitize_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
