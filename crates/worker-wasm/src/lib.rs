//! WASM-compatible wrapper for DocForge exports.
//!
//! This crate exposes the export pipeline to JavaScript for use in
//! Cloudflare Workers that already hold a project snapshot.

use docforge_core::{assemble, export_filename, ExportArtifact, ExportFormat, Project, StructuralTree};
use docforge_docx::DocxWriter;
use docforge_pptx::PptxWriter;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Download metadata for an export.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    /// Suggested download filename.
    pub filename: String,
    /// MIME type of the artifact.
    pub content_type: String,
    /// Resolved format ("docx" or "pptx").
    pub format: String,
}

/// Export a project snapshot to DOCX or PPTX bytes.
///
/// # Arguments
/// * `project_json` - The project snapshot as JSON
/// * `format` - "docx" or "pptx"; defaults to the project's type
///
/// # Returns
/// A `Uint8Array` with the package bytes, or throws on error.
#[wasm_bindgen]
pub fn export_project(project_json: &str, format: Option<String>) -> Result<Vec<u8>, JsValue> {
    export_impl(project_json, format.as_deref())
        .map(|artifact| artifact.bytes)
        .map_err(|e| JsValue::from_str(&e))
}

/// Filename and MIME type an export would produce, without rendering it.
#[wasm_bindgen]
pub fn export_info(project_json: &str, format: Option<String>) -> Result<JsValue, JsValue> {
    let info = export_info_impl(project_json, format.as_deref()).map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&info)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// The structural tree an export is built from, as a JavaScript object.
#[wasm_bindgen]
pub fn build_tree(project_json: &str, format: Option<String>) -> Result<JsValue, JsValue> {
    let (_, _, tree) = prepare(project_json, format.as_deref()).map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&tree)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Parse the snapshot and settle the format. An empty format string
/// counts as absent.
fn load(project_json: &str, format: Option<&str>) -> Result<(Project, ExportFormat), String> {
    let project = Project::from_json(project_json).map_err(|e| e.to_string())?;

    let requested = match format.map(str::trim) {
        Some(name) if !name.is_empty() => {
            Some(name.parse::<ExportFormat>().map_err(|e| e.to_string())?)
        }
        _ => None,
    };

    let format = ExportFormat::resolve(requested, &project);
    Ok((project, format))
}

fn prepare(
    project_json: &str,
    format: Option<&str>,
) -> Result<(Project, ExportFormat, StructuralTree), String> {
    let (project, format) = load(project_json, format)?;
    let tree = assemble(&project, format);

    Ok((project, format, tree))
}

fn export_impl(project_json: &str, format: Option<&str>) -> Result<ExportArtifact, String> {
    let (project, format, tree) = prepare(project_json, format)?;

    let bytes = match format {
        ExportFormat::Docx => DocxWriter::new()
            .render(&tree)
            .map_err(|e| format!("DOCX export error: {}", e))?,
        ExportFormat::Pptx => PptxWriter::new()
            .render(&tree)
            .map_err(|e| format!("PPTX export error: {}", e))?,
    };

    Ok(ExportArtifact::new(&project.title, format, bytes))
}

fn export_info_impl(project_json: &str, format: Option<&str>) -> Result<ExportInfo, String> {
    let (project, format) = load(project_json, format)?;

    Ok(ExportInfo {
        filename: export_filename(&project.title, format),
        content_type: format.content_type().to_string(),
        format: format.to_string(),
    })
}
