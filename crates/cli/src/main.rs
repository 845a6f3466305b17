//! CLI tool for exporting DocForge projects.
//!
//! Each input is a project snapshot in the store's JSON shape.

use anyhow::{Context, Result};
use clap::Parser;
use docforge_core::{
    DeckAssembler, DeckTree, DocumentAssembler, ExportArtifact, ExportFormat, Project,
    StructuralTree,
};
use docforge_docx::DocxWriter;
use docforge_pptx::{PptxParser, PptxWriter};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Export DocForge project snapshots to Word or PowerPoint files.
#[derive(Parser, Debug)]
#[command(name = "docforge-export")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input project snapshot(s) (.json)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export format: docx or pptx (default: from the project type)
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// Print the structural tree as JSON instead of writing a file
    #[arg(short, long)]
    json: bool,

    /// Read .pptx inputs back and print their slides as JSON
    #[arg(short, long, conflicts_with_all = ["json", "format", "output"])]
    inspect: bool,

    /// Maximum bullets per slide in deck exports
    #[arg(short = 'b', long, default_value = "12")]
    max_bullets: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut failures = 0;

    for input_path in &args.input {
        log::info!("Processing: {}", input_path.display());

        if let Err(e) = process_file(input_path, &args) {
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
            failures += 1;
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} exports failed", failures, args.input.len());
    }

    Ok(())
}

/// Export a single project snapshot.
fn process_file(input_path: &Path, args: &Args) -> Result<()> {
    if args.inspect {
        let deck = inspect_file(input_path)?;
        println!("{}", serde_json::to_string_pretty(&deck)?);
        return Ok(());
    }

    let json = std::fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;
    let project = Project::from_json(&json)
        .with_context(|| format!("Failed to parse {}", input_path.display()))?;

    let format = ExportFormat::resolve(args.format, &project);
    let tree = build_tree(&project, format, args.max_bullets);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    let bytes = match &tree {
        StructuralTree::Document(_) => DocxWriter::new().render(&tree)?,
        StructuralTree::Deck(_) => PptxWriter::new().render(&tree)?,
    };
    let artifact = ExportArtifact::new(&project.title, format, bytes);

    let output_path = get_output_path(input_path, args.output.as_ref(), &artifact.filename)?;
    write_output(&output_path, &artifact.bytes)?;

    if args.verbose {
        eprintln!(
            "Written {} ({}, {} bytes) to: {}",
            artifact.filename,
            artifact.content_type,
            artifact.bytes.len(),
            output_path.display()
        );
    }

    Ok(())
}

/// Load an exported deck back into its slides.
fn inspect_file(input_path: &Path) -> Result<DeckTree> {
    let file = File::open(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;

    let deck = PptxParser::new()
        .parse(BufReader::new(file))
        .with_context(|| format!("Failed to read deck {}", input_path.display()))?;

    log::debug!("{}: {} slides", input_path.display(), deck.slides.len());
    Ok(deck)
}

/// Assemble the project with the CLI's deck limits.
fn build_tree(project: &Project, format: ExportFormat, max_bullets: usize) -> StructuralTree {
    match format {
        ExportFormat::Docx => StructuralTree::Document(DocumentAssembler::new().assemble(project)),
        ExportFormat::Pptx => StructuralTree::Deck(
            DeckAssembler::new()
                .with_max_bullets(max_bullets)
                .assemble(project),
        ),
    }
}

/// Determine the output path for an exported file.
fn get_output_path(
    input_path: &Path,
    output_dir: Option<&PathBuf>,
    filename: &str,
) -> Result<PathBuf> {
    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(filename)
        }
        None => match input_path.parent() {
            Some(parent) => parent.join(filename),
            None => PathBuf::from(filename),
        },
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
