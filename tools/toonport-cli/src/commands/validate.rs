//! Validate a document.

use std::path::PathBuf;

use toonport_scene_model::memory::MemoryDocument;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    println!("Validating document at: {}", path.display());

    let document =
        MemoryDocument::load(&path).map_err(|e| anyhow::anyhow!("Failed to load document: {e}"))?;

    println!("  Name: {}", document.name);
    println!("  Canvas: {}x{}", document.width, document.height);
    println!("  Range: {}..={}", document.range.start, document.range.end);
    println!("  Top-level layers: {}", document.layers().len());

    let problems = document.validate();
    if problems.is_empty() {
        println!("\nDocument is valid.");
        return Ok(());
    }

    println!("\nValidation issues:");
    for problem in &problems {
        println!("  - {problem}");
    }
    anyhow::bail!("{} issue(s) found", problems.len())
}
