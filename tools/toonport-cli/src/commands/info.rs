//! Show document information and the export order.

use std::path::PathBuf;

use toonport_export_engine::filter::InclusionFilter;
use toonport_export_engine::keyframes::{collect_keyframes, count_total_keyframes};
use toonport_export_engine::walker::{collect_candidates, Classification};
use toonport_scene_model::document::SceneDocument;
use toonport_scene_model::layer::LayerNode;
use toonport_scene_model::memory::MemoryDocument;
use toonport_scene_model::options::ExportOptions;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let document =
        MemoryDocument::load(&path).map_err(|e| anyhow::anyhow!("Failed to load document: {e}"))?;
    let info = document.info();

    println!("Document: {}", info.name);
    println!("  Canvas: {}x{}", info.width, info.height);
    println!(
        "  Range: {}..={} ({} samples @ {}fps)",
        info.range.start,
        info.range.end,
        info.duration(),
        info.frame_rate
    );
    println!();

    // Default selection policy; static candidates are listed regardless.
    let options = ExportOptions::default();
    let filter = InclusionFilter::from_options(&options);
    let root = document.root();
    let animated = collect_candidates(root, &filter, options.flatten_groups, Classification::Animated);
    let statics = collect_candidates(root, &filter, false, Classification::Static);

    println!(
        "Animated layers ({}, {} keyframes):",
        animated.len(),
        count_total_keyframes(&animated, info.range)
    );
    for layer in &animated {
        let keys: Vec<String> = collect_keyframes(*layer, info.range)
            .iter()
            .map(|s| s.to_string())
            .collect();
        let kind = if layer.is_group() { " (group)" } else { "" };
        println!("  {}{kind}: [{}]", layer.name(), keys.join(", "));
    }
    println!();

    println!("Static layers ({}, exported with --include-static):", statics.len());
    for layer in &statics {
        println!("  {}", layer.name());
    }

    Ok(())
}
