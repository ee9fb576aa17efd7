//! Write a sample document.

use std::path::PathBuf;

use toonport_scene_model::document::FrameRange;
use toonport_scene_model::layer::{Bounds, ColorLabel};
use toonport_scene_model::memory::{Cel, MemoryDocument, MemoryLayer};

pub fn run(
    name: String,
    output: PathBuf,
    width: u32,
    height: u32,
    start: i64,
    end: i64,
    fps: f64,
) -> anyhow::Result<()> {
    if end < start {
        anyhow::bail!("Invalid range: end ({end}) is before start ({start})");
    }

    let path = output.join(format!("{name}.json"));
    println!("Creating document '{}' at {}", name, path.display());

    let mut document = sample_document(&name, width, height, FrameRange::new(start, end));
    document.frame_rate = fps;
    document
        .save(&path)
        .map_err(|e| anyhow::anyhow!("Failed to create document: {e}"))?;

    println!("Document created successfully:");
    println!("  Canvas: {width}x{height}");
    println!("  Range: {start}..={end} @ {fps}fps");
    println!();
    println!("Layers (front to back):");
    println!("  Rough        (reference label, skipped by default)");
    println!("  FX/          (group, exported as one flattened level)");
    println!("  Character    (keyframes with a held clone and a blank stop)");
    println!("  Background   (static, exported with --include-static)");

    Ok(())
}

/// Every layer role the exporter distinguishes, on a `width`x`height` canvas.
fn sample_document(name: &str, width: u32, height: u32, range: FrameRange) -> MemoryDocument {
    let s = range.start;
    let step = (range.len() as i64 / 4).max(1);
    let (w, h) = (width.max(4), height.max(4));
    let quarter = |x: u32, y: u32| Bounds::new(x as i32, y as i32, w / 4, h / 4);

    let pose_a = Cel::solid(quarter(w / 4, h / 2), [40, 40, 40, 255]);
    let pose_b = Cel::solid(quarter(w / 2, h / 2), [40, 40, 40, 255]);
    let character = MemoryLayer::paint("Character")
        .with_key(s, pose_a)
        .with_key(s + step, pose_b)
        .with_key(s + 2 * step, pose_a)
        .with_key(s + 3 * step, Cel::blank());

    let spark = MemoryLayer::paint("spark")
        .with_key(s, Cel::solid(quarter(0, 0), [255, 200, 0, 255]))
        .with_key(s + step, Cel::blank());
    let glow = MemoryLayer::paint("glow")
        .with_key(s + 2 * step, Cel::solid(quarter(w / 2, 0), [255, 255, 160, 128]));
    let fx = MemoryLayer::group("FX", vec![glow, spark]);

    let rough = MemoryLayer::paint("Rough")
        .with_content(Cel::solid(Bounds::new(0, 0, w, h), [128, 128, 255, 64]))
        .labelled(ColorLabel::REFERENCE);

    let background =
        MemoryLayer::paint("Background").with_content(Cel::solid(Bounds::new(0, 0, w, h), [235, 230, 220, 255]));

    let mut document = MemoryDocument::new(
        name,
        width,
        height,
        range,
        vec![background, character, fx, rough],
    );
    // Keyframes past a short range would fail validation.
    clamp_keyframes(&mut document.root, range);
    document
}

fn clamp_keyframes(layer: &mut MemoryLayer, range: FrameRange) {
    layer.keyframes.retain(|sample, _| range.contains(*sample));
    for child in &mut layer.children {
        clamp_keyframes(child, range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_document_is_valid() {
        let doc = sample_document("walk", 64, 64, FrameRange::new(0, 11));
        assert!(doc.validate().is_empty(), "{:?}", doc.validate());
        assert_eq!(doc.layers().len(), 4);
    }

    #[test]
    fn test_short_range_stays_valid() {
        let doc = sample_document("blink", 8, 8, FrameRange::new(5, 6));
        assert!(doc.validate().is_empty(), "{:?}", doc.validate());
    }
}
