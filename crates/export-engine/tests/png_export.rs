use std::path::PathBuf;

use toonport_export_engine::backend::PngBackend;
use toonport_export_engine::export::{ExportJob, SceneExporter};
use toonport_export_engine::manifest::{manifest_path, write_manifest};
use toonport_scene_model::document::FrameRange;
use toonport_scene_model::layer::Bounds;
use toonport_scene_model::memory::{Cel, MemoryDocument, MemoryLayer};
use toonport_scene_model::options::ExportOptions;

fn export_root(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("toonport_png_{test}"));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn walk_cycle() -> MemoryDocument {
    let red = Cel::solid(Bounds::new(0, 0, 2, 2), [255, 0, 0, 255]);
    let blue = Cel::solid(Bounds::new(2, 2, 2, 2), [0, 0, 255, 255]);
    MemoryDocument::new(
        "walk cycle",
        4,
        4,
        FrameRange::new(0, 5),
        vec![
            MemoryLayer::paint("BG").with_content(Cel::solid(Bounds::new(0, 0, 4, 4), [0, 255, 0, 255])),
            MemoryLayer::paint("Ink")
                .with_key(0, red)
                .with_key(2, blue)
                .with_key(4, red),
        ],
    )
}

#[test]
fn writes_drawing_sequences_on_disk() {
    let root = export_root("layout");
    let doc = walk_cycle();
    let mut backend = PngBackend::new(&doc);
    let job = ExportJob {
        export_root: root.clone(),
        options: ExportOptions {
            include_static: true,
            ..ExportOptions::default()
        },
    };

    let report = SceneExporter::new(&doc, &mut backend, job).export();

    assert!(report.success, "{report}");
    let scene_dir = root.join("walk_cycle");
    assert_eq!(report.scene_path, scene_dir.join("walk_cycle.tnz"));
    assert!(scene_dir.join("Ink").join("Ink.0001.png").is_file());
    assert!(scene_dir.join("Ink").join("Ink.0002.png").is_file());
    assert!(!scene_dir.join("Ink").join("Ink.0003.png").exists());
    assert!(scene_dir.join("BG").join("BG.0001.png").is_file());
    assert_eq!(report.assets_rendered, 3);

    let first = image::open(scene_dir.join("Ink").join("Ink.0001.png"))
        .unwrap()
        .to_rgba8();
    assert_eq!(first.dimensions(), (4, 4));
    assert_eq!(first.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(first.get_pixel(3, 3).0, [0, 0, 0, 0]);

    let manifest = manifest_path(&report).unwrap();
    assert_eq!(manifest, scene_dir.join("walk_cycle.export.json"));
    write_manifest(&report, &manifest).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&manifest).unwrap()).unwrap();
    assert_eq!(value["report"]["success"], true);
    assert_eq!(value["report"]["layers"][0]["name"], "Ink");
    assert_eq!(value["report"]["layers"][1]["name"], "BG");

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn reexport_overwrites_in_place() {
    let root = export_root("overwrite");
    let doc = walk_cycle();

    for _ in 0..2 {
        let mut backend = PngBackend::new(&doc);
        let job = ExportJob {
            export_root: root.clone(),
            options: ExportOptions::default(),
        };
        let report = SceneExporter::new(&doc, &mut backend, job).export();
        assert!(report.success);
        assert_eq!(report.layers.len(), 1);
    }

    let files = std::fs::read_dir(root.join("walk_cycle").join("Ink"))
        .unwrap()
        .count();
    assert_eq!(files, 2);

    std::fs::remove_dir_all(&root).ok();
}
