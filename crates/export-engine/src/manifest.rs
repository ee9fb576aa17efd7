//! Export manifest: the report serialized for scene-description generators.

use std::path::{Path, PathBuf};

use serde::Serialize;
use toonport_common::error::{ToonportError, ToonportResult};
use toonport_scene_model::report::ExportReport;

/// Name of the tool recorded in every manifest.
pub const GENERATOR: &str = "toonport";

#[derive(Debug, Serialize)]
struct ExportManifest<'r> {
    generator: &'static str,
    version: &'static str,
    exported_at: String,
    report: &'r ExportReport,
}

/// `<scene_dir>/<scene>.export.json`, next to the scene file.
pub fn manifest_path(report: &ExportReport) -> ToonportResult<PathBuf> {
    let stem = report
        .scene_path
        .file_stem()
        .ok_or_else(|| ToonportError::document("Report has no scene path"))?;
    let dir = report.scene_dir().unwrap_or_else(|| Path::new("."));
    let mut file_name = stem.to_os_string();
    file_name.push(".export.json");
    Ok(dir.join(file_name))
}

/// Write `report` as a pretty-printed manifest at `path`.
pub fn write_manifest(report: &ExportReport, path: &Path) -> ToonportResult<()> {
    let manifest = ExportManifest {
        generator: GENERATOR,
        version: env!("CARGO_PKG_VERSION"),
        exported_at: chrono::Utc::now().to_rfc3339(),
        report,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&manifest)?)?;
    tracing::info!(path = %path.display(), "Wrote export manifest");
    Ok(())
}
