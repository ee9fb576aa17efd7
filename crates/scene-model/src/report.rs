//! Exposure records and the export report handed to scene generators.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::options::LevelKind;

/// Per-layer, 1-based identifier of a distinct rendered drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub u32);

impl AssetId {
    pub const FIRST: Self = Self(1);

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// One xsheet cell: `asset_id` is exposed at `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exposure {
    pub row: u32,
    pub asset_id: AssetId,
}

/// Everything a scene generator needs to load one exported level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerExportRecord {
    /// Collision-free level name.
    pub name: String,

    /// Folder holding this level's drawings.
    pub folder: PathBuf,

    pub level_kind: LevelKind,

    /// `<name>..<ext>`; the double dot stands in for the drawing number.
    pub file_pattern: String,

    exposures: Vec<Exposure>,
}

impl LayerExportRecord {
    pub fn new(
        name: impl Into<String>,
        folder: impl Into<PathBuf>,
        level_kind: LevelKind,
        extension: &str,
    ) -> Self {
        let name = name.into();
        let file_pattern = format!("{name}..{extension}");
        Self {
            name,
            folder: folder.into(),
            level_kind,
            file_pattern,
            exposures: Vec::new(),
        }
    }

    /// Append a cell. Rows must be strictly increasing.
    pub fn expose(&mut self, row: u32, asset_id: AssetId) {
        debug_assert!(
            self.exposures.last().map_or(true, |last| last.row < row),
            "exposure rows must be appended in order"
        );
        self.exposures.push(Exposure { row, asset_id });
    }

    /// Cells in row order.
    pub fn exposures(&self) -> &[Exposure] {
        &self.exposures
    }

    /// Drawing shown at `row`, if any.
    pub fn asset_at(&self, row: u32) -> Option<AssetId> {
        self.exposures
            .binary_search_by_key(&row, |e| e.row)
            .ok()
            .map(|i| self.exposures[i].asset_id)
    }

    /// Highest drawing number referenced (ids are dense, so this is the count).
    pub fn asset_count(&self) -> u32 {
        self.exposures
            .iter()
            .map(|e| e.asset_id.get())
            .max()
            .unwrap_or(0)
    }
}

/// Why an export stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportErrorKind {
    NoExportableLayers,
    RenderFailure,
    FilesystemFailure,
    Cancelled,
}

/// Result of one export operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportReport {
    pub success: bool,

    /// Scene file the external generator is expected to create.
    pub scene_path: PathBuf,

    /// Exported levels, foreground first.
    pub layers: Vec<LayerExportRecord>,

    /// Distinct drawings written across all layers.
    pub assets_rendered: u64,

    pub error: Option<String>,

    pub error_kind: Option<ExportErrorKind>,
}

impl ExportReport {
    /// Folder containing the scene file and all level folders.
    pub fn scene_dir(&self) -> Option<&std::path::Path> {
        self.scene_path.parent()
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(
                f,
                "Export complete: {} layers, {} drawings",
                self.layers.len(),
                self.assets_rendered
            )
        } else {
            write!(
                f,
                "Export failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_pattern_uses_placeholder() {
        let record = LayerExportRecord::new("Ink", "/tmp/scene/Ink", LevelKind::Raster, "png");
        assert_eq!(record.file_pattern, "Ink..png");
    }

    #[test]
    fn test_asset_at_finds_rows() {
        let mut record = LayerExportRecord::new("Ink", "/tmp/Ink", LevelKind::Raster, "png");
        record.expose(2, AssetId(1));
        record.expose(3, AssetId(1));
        record.expose(7, AssetId(2));

        assert_eq!(record.asset_at(2), Some(AssetId(1)));
        assert_eq!(record.asset_at(5), None);
        assert_eq!(record.asset_at(7), Some(AssetId(2)));
        assert_eq!(record.asset_count(), 2);
    }

    #[test]
    fn test_asset_id_display_is_zero_padded() {
        assert_eq!(AssetId(7).to_string(), "0007");
        assert_eq!(AssetId(12345).to_string(), "12345");
    }

    #[test]
    fn test_report_display() {
        let mut report = ExportReport::default();
        report.error = Some("Export cancelled by user".to_string());
        assert_eq!(report.to_string(), "Export failed: Export cancelled by user");

        report.success = true;
        report.assets_rendered = 3;
        assert_eq!(report.to_string(), "Export complete: 0 layers, 3 drawings");
    }

    #[test]
    fn test_report_serialization_keeps_exposures() {
        let mut record = LayerExportRecord::new("Ink", "/tmp/Ink", LevelKind::Raster, "png");
        record.expose(0, AssetId(1));
        let report = ExportReport {
            success: true,
            scene_path: PathBuf::from("/tmp/scene/scene.tnz"),
            layers: vec![record],
            assets_rendered: 1,
            error: None,
            error_kind: None,
        };

        let json = serde_json::to_string(&report).unwrap();
        let parsed: ExportReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
        assert_eq!(parsed.layers[0].asset_at(0), Some(AssetId(1)));
    }
}
