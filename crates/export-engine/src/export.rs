//! Export orchestration: planning, per-layer timelines, and the final report.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use toonport_scene_model::document::{DocumentInfo, Sample, SceneDocument};
use toonport_scene_model::layer::LayerNode;
use toonport_scene_model::options::ExportOptions;
use toonport_scene_model::report::{AssetId, ExportErrorKind, ExportReport, LayerExportRecord};

use crate::backend::RenderBackend;
use crate::dedup::{ContentFingerprint, DedupCache};
use crate::filter::InclusionFilter;
use crate::keyframes::collect_keyframes;
use crate::naming::{asset_file_name, sanitize_filename, NameRegistry};
use crate::timeline::{hold_for_range, ExposureTimeline, KeyContent};
use crate::walker::{collect_candidates, Classification};

/// Extension of exported drawings.
pub const ASSET_EXTENSION: &str = "png";

/// Extension of the scene file produced by the external generator.
pub const SCENE_EXTENSION: &str = "tnz";

/// Scene name used when neither the options nor the document provide one.
pub const DEFAULT_SCENE_NAME: &str = "Untitled";

/// An export job ready to be run.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Directory the scene folder is created in.
    pub export_root: PathBuf,

    /// Layer-selection policy.
    pub options: ExportOptions,
}

/// Progress callback for export rendering.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send>;

/// Cancellation predicate, polled before each unit of work.
pub type CancelCheck = Box<dyn Fn() -> bool + Send>;

/// Export progress report.
#[derive(Debug, Clone)]
pub struct ExportProgress {
    /// Units of work finished (keyframes plus static layers). Never decreases.
    pub completed: u64,

    /// Total units of work.
    pub total: u64,

    /// Human-readable description of the last finished unit.
    pub message: String,

    /// Current stage.
    pub stage: ExportStage,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Animated,
    Static,
    Complete,
    Failed,
}

/// Terminal export failures. None are retried.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No layers found to export. Check that layers have animation keyframes or enable static layer export.")]
    NoExportableLayers,

    #[error("Frame range {start}..={end} has no exportable rows")]
    InvalidRange { start: Sample, end: Sample },

    #[error("Failed to export frame {sample} of {layer}: {message}")]
    RenderFailure {
        layer: String,
        sample: Sample,
        message: String,
    },

    #[error("Failed to create {path}: {source}")]
    FilesystemFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Export cancelled by user")]
    Cancelled,
}

impl ExportError {
    pub fn kind(&self) -> ExportErrorKind {
        match self {
            Self::NoExportableLayers | Self::InvalidRange { .. } => {
                ExportErrorKind::NoExportableLayers
            }
            Self::RenderFailure { .. } => ExportErrorKind::RenderFailure,
            Self::FilesystemFailure { .. } => ExportErrorKind::FilesystemFailure,
            Self::Cancelled => ExportErrorKind::Cancelled,
        }
    }

    fn render(layer: &str, sample: Sample, err: impl std::fmt::Display) -> Self {
        Self::RenderFailure {
            layer: layer.to_string(),
            sample,
            message: err.to_string(),
        }
    }
}

/// Everything decided before the first render.
struct ExportPlan<'a, L> {
    info: DocumentInfo,
    scene_name: String,
    scene_dir: PathBuf,
    animated: Vec<(&'a L, BTreeSet<Sample>)>,
    statics: Vec<&'a L>,
    total_units: u64,
}

/// Drives one export of `document` through `backend`.
///
/// Layers are processed one at a time and samples strictly in order; the
/// backend's time cursor is never shared between two in-flight samples.
pub struct SceneExporter<'a, D: SceneDocument, B: RenderBackend<D::Layer>> {
    document: &'a D,
    backend: &'a mut B,
    job: ExportJob,
    progress: Option<ProgressCallback>,
    cancel: Option<CancelCheck>,
    completed: u64,
    total: u64,
}

impl<'a, D, B> SceneExporter<'a, D, B>
where
    D: SceneDocument,
    B: RenderBackend<D::Layer>,
{
    pub fn new(document: &'a D, backend: &'a mut B, job: ExportJob) -> Self {
        Self {
            document,
            backend,
            job,
            progress: None,
            cancel: None,
            completed: 0,
            total: 0,
        }
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelCheck) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Run the export. Failures are reported on the returned report; files
    /// written before a failure are left in place.
    pub fn export(mut self) -> ExportReport {
        let started = std::time::Instant::now();
        let mut report = ExportReport::default();

        tracing::info!(
            root = %self.job.export_root.display(),
            backend = self.backend.name(),
            "Starting export"
        );

        match self.run(&mut report) {
            Ok(()) => {
                report.success = true;
                self.emit(ExportStage::Complete, "Export complete".to_string());
                tracing::info!(
                    layers = report.layers.len(),
                    drawings = report.assets_rendered,
                    elapsed_secs = started.elapsed().as_secs_f64(),
                    "Export finished"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, kind = ?err.kind(), "Export aborted");
                report.success = false;
                report.error = Some(err.to_string());
                report.error_kind = Some(err.kind());
                self.emit(ExportStage::Failed, err.to_string());
            }
        }

        report
    }

    fn run(&mut self, report: &mut ExportReport) -> Result<(), ExportError> {
        let plan = self.build_plan()?;
        report.scene_path = plan
            .scene_dir
            .join(format!("{}.{SCENE_EXTENSION}", plan.scene_name));

        self.total = plan.total_units;
        self.emit(
            ExportStage::Preparing,
            format!(
                "Exporting {} animated and {} static layers",
                plan.animated.len(),
                plan.statics.len()
            ),
        );

        let mut names = NameRegistry::new();

        for (layer, keys) in &plan.animated {
            let record = self.export_animated(&plan, *layer, keys, &mut names, report)?;
            report.layers.push(record);
        }

        for layer in &plan.statics {
            let record = self.export_static(&plan, *layer, &mut names, report)?;
            report.layers.push(record);
        }

        Ok(())
    }

    fn build_plan(&self) -> Result<ExportPlan<'a, D::Layer>, ExportError> {
        let document = self.document;
        let options = &self.job.options;
        let info = document.info();
        if info.range.is_empty() || !info.range.fits_rows() {
            return Err(ExportError::InvalidRange {
                start: info.range.start,
                end: info.range.end,
            });
        }

        let scene_name = resolve_scene_name(options.scene_name.as_deref(), &info.name);
        let scene_dir = self.job.export_root.join(&scene_name);
        ensure_dir(&scene_dir)?;

        let filter = InclusionFilter::from_options(options);
        let animated_layers = collect_candidates(
            document.root(),
            &filter,
            options.flatten_groups,
            Classification::Animated,
        );
        let statics = if options.include_static {
            collect_candidates(document.root(), &filter, false, Classification::Static)
        } else {
            Vec::new()
        };

        if animated_layers.is_empty() && statics.is_empty() {
            return Err(ExportError::NoExportableLayers);
        }

        let animated: Vec<_> = animated_layers
            .into_iter()
            .map(|layer| (layer, collect_keyframes(layer, info.range)))
            .collect();
        let total_keys: u64 = animated.iter().map(|(_, keys)| keys.len() as u64).sum();
        let total_units = total_keys + statics.len() as u64;

        tracing::info!(
            scene = %scene_name,
            start = info.range.start,
            end = info.range.end,
            animated = animated.len(),
            statics = statics.len(),
            keyframes = total_keys,
            "Export planned"
        );

        Ok(ExportPlan {
            info,
            scene_name,
            scene_dir,
            animated,
            statics,
            total_units,
        })
    }

    fn export_animated(
        &mut self,
        plan: &ExportPlan<'a, D::Layer>,
        layer: &D::Layer,
        keys: &BTreeSet<Sample>,
        names: &mut NameRegistry,
        report: &mut ExportReport,
    ) -> Result<LayerExportRecord, ExportError> {
        let name = names.unique_name(&sanitize_filename(layer.name()));
        let folder = plan.scene_dir.join(&name);
        ensure_dir(&folder)?;

        tracing::info!(layer = %name, keyframes = keys.len(), "Exporting animated layer");

        let mut record = LayerExportRecord::new(
            name.clone(),
            folder.clone(),
            self.job.options.level_kind,
            ASSET_EXTENSION,
        );
        let mut cache = DedupCache::new();
        let range = plan.info.range;
        let mut timeline = ExposureTimeline::new(&mut record, range);

        for sample in range.samples() {
            if !keys.contains(&sample) {
                timeline.advance(sample, None);
                continue;
            }

            self.check_cancelled()?;
            let content = self.resolve_key(layer, &name, &folder, sample, &mut cache, report)?;
            timeline.advance(sample, Some(content));

            self.completed += 1;
            self.emit(
                ExportStage::Animated,
                format!("Exporting {name} - frame {sample}"),
            );
        }

        tracing::debug!(layer = %name, drawings = cache.len(), "Animated layer done");
        Ok(record)
    }

    /// Seek, classify, fingerprint, and render a keyframe if its drawing is new.
    fn resolve_key(
        &mut self,
        layer: &D::Layer,
        name: &str,
        folder: &Path,
        sample: Sample,
        cache: &mut DedupCache,
        report: &mut ExportReport,
    ) -> Result<KeyContent, ExportError> {
        self.backend
            .seek(sample)
            .map_err(|e| ExportError::render(name, sample, e))?;

        let bounds = self
            .backend
            .bounds(layer)
            .map_err(|e| ExportError::render(name, sample, e))?;
        if bounds.is_empty() {
            tracing::debug!(layer = %name, sample, "Stop frame");
            return Ok(KeyContent::Stop);
        }

        let pixels = self
            .backend
            .pixel_data(layer)
            .map_err(|e| ExportError::render(name, sample, e))?;
        let fingerprint = ContentFingerprint::of(&pixels);
        let resolution = cache.resolve(fingerprint);

        if resolution.is_new {
            let path = folder.join(asset_file_name(name, resolution.asset_id, ASSET_EXTENSION));
            self.backend
                .render(layer, sample, &path)
                .map_err(|e| ExportError::render(name, sample, e))?;
            report.assets_rendered += 1;
            tracing::debug!(
                layer = %name,
                sample,
                drawing = %resolution.asset_id,
                fingerprint = %fingerprint,
                "Rendered new drawing"
            );
        } else {
            tracing::debug!(
                layer = %name,
                sample,
                drawing = %resolution.asset_id,
                "Reused drawing"
            );
        }

        Ok(KeyContent::Asset(resolution.asset_id))
    }

    fn export_static(
        &mut self,
        plan: &ExportPlan<'a, D::Layer>,
        layer: &D::Layer,
        names: &mut NameRegistry,
        report: &mut ExportReport,
    ) -> Result<LayerExportRecord, ExportError> {
        self.check_cancelled()?;

        let name = names.unique_name(&sanitize_filename(layer.name()));
        let folder = plan.scene_dir.join(&name);
        ensure_dir(&folder)?;

        let range = plan.info.range;
        let path = folder.join(asset_file_name(&name, AssetId::FIRST, ASSET_EXTENSION));
        self.backend
            .seek(range.start)
            .map_err(|e| ExportError::render(&name, range.start, e))?;
        self.backend
            .render(layer, range.start, &path)
            .map_err(|e| ExportError::render(&name, range.start, e))?;
        report.assets_rendered += 1;

        let mut record = LayerExportRecord::new(
            name.clone(),
            folder,
            self.job.options.level_kind,
            ASSET_EXTENSION,
        );
        hold_for_range(&mut record, range, AssetId::FIRST);

        self.completed += 1;
        self.emit(
            ExportStage::Static,
            format!("Exporting static layer {name}"),
        );
        tracing::info!(layer = %name, rows = record.exposures().len(), "Exported static layer");

        Ok(record)
    }

    fn check_cancelled(&self) -> Result<(), ExportError> {
        match &self.cancel {
            Some(cancelled) if cancelled() => Err(ExportError::Cancelled),
            _ => Ok(()),
        }
    }

    fn emit(&self, stage: ExportStage, message: String) {
        if let Some(cb) = &self.progress {
            cb(ExportProgress {
                completed: self.completed,
                total: self.total,
                message,
                stage,
            });
        }
    }
}

/// Explicit name if given, else the document name, else [`DEFAULT_SCENE_NAME`].
pub fn resolve_scene_name(explicit: Option<&str>, document_name: &str) -> String {
    match explicit.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => sanitize_filename(name),
        None if document_name.trim().is_empty() => DEFAULT_SCENE_NAME.to_string(),
        None => sanitize_filename(document_name),
    }
}

/// Create `path` and its parents. An existing directory is not an error.
fn ensure_dir(path: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(path).map_err(|source| ExportError::FilesystemFailure {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_name_prefers_explicit() {
        assert_eq!(resolve_scene_name(Some("Shot 010"), "walk.kra"), "Shot_010");
    }

    #[test]
    fn test_scene_name_falls_back_to_document() {
        assert_eq!(resolve_scene_name(None, "walk cycle"), "walk_cycle");
        assert_eq!(resolve_scene_name(Some("   "), "walk"), "walk");
    }

    #[test]
    fn test_scene_name_defaults_to_untitled() {
        assert_eq!(resolve_scene_name(None, ""), "Untitled");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ExportError::Cancelled.kind(), ExportErrorKind::Cancelled);
        assert_eq!(
            ExportError::render("Ink", 4, "boom").kind(),
            ExportErrorKind::RenderFailure
        );
        assert_eq!(
            ExportError::render("Ink", 4, "boom").to_string(),
            "Failed to export frame 4 of Ink: boom"
        );
    }

    #[test]
    fn test_invalid_range_reports_no_exportable_layers() {
        let err = ExportError::InvalidRange { start: 5, end: 3 };
        assert_eq!(err.kind(), ExportErrorKind::NoExportableLayers);
        assert_eq!(err.to_string(), "Frame range 5..=3 has no exportable rows");
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let dir = std::env::temp_dir().join("toonport_test_ensure_dir");
        let _ = std::fs::remove_dir_all(&dir);
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_ensure_dir_over_file_is_filesystem_failure() {
        let path = std::env::temp_dir().join("toonport_test_ensure_dir_file");
        let _ = std::fs::remove_dir_all(&path);
        std::fs::write(&path, b"not a dir").unwrap();
        let err = ensure_dir(&path).unwrap_err();
        assert_eq!(err.kind(), ExportErrorKind::FilesystemFailure);
        std::fs::remove_file(&path).ok();
    }
}
