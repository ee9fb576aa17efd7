//! Export a document's drawings and exposure timelines.

use std::io::Write;
use std::path::PathBuf;

use toonport_common::config::{AppConfig, ExportDefaults};
use toonport_export_engine::backend::PngBackend;
use toonport_export_engine::export::{ExportJob, ExportProgress, ProgressCallback, SceneExporter};
use toonport_export_engine::manifest::{manifest_path, write_manifest};
use toonport_scene_model::memory::MemoryDocument;
use toonport_scene_model::options::{ExportOptions, LevelKind};

/// Per-invocation overrides of the configured export defaults.
/// `None` keeps the configured value.
#[derive(Debug, Default)]
pub struct ExportArgs {
    pub output: Option<PathBuf>,
    pub scene_name: Option<String>,
    pub include_invisible: Option<bool>,
    pub include_reference: Option<bool>,
    pub include_static: Option<bool>,
    pub flatten_groups: Option<bool>,
    pub level_kind: Option<String>,
}

/// Layer-selection options for this run: flags first, then config.
fn resolve_options(defaults: &ExportDefaults, args: &ExportArgs) -> anyhow::Result<ExportOptions> {
    let level_kind: LevelKind = args
        .level_kind
        .as_deref()
        .unwrap_or(&defaults.level_kind)
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    Ok(ExportOptions {
        include_invisible: args.include_invisible.unwrap_or(defaults.include_invisible),
        include_reference: args.include_reference.unwrap_or(defaults.include_reference),
        include_static: args.include_static.unwrap_or(defaults.include_static),
        flatten_groups: args.flatten_groups.unwrap_or(defaults.flatten_groups),
        scene_name: args.scene_name.clone(),
        level_kind,
    })
}

pub fn run(config: &AppConfig, path: PathBuf, args: ExportArgs) -> anyhow::Result<()> {
    println!("Exporting document at: {}", path.display());

    let document =
        MemoryDocument::load(&path).map_err(|e| anyhow::anyhow!("Failed to load document: {e}"))?;

    let options = resolve_options(&config.export, &args)?;
    let level_kind = options.level_kind;
    let export_root = args.output.unwrap_or_else(|| config.export_root.clone());

    println!("  Export root: {}", export_root.display());
    println!("  Level kind: {level_kind}");
    tracing::debug!(?options, "Resolved export options");

    let job = ExportJob {
        export_root,
        options,
    };

    let progress_cb: ProgressCallback = Box::new(|p: ExportProgress| {
        print!(
            "\r  Progress: {}/{} {}                    ",
            p.completed, p.total, p.message
        );
        let _ = std::io::stdout().flush();
    });

    let mut backend = PngBackend::new(&document);
    let report = SceneExporter::new(&document, &mut backend, job)
        .with_progress(progress_cb)
        .export();
    println!();

    if !report.success {
        anyhow::bail!("{report}");
    }

    let manifest = manifest_path(&report)?;
    write_manifest(&report, &manifest)?;

    println!("{report}");
    println!("  Scene: {}", report.scene_path.display());
    println!("  Manifest: {}", manifest.display());
    for layer in &report.layers {
        println!(
            "  {}: {} drawings, {} exposed rows",
            layer.name,
            layer.asset_count(),
            layer.exposures().len()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn everything_on() -> ExportDefaults {
        ExportDefaults {
            include_invisible: true,
            include_reference: true,
            include_static: true,
            flatten_groups: true,
            level_kind: "vector".to_string(),
        }
    }

    #[test]
    fn test_unset_flags_keep_config() {
        let options = resolve_options(&everything_on(), &ExportArgs::default()).unwrap();
        assert!(options.include_invisible);
        assert!(options.include_reference);
        assert!(options.include_static);
        assert!(options.flatten_groups);
        assert_eq!(options.level_kind, LevelKind::Vector);
    }

    #[test]
    fn test_flags_turn_config_off() {
        let args = ExportArgs {
            include_invisible: Some(false),
            include_reference: Some(false),
            include_static: Some(false),
            flatten_groups: Some(false),
            level_kind: Some("raster".to_string()),
            ..ExportArgs::default()
        };
        let options = resolve_options(&everything_on(), &args).unwrap();
        assert!(!options.include_invisible);
        assert!(!options.include_reference);
        assert!(!options.include_static);
        assert!(!options.flatten_groups);
        assert_eq!(options.level_kind, LevelKind::Raster);
    }

    #[test]
    fn test_flags_turn_config_on() {
        let defaults = ExportDefaults {
            flatten_groups: false,
            ..ExportDefaults::default()
        };
        let args = ExportArgs {
            include_static: Some(true),
            flatten_groups: Some(true),
            ..ExportArgs::default()
        };
        let options = resolve_options(&defaults, &args).unwrap();
        assert!(options.include_static);
        assert!(options.flatten_groups);
        assert!(!options.include_invisible);
    }

    #[test]
    fn test_unknown_level_kind_is_rejected() {
        let args = ExportArgs {
            level_kind: Some("bitmap".to_string()),
            ..ExportArgs::default()
        };
        assert!(resolve_options(&ExportDefaults::default(), &args).is_err());
    }
}
