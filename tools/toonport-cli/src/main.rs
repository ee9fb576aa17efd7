//! Toonport CLI: command-line interface for layered animation export.
//!
//! Usage:
//!   toonport init <NAME>          Write a sample document
//!   toonport info <PATH>          Show document information and export order
//!   toonport validate <PATH>      Validate a document
//!   toonport export <PATH>        Export drawings and exposure timelines

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use toonport_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "toonport",
    about = "Export layered animations as drawing sequences and xsheet timelines",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample document to start from
    Init {
        /// Document name
        name: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Canvas width
        #[arg(long, default_value = "64")]
        width: u32,

        /// Canvas height
        #[arg(long, default_value = "64")]
        height: u32,

        /// First sample of the playback range
        #[arg(long, default_value = "0")]
        start: i64,

        /// Last sample of the playback range (inclusive)
        #[arg(long, default_value = "11")]
        end: i64,

        /// Frame rate
        #[arg(long, default_value = "24")]
        fps: f64,
    },

    /// Show document information and the export order
    Info {
        /// Path to the document JSON
        path: PathBuf,
    },

    /// Validate a document
    Validate {
        /// Path to the document JSON
        path: PathBuf,
    },

    /// Export drawings and exposure timelines
    Export {
        /// Path to the document JSON
        path: PathBuf,

        /// Export root directory (defaults to the configured root)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scene name (defaults to the document name)
        #[arg(long)]
        scene_name: Option<String>,

        /// Export hidden layers
        #[arg(long, overrides_with = "no_include_invisible")]
        include_invisible: bool,

        /// Skip hidden layers
        #[arg(long, overrides_with = "include_invisible")]
        no_include_invisible: bool,

        /// Export layers carrying the reference colour label
        #[arg(long, overrides_with = "no_include_reference")]
        include_reference: bool,

        /// Skip layers carrying the reference colour label
        #[arg(long, overrides_with = "include_reference")]
        no_include_reference: bool,

        /// Export layers without keyframes as single held drawings
        #[arg(long, overrides_with = "no_include_static")]
        include_static: bool,

        /// Skip layers without keyframes
        #[arg(long, overrides_with = "include_static")]
        no_include_static: bool,

        /// Export animated groups as one composited level
        #[arg(long, overrides_with = "no_flatten_groups")]
        flatten_groups: bool,

        /// Export the children of animated groups separately
        #[arg(long, overrides_with = "flatten_groups")]
        no_flatten_groups: bool,

        /// Advertised level type: raster|toonz_raster|vector
        #[arg(long)]
        level_kind: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    toonport_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Init {
            name,
            output,
            width,
            height,
            start,
            end,
            fps,
        } => commands::init::run(name, output, width, height, start, end, fps),
        Commands::Info { path } => commands::info::run(path),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Export {
            path,
            output,
            scene_name,
            include_invisible,
            no_include_invisible,
            include_reference,
            no_include_reference,
            include_static,
            no_include_static,
            flatten_groups,
            no_flatten_groups,
            level_kind,
        } => commands::export::run(
            &config,
            path,
            commands::export::ExportArgs {
                output,
                scene_name,
                include_invisible: toggle(include_invisible, no_include_invisible),
                include_reference: toggle(include_reference, no_include_reference),
                include_static: toggle(include_static, no_include_static),
                flatten_groups: toggle(flatten_groups, no_flatten_groups),
                level_kind,
            },
        ),
    }
}

/// `--x` / `--no-x` pair: `None` when neither was given.
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}
