//! Toonport Export Engine
//!
//! Plans and drives the export of a layered animation into per-layer drawing
//! sequences plus an xsheet exposure timeline.
//!
//! # Pipeline Architecture
//!
//! ```text
//! layer tree ──┐
//!              ├── Inclusion Filter + Tree Walker
//! options ─────┘         │
//!                        ├── animated units ── Keyframe Collector
//!                        │                            │
//!                        │            per keyframe: seek ─ bounds ─ pixels
//!                        │                            │
//!                        │                     Dedup Cache (BLAKE3)
//!                        │                            │
//!                        │               render only new drawings
//!                        │                            │
//!                        │                  Exposure Timeline (holds/stops)
//!                        │
//!                        └── static units ── render once, hold whole range
//!                                                     │
//!                                                     ▼
//!                                               ExportReport
//! ```

pub mod backend;
pub mod dedup;
pub mod export;
pub mod filter;
pub mod keyframes;
pub mod manifest;
pub mod naming;
pub mod timeline;
pub mod walker;

pub use export::*;
