//! Toonport Scene Model
//!
//! Defines the data contracts shared by the export engine and its hosts:
//! - **Document:** Immutable descriptor (canvas size, frame range, frame rate)
//! - **Layer:** Narrow capability trait over the host's layer tree
//! - **Options:** Layer-selection policy for one export
//! - **Report:** Per-layer exposure records and the final export report
//! - **Memory:** A serde-backed in-memory document used by the CLI and tests
//!
//! Samples are absolute document frames; rows are samples relative to the
//! start of the export range.

pub mod document;
pub mod layer;
pub mod memory;
pub mod options;
pub mod report;

pub use document::*;
pub use layer::*;
pub use memory::*;
pub use options::*;
pub use report::*;
