//! Document descriptor and the host document seam.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::layer::LayerNode;

/// A discrete time unit on the document timeline.
pub type Sample = i64;

/// Most rows an exposure column can address.
pub const MAX_ROWS: u64 = u32::MAX as u64 + 1;

/// Inclusive range of samples to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: Sample,
    pub end: Sample,
}

impl FrameRange {
    pub fn new(start: Sample, end: Sample) -> Self {
        Self { start, end }
    }

    /// Number of samples in the range (0 when `end < start`).
    pub fn len(&self) -> u64 {
        if self.end < self.start {
            0
        } else {
            self.end.abs_diff(self.start).saturating_add(1)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, sample: Sample) -> bool {
        sample >= self.start && sample <= self.end
    }

    /// Every sample in order, start first.
    pub fn samples(&self) -> RangeInclusive<Sample> {
        self.start..=self.end
    }

    /// Row index of `sample` relative to the range start.
    ///
    /// `None` outside the range and past the last addressable row.
    pub fn row_of(&self, sample: Sample) -> Option<u32> {
        if self.contains(sample) {
            u32::try_from(sample.abs_diff(self.start)).ok()
        } else {
            None
        }
    }

    /// Whether every sample maps to a row.
    pub fn fits_rows(&self) -> bool {
        self.len() <= MAX_ROWS
    }
}

/// Snapshot of the document properties needed for export.
///
/// Read once when an export starts and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub range: FrameRange,
    pub frame_rate: f64,
}

impl DocumentInfo {
    /// `end - start + 1`.
    pub fn duration(&self) -> u64 {
        self.range.len()
    }
}

/// Read access to a host document.
pub trait SceneDocument {
    type Layer: LayerNode;

    fn info(&self) -> DocumentInfo;

    /// Invisible root whose children are the top-level layers.
    fn root(&self) -> &Self::Layer;
}
