//! Exposure timeline construction with hold and stop-frame semantics.
//!
//! A layer's xsheet column is built one sample at a time. Keyframes either
//! expose a drawing or, when blank, stop the current hold. Every other sample
//! repeats whatever the previous sample showed, including nothing.

use toonport_scene_model::document::{FrameRange, Sample};
use toonport_scene_model::report::{AssetId, LayerExportRecord};

/// What a keyframe resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContent {
    /// Blank keyframe: ends the current hold without replacing it.
    Stop,
    /// Drawing to expose from this sample on.
    Asset(AssetId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExposureState {
    #[default]
    NoExposure,
    Held(AssetId),
}

/// Appends one layer's cells to its record while walking the range in order.
#[derive(Debug)]
pub struct ExposureTimeline<'r> {
    record: &'r mut LayerExportRecord,
    range: FrameRange,
    state: ExposureState,
    last_sample: Option<Sample>,
}

impl<'r> ExposureTimeline<'r> {
    pub fn new(record: &'r mut LayerExportRecord, range: FrameRange) -> Self {
        Self {
            record,
            range,
            state: ExposureState::NoExposure,
            last_sample: None,
        }
    }

    pub fn state(&self) -> ExposureState {
        self.state
    }

    /// Advance to `sample`. `key` is `Some` only when `sample` is a keyframe.
    ///
    /// Samples must be visited in increasing order; samples outside the range
    /// are ignored.
    pub fn advance(&mut self, sample: Sample, key: Option<KeyContent>) {
        debug_assert!(
            self.last_sample.map_or(true, |last| sample > last),
            "timeline samples must increase"
        );
        let Some(row) = self.range.row_of(sample) else {
            return;
        };
        self.last_sample = Some(sample);

        match key {
            Some(KeyContent::Stop) => self.state = ExposureState::NoExposure,
            Some(KeyContent::Asset(asset_id)) => self.state = ExposureState::Held(asset_id),
            None => {}
        }

        if let ExposureState::Held(asset_id) = self.state {
            self.record.expose(row, asset_id);
        }
    }
}

/// Expose `asset_id` on every row of `range`, as for a static layer.
pub fn hold_for_range(record: &mut LayerExportRecord, range: FrameRange, asset_id: AssetId) {
    let mut timeline = ExposureTimeline::new(record, range);
    let mut key = Some(KeyContent::Asset(asset_id));
    for sample in range.samples() {
        timeline.advance(sample, key.take());
    }
}
