//! Layer capability trait and the small value types it exposes.

use serde::{Deserialize, Serialize};

use crate::document::Sample;

/// Closed set of layer kinds the exporter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    #[default]
    Paint,
    Group,
}

/// Color label attached to a layer in the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorLabel(pub u8);

impl ColorLabel {
    pub const NONE: Self = Self(0);

    /// Grey label marking animation guides (roughs, layouts).
    pub const REFERENCE: Self = Self(8);

    pub fn is_reference(self) -> bool {
        self == Self::REFERENCE
    }
}

/// Axis-aligned content bounds in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    pub const EMPTY: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero width or zero height. This is the only stop-frame signal.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Smallest bounds containing both; empty operands are ignored.
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x0 = self.x.min(other.x) as i64;
        let y0 = self.y.min(other.y) as i64;
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Self {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        }
    }

    fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }
}

/// Read-only view of one node in the host's layer tree.
///
/// Time-varying content (bounds, pixels) depends on the host's shared time
/// cursor and is queried through the render backend instead.
pub trait LayerNode {
    fn name(&self) -> &str;

    fn kind(&self) -> LayerKind;

    fn visible(&self) -> bool;

    fn color_label(&self) -> ColorLabel;

    /// Whether the host reports animation data on this layer.
    fn is_animated(&self) -> bool;

    /// Whether a keyframe is declared at `sample`.
    fn has_sample_at(&self, sample: Sample) -> bool;

    /// Child layers ordered back to front (bottom layer first).
    fn children(&self) -> &[Self]
    where
        Self: Sized;

    fn is_group(&self) -> bool {
        self.kind() == LayerKind::Group
    }
}
