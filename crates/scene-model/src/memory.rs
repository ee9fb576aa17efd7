//! Serde-backed in-memory layered animation.
//!
//! A [`MemoryDocument`] is the reference host model: each paint layer holds
//! solid-colour cels keyed by sample, content is held between keyframes, and
//! groups composite their visible children back to front. Documents are stored
//! as JSON:
//!
//! ```json
//! {
//!   "name": "walk",
//!   "width": 64, "height": 64,
//!   "range": { "start": 0, "end": 7 },
//!   "frame_rate": 24.0,
//!   "layers": [
//!     { "name": "BG", "content": { "x": 0, "y": 0, "width": 64, "height": 64, "rgba": [255, 255, 255, 255] } },
//!     { "name": "Ink", "keyframes": { "2": { "x": 8, "y": 8, "width": 4, "height": 4, "rgba": [0, 0, 0, 255] } } }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::document::{DocumentInfo, FrameRange, Sample, SceneDocument};
use crate::layer::{Bounds, ColorLabel, LayerKind, LayerNode};

const BYTES_PER_PIXEL: usize = 4;

/// A solid-colour rectangle. A zero-extent cel is a blank keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cel {
    #[serde(flatten)]
    pub bounds: Bounds,
    pub rgba: [u8; 4],
}

impl Cel {
    pub fn solid(bounds: Bounds, rgba: [u8; 4]) -> Self {
        Self { bounds, rgba }
    }

    pub fn blank() -> Self {
        Self {
            bounds: Bounds::EMPTY,
            rgba: [0; 4],
        }
    }

    pub fn is_blank(&self) -> bool {
        self.bounds.is_empty()
    }
}

/// One node of a [`MemoryDocument`] layer tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryLayer {
    pub name: String,

    #[serde(default)]
    pub kind: LayerKind,

    #[serde(default = "default_visible")]
    pub visible: bool,

    #[serde(default, skip_serializing_if = "is_unlabelled")]
    pub color_label: ColorLabel,

    /// Drawings keyed by the sample where they start.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keyframes: BTreeMap<Sample, Cel>,

    /// Drawing of a non-animated paint layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Cel>,

    /// Ordered back to front.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MemoryLayer>,
}

fn default_visible() -> bool {
    true
}

fn is_unlabelled(label: &ColorLabel) -> bool {
    *label == ColorLabel::NONE
}

impl MemoryLayer {
    pub fn paint(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Paint,
            visible: true,
            color_label: ColorLabel::NONE,
            keyframes: BTreeMap::new(),
            content: None,
            children: Vec::new(),
        }
    }

    /// A group whose `children` are given back to front.
    pub fn group(name: impl Into<String>, children: Vec<MemoryLayer>) -> Self {
        Self {
            kind: LayerKind::Group,
            children,
            ..Self::paint(name)
        }
    }

    pub fn with_key(mut self, sample: Sample, cel: Cel) -> Self {
        self.keyframes.insert(sample, cel);
        self
    }

    pub fn with_content(mut self, cel: Cel) -> Self {
        self.content = Some(cel);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn labelled(mut self, label: ColorLabel) -> Self {
        self.color_label = label;
        self
    }

    /// Cel showing at `sample`: the latest keyframe at or before it, or the
    /// static content for non-animated layers.
    pub fn cel_at(&self, sample: Sample) -> Option<&Cel> {
        if self.keyframes.is_empty() {
            return self.content.as_ref();
        }
        self.keyframes
            .range(..=sample)
            .next_back()
            .map(|(_, cel)| cel)
    }

    /// Content bounds at `sample`. Groups report the union over visible children.
    pub fn bounds_at(&self, sample: Sample) -> Bounds {
        match self.kind {
            LayerKind::Paint => self
                .cel_at(sample)
                .map(|cel| cel.bounds)
                .unwrap_or(Bounds::EMPTY),
            LayerKind::Group => self
                .children
                .iter()
                .filter(|child| child.visible)
                .fold(Bounds::EMPTY, |acc, child| acc.union(child.bounds_at(sample))),
        }
    }

    /// Full-canvas RGBA8 projection at `sample`.
    pub fn rasterize_at(&self, sample: Sample, width: u32, height: u32) -> Vec<u8> {
        let mut pixels = vec![0u8; width as usize * height as usize * BYTES_PER_PIXEL];
        self.paint_into(sample, width, height, &mut pixels);
        pixels
    }

    fn paint_into(&self, sample: Sample, width: u32, height: u32, pixels: &mut [u8]) {
        match self.kind {
            LayerKind::Paint => {
                if let Some(cel) = self.cel_at(sample) {
                    fill_rect(cel, width, height, pixels);
                }
            }
            LayerKind::Group => {
                for child in self.children.iter().filter(|c| c.visible) {
                    child.paint_into(sample, width, height, pixels);
                }
            }
        }
    }

    fn validate_into(&self, path: &str, range: FrameRange, problems: &mut Vec<String>) {
        let path = if path.is_empty() {
            self.name.clone()
        } else {
            format!("{path}/{}", self.name)
        };

        match self.kind {
            LayerKind::Paint => {
                if !self.children.is_empty() {
                    problems.push(format!("Paint layer '{path}' has child layers"));
                }
                if !self.keyframes.is_empty() && self.content.is_some() {
                    problems.push(format!(
                        "Paint layer '{path}' has both keyframes and static content"
                    ));
                }
                for sample in self.keyframes.keys() {
                    if !range.contains(*sample) {
                        problems.push(format!(
                            "Layer '{path}' has a keyframe at {sample}, outside {}..={}",
                            range.start, range.end
                        ));
                    }
                }
            }
            LayerKind::Group => {
                if !self.keyframes.is_empty() || self.content.is_some() {
                    problems.push(format!("Group layer '{path}' carries its own drawings"));
                }
                for child in &self.children {
                    child.validate_into(&path, range, problems);
                }
            }
        }
    }
}

/// Source-over of a solid rectangle, clipped to the canvas.
fn fill_rect(cel: &Cel, width: u32, height: u32, pixels: &mut [u8]) {
    if cel.is_blank() || cel.rgba[3] == 0 {
        return;
    }
    let x0 = (cel.bounds.x as i64).clamp(0, width as i64) as usize;
    let y0 = (cel.bounds.y as i64).clamp(0, height as i64) as usize;
    let x1 = (cel.bounds.x as i64 + cel.bounds.width as i64).clamp(0, width as i64) as usize;
    let y1 = (cel.bounds.y as i64 + cel.bounds.height as i64).clamp(0, height as i64) as usize;

    for y in y0..y1 {
        for x in x0..x1 {
            let i = (y * width as usize + x) * BYTES_PER_PIXEL;
            blend_over(&mut pixels[i..i + BYTES_PER_PIXEL], cel.rgba);
        }
    }
}

fn blend_over(dst: &mut [u8], src: [u8; 4]) {
    let sa = src[3] as u32;
    let da = dst[3] as u32;
    let out_a = sa + da * (255 - sa) / 255;
    if out_a == 0 {
        dst.copy_from_slice(&[0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let sc = src[c] as u32 * sa;
        let dc = dst[c] as u32 * da * (255 - sa) / 255;
        dst[c] = ((sc + dc) / out_a) as u8;
    }
    dst[3] = out_a as u8;
}

impl LayerNode for MemoryLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn color_label(&self) -> ColorLabel {
        self.color_label
    }

    fn is_animated(&self) -> bool {
        self.kind == LayerKind::Paint && !self.keyframes.is_empty()
    }

    fn has_sample_at(&self, sample: Sample) -> bool {
        self.keyframes.contains_key(&sample)
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// An animation document held entirely in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryDocument {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub range: FrameRange,

    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,

    /// Invisible root group; stored as the top-level `layers` array.
    #[serde(rename = "layers", with = "root_layers")]
    pub root: MemoryLayer,
}

fn default_frame_rate() -> f64 {
    24.0
}

mod root_layers {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::MemoryLayer;

    pub fn serialize<S: Serializer>(root: &MemoryLayer, serializer: S) -> Result<S::Ok, S::Error> {
        root.children.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MemoryLayer, D::Error> {
        let layers = Vec::<MemoryLayer>::deserialize(deserializer)?;
        Ok(MemoryLayer::group("root", layers))
    }
}

impl MemoryDocument {
    /// New document whose top-level `layers` are given back to front.
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        range: FrameRange,
        layers: Vec<MemoryLayer>,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            range,
            frame_rate: default_frame_rate(),
            root: MemoryLayer::group("root", layers),
        }
    }

    /// Top-level layers, back to front.
    pub fn layers(&self) -> &[MemoryLayer] {
        &self.root.children
    }

    /// Load a document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref().to_path_buf();
        let json = std::fs::read_to_string(&path).map_err(|e| DocumentError::IoError {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| DocumentError::ParseError { path, source: e })
    }

    /// Save the document as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DocumentError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| DocumentError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| DocumentError::IoError { path, source: e })
    }

    /// Structural problems that would make an export misleading.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = vec![];

        if self.range.is_empty() {
            problems.push(format!(
                "Frame range {}..={} is empty",
                self.range.start, self.range.end
            ));
        } else if !self.range.fits_rows() {
            problems.push(format!(
                "Frame range {}..={} has more samples than an exposure column can hold",
                self.range.start, self.range.end
            ));
        }
        if self.width == 0 || self.height == 0 {
            problems.push(format!("Canvas size {}x{} is empty", self.width, self.height));
        }
        if !(self.frame_rate > 0.0) {
            problems.push(format!("Frame rate {} must be positive", self.frame_rate));
        }
        for layer in self.layers() {
            layer.validate_into("", self.range, &mut problems);
        }

        problems
    }
}

impl SceneDocument for MemoryDocument {
    type Layer = MemoryLayer;

    fn info(&self) -> DocumentInfo {
        DocumentInfo {
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            range: self.range,
            frame_rate: self.frame_rate,
        }
    }

    fn root(&self) -> &MemoryLayer {
        &self.root
    }
}

/// Errors that can occur when loading or saving a [`MemoryDocument`].
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}
