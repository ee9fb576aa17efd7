//! Render backend seam.
//!
//! The host keeps one process-wide time cursor. Content queries and renders
//! only make sense after [`RenderBackend::seek`] has moved the cursor and
//! the host has settled, so the engine drives every sample strictly in
//! sequence through this trait.

use std::path::Path;

use toonport_common::error::{ToonportError, ToonportResult};
use toonport_scene_model::document::Sample;
use toonport_scene_model::layer::{Bounds, LayerNode};
use toonport_scene_model::memory::{MemoryDocument, MemoryLayer};

/// Host-side rendering for layers of type `L`.
pub trait RenderBackend<L: LayerNode> {
    /// Backend name.
    fn name(&self) -> &str;

    /// Move the shared time cursor to `sample` and wait for the host to settle.
    fn seek(&mut self, sample: Sample) -> ToonportResult<()>;

    /// Content bounds of `layer` at the cursor.
    fn bounds(&self, layer: &L) -> ToonportResult<Bounds>;

    /// Raw canvas-sized pixels of `layer` at the cursor.
    fn pixel_data(&self, layer: &L) -> ToonportResult<Vec<u8>>;

    /// Write the drawing of `layer` at `sample` to `destination`.
    /// The cursor must already be at `sample`.
    fn render(&mut self, layer: &L, sample: Sample, destination: &Path) -> ToonportResult<()>;
}

/// Renders [`MemoryDocument`] layers to RGBA PNG files.
#[derive(Debug)]
pub struct PngBackend<'d> {
    document: &'d MemoryDocument,
    cursor: Option<Sample>,
}

impl<'d> PngBackend<'d> {
    pub fn new(document: &'d MemoryDocument) -> Self {
        Self {
            document,
            cursor: None,
        }
    }

    pub fn cursor(&self) -> Option<Sample> {
        self.cursor
    }

    fn current(&self) -> ToonportResult<Sample> {
        self.cursor
            .ok_or_else(|| ToonportError::render("Time cursor has not been positioned"))
    }
}

impl<'d> RenderBackend<MemoryLayer> for PngBackend<'d> {
    fn name(&self) -> &str {
        "png"
    }

    fn seek(&mut self, sample: Sample) -> ToonportResult<()> {
        self.cursor = Some(sample);
        Ok(())
    }

    fn bounds(&self, layer: &MemoryLayer) -> ToonportResult<Bounds> {
        Ok(layer.bounds_at(self.current()?))
    }

    fn pixel_data(&self, layer: &MemoryLayer) -> ToonportResult<Vec<u8>> {
        let sample = self.current()?;
        Ok(layer.rasterize_at(sample, self.document.width, self.document.height))
    }

    fn render(
        &mut self,
        layer: &MemoryLayer,
        sample: Sample,
        destination: &Path,
    ) -> ToonportResult<()> {
        let cursor = self.current()?;
        if cursor != sample {
            return Err(ToonportError::render(format!(
                "Render of '{}' requested at {sample} but cursor is at {cursor}",
                layer.name
            )));
        }

        let pixels = self.pixel_data(layer)?;
        let image = image::RgbaImage::from_raw(self.document.width, self.document.height, pixels)
            .ok_or_else(|| ToonportError::render("Pixel buffer does not match canvas size"))?;
        image
            .save_with_format(destination, image::ImageFormat::Png)
            .map_err(|e| {
                ToonportError::render(format!(
                    "Failed to write {}: {e}",
                    destination.display()
                ))
            })?;

        tracing::trace!(
            layer = %layer.name,
            sample,
            path = %destination.display(),
            "Wrote drawing"
        );
        Ok(())
    }
}
