use crate::{
    core::{Disposal, Raster, Rect, SourceFrame, TRANSPARENT},
    error::{GifscaleError, GifscaleResult},
};

/// Alpha at or above this threshold counts as opaque. GIF sources carry
/// binary transparency, so in practice alpha is 0 or 255.
const OPAQUE_THRESHOLD: u8 = 128;

/// The accumulator canvas: a persistent full-size raster that always reflects
/// the composited visual state of the animation at the current frame.
///
/// Partial frames are drawn onto it at their declared offsets, so the resize
/// stage always sees a complete raster and never resamples a small update
/// rectangle against missing neighbors.
///
/// One instance per run; never shared across runs.
#[derive(Clone, Debug)]
pub struct AccumCanvas {
    raster: Raster,
    /// Canvas state saved before compositing a `RestorePrevious` frame,
    /// restored by [`AccumCanvas::dispose`].
    saved: Option<Raster>,
}

impl AccumCanvas {
    /// Allocates a canvas with fully transparent background content.
    pub fn new(width: u32, height: u32) -> GifscaleResult<Self> {
        Ok(Self {
            raster: Raster::new(width, height)?,
            saved: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Draws `frame.pixels` onto the canvas at `frame.bounds`, replacing the
    /// destination wherever the source is opaque and leaving it untouched
    /// wherever the source is transparent.
    ///
    /// Bounds are checked before any pixel is written, so a failing frame
    /// leaves the canvas exactly as the previous frame left it.
    pub fn composite(&mut self, frame: &SourceFrame) -> GifscaleResult<()> {
        let b = frame.bounds;
        if !b.fits_within(self.raster.width(), self.raster.height()) {
            return Err(GifscaleError::out_of_bounds(format!(
                "frame bounds {}x{} at ({},{}) exceed canvas {}x{}",
                b.width,
                b.height,
                b.x,
                b.y,
                self.raster.width(),
                self.raster.height()
            )));
        }

        if frame.disposal == Disposal::RestorePrevious {
            self.saved = Some(self.raster.clone());
        }

        for row in 0..b.height {
            for col in 0..b.width {
                let src = frame.pixels.get(col, row);
                if src[3] >= OPAQUE_THRESHOLD {
                    self.raster.put(b.x + col, b.y + row, src);
                }
            }
        }
        Ok(())
    }

    /// A value copy of the current canvas contents, decoupled from subsequent
    /// mutation. The resize stage must not observe later composites.
    pub fn snapshot(&self) -> Raster {
        self.raster.clone()
    }

    /// Applies `frame`'s disposal policy. Call after taking the frame's
    /// snapshot and before compositing the next frame.
    pub fn dispose(&mut self, frame: &SourceFrame) {
        match frame.disposal {
            Disposal::Keep => {}
            Disposal::RestoreBackground => self.clear_rect(frame.bounds),
            Disposal::RestorePrevious => {
                if let Some(prev) = self.saved.take() {
                    self.raster = prev;
                }
            }
        }
    }

    fn clear_rect(&mut self, rect: Rect) {
        for row in 0..rect.height {
            for col in 0..rect.width {
                self.raster.put(rect.x + col, rect.y + row, TRANSPARENT);
            }
        }
    }
}
