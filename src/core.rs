use crate::error::{GifscaleError, GifscaleResult};

/// Straight (non-premultiplied) RGBA8. Source GIF frames carry binary
/// transparency, so alpha is effectively 0 or 255.
pub type Rgba8 = [u8; 4];

pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// A sub-rectangle in canvas coordinates (origin top-left).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether this rectangle lies entirely within a `width` x `height` extent
    /// anchored at the origin.
    pub fn fits_within(self, width: u32, height: u32) -> bool {
        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        right <= u64::from(width) && bottom <= u64::from(height)
    }
}

/// A full-color RGBA8 raster, row-major top-to-bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Allocates a fully transparent raster.
    pub fn new(width: u32, height: u32) -> GifscaleResult<Self> {
        if width == 0 || height == 0 {
            return Err(GifscaleError::invalid_dimensions(format!(
                "raster dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                GifscaleError::invalid_dimensions(format!("raster {width}x{height} overflows"))
            })?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wraps an existing RGBA8 buffer. The buffer length must be exactly
    /// `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> GifscaleResult<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        if width == 0 || height == 0 || data.len() != expected {
            return Err(GifscaleError::invalid_dimensions(format!(
                "rgba8 buffer of {} bytes does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn get(&self, x: u32, y: u32) -> Rgba8 {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    pub fn put(&mut self, x: u32, y: u32, px: Rgba8) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

/// Per-frame instruction for how the canvas is treated before the next frame
/// is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Disposal {
    /// Leave the composited frame in place (GIF "none"/"keep").
    #[default]
    Keep,
    /// Clear the frame's bounds back to the background after it is shown.
    RestoreBackground,
    /// Restore the canvas to its state before this frame was composited.
    RestorePrevious,
}

/// One decoded frame: a partial rectangular update layered on the canvas.
#[derive(Clone, Debug)]
pub struct SourceFrame {
    pub bounds: Rect,
    pub pixels: Raster,
    pub disposal: Disposal,
    /// Frame delay in centiseconds, as carried by the container.
    pub delay_cs: u16,
}

impl SourceFrame {
    pub fn new(
        bounds: Rect,
        pixels: Raster,
        disposal: Disposal,
        delay_cs: u16,
    ) -> GifscaleResult<Self> {
        if pixels.width() != bounds.width || pixels.height() != bounds.height {
            return Err(GifscaleError::invalid_dimensions(format!(
                "frame pixels {}x{} do not cover bounds {}x{}",
                pixels.width(),
                pixels.height(),
                bounds.width,
                bounds.height
            )));
        }
        Ok(Self {
            bounds,
            pixels,
            disposal,
            delay_cs,
        })
    }
}

/// Animation loop count, passed through unchanged from decode to encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    Infinite,
    Finite(u16),
}

/// A decoded animation: logical screen plus ordered frames.
#[derive(Clone, Debug)]
pub struct Animation {
    pub width: u32,
    pub height: u32,
    pub repeat: Repeat,
    pub frames: Vec<SourceFrame>,
}

impl Animation {
    pub fn validate(&self) -> GifscaleResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GifscaleError::invalid_dimensions(
                "animation logical screen must be non-zero",
            ));
        }
        Ok(())
    }
}
