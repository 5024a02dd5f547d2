use image::imageops::FilterType;

use crate::{
    core::Raster,
    error::{GifscaleError, GifscaleResult},
};

/// A resampling strategy: one method, injected at pipeline construction.
///
/// Implementations must be deterministic, pure functions of the source raster
/// and the target dimensions.
pub trait Resampler {
    fn resample(&self, src: &Raster, width: u32, height: u32) -> GifscaleResult<Raster>;
}

/// Nearest-neighbor with a pinned sampling convention: destination pixel
/// (x, y) samples source pixel `(floor((x + 0.5) * sw / dw),
/// floor((y + 0.5) * sh / dh))`, that is, pixel centers, floored.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestNeighbor;

impl Resampler for NearestNeighbor {
    fn resample(&self, src: &Raster, width: u32, height: u32) -> GifscaleResult<Raster> {
        let mut out = Raster::new(width, height)?;
        let sw = f64::from(src.width());
        let sh = f64::from(src.height());
        for y in 0..height {
            let sy = ((f64::from(y) + 0.5) * sh / f64::from(height)).floor() as u32;
            let sy = sy.min(src.height() - 1);
            for x in 0..width {
                let sx = ((f64::from(x) + 0.5) * sw / f64::from(width)).floor() as u32;
                let sx = sx.min(src.width() - 1);
                out.put(x, y, src.get(sx, sy));
            }
        }
        Ok(out)
    }
}

/// Interpolating filters, delegated to `image::imageops::resize`.
#[derive(Clone, Copy, Debug)]
pub struct Filtered(pub FilterType);

impl Resampler for Filtered {
    fn resample(&self, src: &Raster, width: u32, height: u32) -> GifscaleResult<Raster> {
        if width == 0 || height == 0 {
            return Err(GifscaleError::invalid_dimensions(
                "resample target must be non-zero",
            ));
        }
        let img = image::RgbaImage::from_raw(src.width(), src.height(), src.data().to_vec())
            .ok_or_else(|| {
                GifscaleError::invalid_dimensions("raster buffer does not match its dimensions")
            })?;
        let resized = image::imageops::resize(&img, width, height, self.0);
        Raster::from_rgba8(width, height, resized.into_raw())
    }
}

/// Resolves requested target dimensions against a source extent.
///
/// A zero dimension is derived from the other one preserving aspect ratio
/// (`round(other * src_dim / src_other)`); both zero means identity and
/// returns `None`.
pub fn resolve_target(
    src_width: u32,
    src_height: u32,
    width: u32,
    height: u32,
) -> GifscaleResult<Option<(u32, u32)>> {
    if src_width == 0 || src_height == 0 {
        return Err(GifscaleError::invalid_dimensions(
            "source raster must be non-zero",
        ));
    }
    let (w, h) = match (width, height) {
        (0, 0) => return Ok(None),
        (w, 0) => {
            let h = (f64::from(w) * f64::from(src_height) / f64::from(src_width)).round() as u32;
            (w, h)
        }
        (0, h) => {
            let w = (f64::from(h) * f64::from(src_width) / f64::from(src_height)).round() as u32;
            (w, h)
        }
        (w, h) => (w, h),
    };
    if w == 0 || h == 0 {
        return Err(GifscaleError::invalid_dimensions(format!(
            "target {width}x{height} resolves to degenerate {w}x{h} for source {src_width}x{src_height}"
        )));
    }
    Ok(Some((w, h)))
}

/// Resizes a complete raster to the resolved target dimensions using the
/// supplied strategy. The (0, 0) identity returns the source unchanged
/// without invoking the strategy.
pub fn resize_raster(
    src: &Raster,
    width: u32,
    height: u32,
    resampler: &dyn Resampler,
) -> GifscaleResult<Raster> {
    match resolve_target(src.width(), src.height(), width, height)? {
        None => Ok(src.clone()),
        Some((w, h)) => resampler.resample(src, w, h),
    }
}
