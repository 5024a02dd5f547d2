use crate::{
    core::Raster,
    error::{GifscaleError, GifscaleResult},
};

/// A bounded set of output colors (at most 256 RGB entries), fixed for a
/// whole run so the animation keeps color consistency across frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 3]>,
}

impl Palette {
    pub fn new(colors: Vec<[u8; 3]>) -> GifscaleResult<Self> {
        if colors.is_empty() || colors.len() > 256 {
            return Err(GifscaleError::invalid_dimensions(format!(
                "palette must have 1..=256 colors, got {}",
                colors.len()
            )));
        }
        Ok(Self { colors })
    }

    /// The standard fixed palette: a 6x6x6 color cube (216 entries) followed
    /// by a 40-step gray ramp, 256 colors total.
    pub fn standard() -> Self {
        let mut colors = Vec::with_capacity(256);
        for r in 0..6u16 {
            for g in 0..6u16 {
                for b in 0..6u16 {
                    colors.push([(r * 51) as u8, (g * 51) as u8, (b * 51) as u8]);
                }
            }
        }
        for i in 0..40u16 {
            let v = ((i * 255 + 19) / 39) as u8;
            colors.push([v, v, v]);
        }
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// Interleaved RGB bytes, the layout GIF color tables use.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.colors.len() * 3);
        for c in &self.colors {
            out.extend_from_slice(c);
        }
        out
    }

    /// Nearest entry by squared Euclidean RGB distance. Ties resolve to the
    /// lowest index, which keeps quantization deterministic.
    fn nearest(&self, target: [f32; 3]) -> (u8, [u8; 3]) {
        let mut best = 0usize;
        let mut best_dist = f32::INFINITY;
        for (i, c) in self.colors.iter().enumerate() {
            let dr = target[0] - f32::from(c[0]);
            let dg = target[1] - f32::from(c[1]);
            let db = target[2] - f32::from(c[2]);
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        (best as u8, self.colors[best])
    }
}

/// A raster of palette indices plus the palette they index into: the final
/// per-frame artifact handed to the encoder. Row-major, top-to-bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedRaster {
    pub width: u32,
    pub height: u32,
    pub indices: Vec<u8>,
    pub palette: Palette,
}

/// Reduces a full-color raster to palette indices with Floyd-Steinberg error
/// diffusion.
///
/// Scan order is row-major, left-to-right, top-to-bottom; each pixel's
/// quantization error is diffused to unvisited neighbors with the weights
/// 7/16 (right), 3/16 (below-left), 5/16 (below), 1/16 (below-right).
/// Diffusion targets outside the raster are dropped. Alpha is ignored: the
/// canvas background is transparent black and quantizes as black.
pub fn quantize(src: &Raster, palette: &Palette) -> GifscaleResult<IndexedRaster> {
    let w = src.width() as usize;
    let h = src.height() as usize;
    let mut indices = vec![0u8; w * h];

    // Carried error for the current and next row, RGB per pixel.
    let mut cur = vec![[0f32; 3]; w];
    let mut next = vec![[0f32; 3]; w];

    for y in 0..h {
        for x in 0..w {
            let px = src.get(x as u32, y as u32);
            let want = [
                (f32::from(px[0]) + cur[x][0]).clamp(0.0, 255.0),
                (f32::from(px[1]) + cur[x][1]).clamp(0.0, 255.0),
                (f32::from(px[2]) + cur[x][2]).clamp(0.0, 255.0),
            ];
            let (idx, chosen) = palette.nearest(want);
            indices[y * w + x] = idx;

            let err = [
                want[0] - f32::from(chosen[0]),
                want[1] - f32::from(chosen[1]),
                want[2] - f32::from(chosen[2]),
            ];
            if x + 1 < w {
                diffuse(&mut cur[x + 1], err, 7.0 / 16.0);
                diffuse(&mut next[x + 1], err, 1.0 / 16.0);
            }
            if x > 0 {
                diffuse(&mut next[x - 1], err, 3.0 / 16.0);
            }
            diffuse(&mut next[x], err, 5.0 / 16.0);
        }
        std::mem::swap(&mut cur, &mut next);
        next.iter_mut().for_each(|e| *e = [0.0; 3]);
    }

    Ok(IndexedRaster {
        width: src.width(),
        height: src.height(),
        indices,
        palette: palette.clone(),
    })
}

fn diffuse(target: &mut [f32; 3], err: [f32; 3], weight: f32) {
    for i in 0..3 {
        target[i] += err[i] * weight;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette_rb() -> Palette {
        Palette::new(vec![[255, 0, 0], [0, 0, 255]]).unwrap()
    }

    #[test]
    fn standard_palette_has_256_colors() {
        let p = Palette::standard();
        assert_eq!(p.len(), 256);
        assert_eq!(p.colors()[0], [0, 0, 0]);
        assert_eq!(p.colors()[215], [255, 255, 255]);
        // gray ramp endpoints
        assert_eq!(p.colors()[216], [0, 0, 0]);
        assert_eq!(p.colors()[255], [255, 255, 255]);
    }

    #[test]
    fn palette_rejects_empty_and_oversized() {
        assert!(Palette::new(vec![]).is_err());
        assert!(Palette::new(vec![[0, 0, 0]; 257]).is_err());
        assert!(Palette::new(vec![[0, 0, 0]; 256]).is_ok());
    }

    #[test]
    fn exact_palette_colors_round_trip_with_zero_error() {
        let palette = palette_rb();
        let mut src = Raster::new(3, 2).unwrap();
        let pattern = [0u8, 1, 1, 0, 0, 1];
        for (i, &idx) in pattern.iter().enumerate() {
            let c = palette.colors()[idx as usize];
            src.put((i % 3) as u32, (i / 3) as u32, [c[0], c[1], c[2], 255]);
        }

        let out = quantize(&src, &palette).unwrap();
        assert_eq!(out.indices, pattern);
    }

    #[test]
    fn quantize_is_deterministic() {
        let palette = Palette::standard();
        let mut src = Raster::new(8, 8).unwrap();
        for y in 0..8 {
            for x in 0..8 {
                src.put(x, y, [(x * 31) as u8, (y * 29) as u8, 77, 255]);
            }
        }
        let a = quantize(&src, &palette).unwrap();
        let b = quantize(&src, &palette).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn nearest_ties_break_to_lowest_index() {
        // A pixel equidistant from both entries must pick index 0.
        let palette = Palette::new(vec![[100, 0, 0], [140, 0, 0]]).unwrap();
        let mut src = Raster::new(1, 1).unwrap();
        src.put(0, 0, [120, 0, 0, 255]);
        let out = quantize(&src, &palette).unwrap();
        assert_eq!(out.indices, vec![0]);
    }

    #[test]
    fn error_diffusion_propagates_rightward() {
        // Black-and-white palette over a mid-gray row: diffusion must
        // alternate rather than collapse to a single entry.
        let palette = Palette::new(vec![[0, 0, 0], [255, 255, 255]]).unwrap();
        let mut src = Raster::new(8, 1).unwrap();
        for x in 0..8 {
            src.put(x, 0, [128, 128, 128, 255]);
        }
        let out = quantize(&src, &palette).unwrap();
        let whites = out.indices.iter().filter(|&&i| i == 1).count();
        assert!(
            (3..=5).contains(&whites),
            "mid gray should dither to roughly half white, got {whites}/8"
        );
        assert!(out.indices.contains(&0) && out.indices.contains(&1));
    }

    #[test]
    fn edge_error_is_dropped_not_wrapped() {
        // A single pixel has no in-bounds neighbors; quantization must still
        // succeed and emit exactly one index.
        let palette = palette_rb();
        let mut src = Raster::new(1, 1).unwrap();
        src.put(0, 0, [200, 0, 60, 255]);
        let out = quantize(&src, &palette).unwrap();
        assert_eq!(out.indices.len(), 1);
        assert_eq!(out.indices[0], 0);
    }

    #[test]
    fn transparent_pixels_quantize_as_black() {
        let palette = Palette::new(vec![[0, 0, 0], [255, 255, 255]]).unwrap();
        let src = Raster::new(2, 2).unwrap();
        let out = quantize(&src, &palette).unwrap();
        assert_eq!(out.indices, vec![0; 4]);
    }
}
