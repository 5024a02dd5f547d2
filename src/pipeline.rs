use crate::{
    canvas::AccumCanvas,
    core::{Animation, Repeat, SourceFrame},
    error::GifscaleResult,
    quantize::{IndexedRaster, Palette, quantize},
    resize::{Resampler, resize_raster, resolve_target},
};

/// Options for one [`resize_animation`] run.
#[derive(Clone, Debug)]
pub struct ResizeOpts {
    /// Target width; 0 derives it from the height preserving aspect ratio.
    pub width: u32,
    /// Target height; 0 derives it from the width. Both zero is identity.
    pub height: u32,
    /// Output palette, fixed for the whole run.
    pub palette: Palette,
}

impl Default for ResizeOpts {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            palette: Palette::standard(),
        }
    }
}

/// One output frame: a full-size indexed raster plus its pass-through delay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedFrame {
    pub raster: IndexedRaster,
    pub delay_cs: u16,
}

/// The resized animation: full-frame indexed rasters at the target
/// dimensions, every frame anchored at origin (0, 0).
#[derive(Clone, Debug)]
pub struct IndexedAnimation {
    pub width: u32,
    pub height: u32,
    pub repeat: Repeat,
    pub frames: Vec<IndexedFrame>,
}

/// Runs the whole pipeline over a decoded animation:
/// for each frame, composite onto the accumulator canvas, resize the complete
/// composited raster, quantize against the run palette, append.
///
/// The first failing frame aborts the run with its index attached; no partial
/// output is ever returned. Frames are processed strictly in input order
/// because each composite depends on the previous canvas state.
#[tracing::instrument(skip_all, fields(frames = anim.frames.len(), width = opts.width, height = opts.height))]
pub fn resize_animation(
    anim: &Animation,
    opts: &ResizeOpts,
    resampler: &dyn Resampler,
) -> GifscaleResult<IndexedAnimation> {
    anim.validate()?;
    let (out_width, out_height) = resolve_target(anim.width, anim.height, opts.width, opts.height)?
        .unwrap_or((anim.width, anim.height));

    let mut canvas = AccumCanvas::new(anim.width, anim.height)?;
    let mut frames = Vec::with_capacity(anim.frames.len());
    for (index, frame) in anim.frames.iter().enumerate() {
        let raster = process_frame(&mut canvas, frame, opts, resampler)
            .map_err(|e| e.at_frame(index))?;
        frames.push(IndexedFrame {
            raster,
            delay_cs: frame.delay_cs,
        });
    }

    tracing::debug!(out_width, out_height, "animation resized");
    Ok(IndexedAnimation {
        width: out_width,
        height: out_height,
        repeat: anim.repeat,
        frames,
    })
}

fn process_frame(
    canvas: &mut AccumCanvas,
    frame: &SourceFrame,
    opts: &ResizeOpts,
    resampler: &dyn Resampler,
) -> GifscaleResult<IndexedRaster> {
    canvas.composite(frame)?;
    let snapshot = canvas.snapshot();
    let resized = resize_raster(&snapshot, opts.width, opts.height, resampler)?;
    let indexed = quantize(&resized, &opts.palette)?;
    canvas.dispose(frame);
    Ok(indexed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Disposal, Raster, Rect},
        error::GifscaleError,
        resize::NearestNeighbor,
    };

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn solid(width: u32, height: u32, px: [u8; 4]) -> Raster {
        let mut r = Raster::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                r.put(x, y, px);
            }
        }
        r
    }

    fn red_blue_animation() -> Animation {
        Animation {
            width: 4,
            height: 4,
            repeat: Repeat::Finite(3),
            frames: vec![
                SourceFrame::new(Rect::new(0, 0, 4, 4), solid(4, 4, RED), Disposal::Keep, 10)
                    .unwrap(),
                SourceFrame::new(Rect::new(1, 1, 2, 2), solid(2, 2, BLUE), Disposal::Keep, 20)
                    .unwrap(),
            ],
        }
    }

    fn red_blue_palette() -> Palette {
        Palette::new(vec![[255, 0, 0], [0, 0, 255]]).unwrap()
    }

    #[test]
    fn identity_run_composites_partial_frames_onto_full_rasters() {
        let anim = red_blue_animation();
        let opts = ResizeOpts {
            palette: red_blue_palette(),
            ..ResizeOpts::default()
        };
        let out = resize_animation(&anim, &opts, &NearestNeighbor).unwrap();

        assert_eq!(out.width, 4);
        assert_eq!(out.height, 4);
        assert_eq!(out.frames.len(), 2);
        assert_eq!(out.frames[0].raster.indices, vec![0; 16]);

        // Frame 1 is a complete raster: blue 2x2 at (1,1), red elsewhere.
        let f1 = &out.frames[1].raster;
        for y in 0..4u32 {
            for x in 0..4u32 {
                let expect = if (1..3).contains(&x) && (1..3).contains(&y) { 1 } else { 0 };
                assert_eq!(f1.indices[(y * 4 + x) as usize], expect, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn downscale_to_2x2_pins_nearest_sampling() {
        let anim = red_blue_animation();
        let opts = ResizeOpts {
            width: 2,
            height: 2,
            palette: red_blue_palette(),
        };
        let out = resize_animation(&anim, &opts, &NearestNeighbor).unwrap();

        assert_eq!(out.width, 2);
        assert_eq!(out.height, 2);
        // Destination (0,0) samples source (1,1), which is inside the blue
        // square; the other three samples land on red.
        assert_eq!(out.frames[1].raster.indices, vec![1, 0, 0, 0]);
    }

    #[test]
    fn metadata_passes_through_unchanged() {
        let anim = red_blue_animation();
        let opts = ResizeOpts {
            palette: red_blue_palette(),
            ..ResizeOpts::default()
        };
        let out = resize_animation(&anim, &opts, &NearestNeighbor).unwrap();
        assert_eq!(out.repeat, Repeat::Finite(3));
        assert_eq!(out.frames[0].delay_cs, 10);
        assert_eq!(out.frames[1].delay_cs, 20);
    }

    #[test]
    fn failing_frame_aborts_run_with_its_index() {
        let mut anim = red_blue_animation();
        anim.frames.push(
            SourceFrame::new(Rect::new(3, 3, 2, 2), solid(2, 2, BLUE), Disposal::Keep, 10)
                .unwrap(),
        );
        let opts = ResizeOpts {
            palette: red_blue_palette(),
            ..ResizeOpts::default()
        };
        let err = resize_animation(&anim, &opts, &NearestNeighbor).unwrap_err();
        match err {
            GifscaleError::Frame { index, source } => {
                assert_eq!(index, 2);
                assert!(matches!(*source, GifscaleError::OutOfBounds(_)));
            }
            other => panic!("expected frame-indexed error, got {other}"),
        }
    }

    #[test]
    fn restore_background_frame_does_not_leak_into_next() {
        let mut anim = red_blue_animation();
        anim.frames[1].disposal = Disposal::RestoreBackground;
        anim.frames.push(
            SourceFrame::new(Rect::new(0, 0, 1, 1), solid(1, 1, RED), Disposal::Keep, 10).unwrap(),
        );
        // Palette includes black so cleared (transparent) pixels have a home.
        let opts = ResizeOpts {
            palette: Palette::new(vec![[255, 0, 0], [0, 0, 255], [0, 0, 0]]).unwrap(),
            ..ResizeOpts::default()
        };
        let out = resize_animation(&anim, &opts, &NearestNeighbor).unwrap();

        // Frame 2: the blue square was cleared to background after frame 1's
        // snapshot, so its region quantizes as black, not blue.
        let f2 = &out.frames[2].raster;
        assert_eq!(f2.indices[5], 2, "pixel (1,1)");
        assert_eq!(f2.indices[10], 2, "pixel (2,2)");
        assert_eq!(f2.indices[0], 0, "pixel (0,0)");
    }

    #[test]
    fn invalid_target_fails_before_any_frame_work() {
        // Width 1 on a 1000x2 logical screen derives height round(2/1000) = 0.
        let strip = Animation {
            width: 1000,
            height: 2,
            repeat: Repeat::Infinite,
            frames: vec![],
        };
        let opts = ResizeOpts {
            width: 1,
            height: 0,
            palette: red_blue_palette(),
        };
        let err = resize_animation(&strip, &opts, &NearestNeighbor).unwrap_err();
        assert!(matches!(err, GifscaleError::InvalidDimensions(_)));
    }
}
