use std::{borrow::Cow, io::Write};

use crate::{
    core::Repeat,
    error::{GifscaleError, GifscaleResult},
    pipeline::IndexedAnimation,
};

/// Serializes an [`IndexedAnimation`] as a GIF.
///
/// The run palette becomes the global color table; every frame is written as
/// a full-size image at origin (0, 0) with its delay passed through. A frame
/// whose palette differs from the first frame's gets a local color table.
pub fn encode_animation(writer: impl Write, anim: &IndexedAnimation) -> GifscaleResult<()> {
    let width = to_u16_extent(anim.width, "width")?;
    let height = to_u16_extent(anim.height, "height")?;

    let global_palette = anim
        .frames
        .first()
        .map(|f| f.raster.palette.to_rgb_bytes())
        .unwrap_or_default();

    let mut encoder = gif::Encoder::new(writer, width, height, &global_palette)
        .map_err(|e| GifscaleError::encode(format!("write gif header: {e}")))?;
    encoder
        .set_repeat(match anim.repeat {
            Repeat::Infinite => gif::Repeat::Infinite,
            Repeat::Finite(n) => gif::Repeat::Finite(n),
        })
        .map_err(|e| GifscaleError::encode(format!("write loop count: {e}")))?;

    for (index, frame) in anim.frames.iter().enumerate() {
        if frame.raster.width != anim.width || frame.raster.height != anim.height {
            return Err(GifscaleError::encode(format!(
                "frame {index} is {}x{}, expected full {}x{}",
                frame.raster.width, frame.raster.height, anim.width, anim.height
            )));
        }

        let mut out = gif::Frame::default();
        out.width = width;
        out.height = height;
        out.delay = frame.delay_cs;
        out.dispose = gif::DisposalMethod::Keep;
        out.buffer = Cow::Borrowed(frame.raster.indices.as_slice());
        let palette_bytes = frame.raster.palette.to_rgb_bytes();
        if palette_bytes != global_palette {
            out.palette = Some(palette_bytes);
        }

        encoder
            .write_frame(&out)
            .map_err(|e| GifscaleError::encode(format!("write frame {index}: {e}")))?;
    }

    Ok(())
}

fn to_u16_extent(value: u32, axis: &str) -> GifscaleResult<u16> {
    u16::try_from(value).map_err(|_| {
        GifscaleError::encode(format!("gif {axis} {value} exceeds the container limit of 65535"))
    })
}
