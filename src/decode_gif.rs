use std::io::Read;

use crate::{
    core::{Animation, Disposal, Raster, Rect, Repeat, SourceFrame},
    error::{GifscaleError, GifscaleResult},
};

/// Decodes a whole GIF into an [`Animation`], expanding every frame to RGBA.
///
/// Frame bounds are taken verbatim from the container; the pipeline rejects
/// frames that exceed the logical screen rather than clipping them here.
pub fn decode_animation(reader: impl Read) -> GifscaleResult<Animation> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options
        .read_info(reader)
        .map_err(|e| GifscaleError::decode(format!("read gif header: {e}")))?;

    let width = u32::from(decoder.width());
    let height = u32::from(decoder.height());
    let repeat = match decoder.repeat() {
        gif::Repeat::Infinite => Repeat::Infinite,
        gif::Repeat::Finite(n) => Repeat::Finite(n),
    };

    let mut frames = Vec::new();
    loop {
        let frame = match decoder.read_next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                return Err(GifscaleError::decode(format!(
                    "read frame {}: {e}",
                    frames.len()
                )));
            }
        };

        let bounds = Rect::new(
            u32::from(frame.left),
            u32::from(frame.top),
            u32::from(frame.width),
            u32::from(frame.height),
        );
        let pixels = Raster::from_rgba8(bounds.width, bounds.height, frame.buffer.to_vec())
            .map_err(|e| GifscaleError::decode(format!("frame {}: {e}", frames.len())))?;
        let disposal = map_disposal(frame.dispose);

        frames.push(SourceFrame::new(bounds, pixels, disposal, frame.delay)?);
    }

    tracing::debug!(width, height, frames = frames.len(), "decoded gif");
    Ok(Animation {
        width,
        height,
        repeat,
        frames,
    })
}

fn map_disposal(dispose: gif::DisposalMethod) -> Disposal {
    match dispose {
        gif::DisposalMethod::Any | gif::DisposalMethod::Keep => Disposal::Keep,
        gif::DisposalMethod::Background => Disposal::RestoreBackground,
        gif::DisposalMethod::Previous => Disposal::RestorePrevious,
    }
}
