#![forbid(unsafe_code)]

pub mod canvas;
pub mod core;
pub mod decode_gif;
pub mod encode_gif;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod quantize;
pub mod resize;

pub use canvas::AccumCanvas;
pub use core::{Animation, Disposal, Raster, Rect, Repeat, Rgba8, SourceFrame};
pub use decode_gif::decode_animation;
pub use encode_gif::encode_animation;
pub use error::{GifscaleError, GifscaleResult};
pub use fetch::load_source;
pub use pipeline::{IndexedAnimation, IndexedFrame, ResizeOpts, resize_animation};
pub use quantize::{IndexedRaster, Palette, quantize};
pub use resize::{Filtered, NearestNeighbor, Resampler, resize_raster, resolve_target};
