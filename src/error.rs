pub type GifscaleResult<T> = Result<T, GifscaleError>;

#[derive(thiserror::Error, Debug)]
pub enum GifscaleError {
    #[error("out of bounds: {0}")]
    OutOfBounds(String),

    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("frame {index}: {source}")]
    Frame {
        index: usize,
        source: Box<GifscaleError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifscaleError {
    pub fn out_of_bounds(msg: impl Into<String>) -> Self {
        Self::OutOfBounds(msg.into())
    }

    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Attach the index of the frame that failed mid-pipeline.
    pub fn at_frame(self, index: usize) -> Self {
        Self::Frame {
            index,
            source: Box::new(self),
        }
    }
}
