use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while turning a video into swatches.
///
/// Every variant is fatal for the run. A decoder that is merely full or
/// waiting for input is not an error; see [`crate::SendStatus`] and
/// [`crate::ReceiveStatus`].
#[derive(Error, Debug)]
pub enum SwatchError {
    /// A call into the decoding service returned a failure status.
    #[error("{operation} failed ({code})")]
    ExternalCall { operation: &'static str, code: i32 },

    #[error("unable to allocate: {what}")]
    Allocation { what: &'static str },

    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("didn't find a video stream")]
    NoVideoStream,

    #[error("invalid frame rate {numerator}/{denominator}")]
    InvalidFrameRate { numerator: i32, denominator: i32 },

    #[error("decoded frame is {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },

    #[error("unsupported pixel layout: {bytes_per_pixel} bytes per pixel, expected 3 or 4")]
    PixelLayout { bytes_per_pixel: usize },

    #[error("decoder reported full buffers but produced no frames")]
    DecoderStalled,

    /// Rendering an image needs at least one color.
    #[error("colors must be non-empty")]
    EmptyColors,

    #[error("writing {}: {source}", .path.display())]
    Output { path: PathBuf, source: std::io::Error },

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, SwatchError>;
