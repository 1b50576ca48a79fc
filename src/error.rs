use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while reading or writing a raw YUV stream.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("sampling factor '{0}' is not supported; each axis must be 1 or 2")]
    InvalidSamplingFactor(String),

    #[error("unknown interlace mode '{0}'; expected none, plane or partition")]
    InvalidInterlace(String),

    #[error("image dimensions must be non-zero")]
    InvalidDimensions,

    #[error("noninterlaced 4:2:2 streams require an even width, got {0}")]
    OddPackedWidth(u32),

    #[error("short read: expected {expected} scanline bytes, got {got}")]
    ShortRead { expected: usize, got: usize },

    #[error("unexpected end of file in {}", .path.display())]
    UnexpectedEndOfFile { path: PathBuf },

    #[error("failed to open {}: {}", .path.display(), .source)]
    Open { path: PathBuf, source: io::Error },

    #[error("resampling chroma to {width}x{height} failed")]
    ResamplingFailed { width: u32, height: u32 },

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] io::Error),
}
