//! Codec for raw CCIR 601 4:1:1 / 4:2:2 luma-chroma streams.
//!
//! The streams are headerless: the caller supplies the frame geometry,
//! bit depth, sampling factors and interlace mode, and the codec reads
//! or writes the bare sample bytes. Three physical layouts are
//! supported: packed 4:2:2 scanlines, planar Y/Cb/Cr in one stream, and
//! planar with each channel in its own partition file. Streams may hold
//! any number of frames back to back.
//!
//! [`decode_file`] and [`encode_file`] are the entry points; the
//! `*_with_progress` variants add per-scanline progress reporting with
//! cooperative cancellation.

pub mod color;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod frame;
pub mod layout;
pub mod progress;
pub mod resample;
pub mod scanline;
pub mod stream;

pub use decoder::{DecodeOptions, decode_file, decode_file_with_progress};
pub use encoder::{EncodeOptions, encode_file, encode_file_with_progress};
pub use error::CodecError;
pub use frame::{FrameInfo, YccFrame};
pub use layout::{Interlace, SampleWidth, SamplingFactor, SignalLayout};
pub use progress::{NoProgress, Progress};
