//! Raw byte-stream handles.
//!
//! A stream is bound to the single combined file, or to one of the three
//! partition files whose suffix replaces the base extension ("Y", "U",
//! "V"). The frame sequencer owns at most one open handle per logical
//! channel and reassigns it at plane boundaries in partition mode.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::CodecError;

/// Logical channel a stream is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Combined,
    Luma,
    ChromaBlue,
    ChromaRed,
}

impl Channel {
    fn suffix(self) -> Option<&'static str> {
        match self {
            Self::Combined => None,
            Self::Luma => Some("Y"),
            Self::ChromaBlue => Some("U"),
            Self::ChromaRed => Some("V"),
        }
    }
}

/// Resolves the file path for a channel.
pub fn channel_path(base: &Path, channel: Channel) -> PathBuf {
    match channel.suffix() {
        None => base.to_path_buf(),
        Some(suffix) => base.with_extension(suffix),
    }
}

/// An open raw byte stream, reading or writing whole scanlines.
#[derive(Debug)]
pub struct RawStream {
    file: File,
    path: PathBuf,
}

impl RawStream {
    pub fn open(base: &Path, channel: Channel) -> Result<Self, CodecError> {
        let path = channel_path(base, channel);
        let file = File::open(&path).map_err(|source| CodecError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self { file, path })
    }

    pub fn create(base: &Path, channel: Channel) -> Result<Self, CodecError> {
        let path = channel_path(base, channel);
        let file = File::create(&path).map_err(|source| CodecError::Open {
            path: path.clone(),
            source,
        })?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fills `buf` from the stream, returning the number of bytes read.
    /// Zero only ever means a clean end of stream; a value between zero
    /// and `buf.len()` means the stream ended mid-scanline.
    pub fn read_row(&mut self, buf: &mut [u8]) -> Result<usize, CodecError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.file.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }

    pub fn write_row(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.file.write_all(bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_suffix_replaces_extension() {
        let base = Path::new("/tmp/clip.yuv");
        assert_eq!(
            channel_path(base, Channel::Luma),
            PathBuf::from("/tmp/clip.Y")
        );
        assert_eq!(
            channel_path(base, Channel::ChromaBlue),
            PathBuf::from("/tmp/clip.U")
        );
        assert_eq!(
            channel_path(base, Channel::ChromaRed),
            PathBuf::from("/tmp/clip.V")
        );
        assert_eq!(
            channel_path(base, Channel::Combined),
            PathBuf::from("/tmp/clip.yuv")
        );
    }
}
