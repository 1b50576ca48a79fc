//! Resolution of the physical stream layout.
//!
//! The wire layout of a raw CCIR 601 stream is not self-describing: the
//! caller supplies a requested interlace mode, a sampling-factor geometry
//! string and a bit depth, and this module turns them into the effective
//! [`SignalLayout`] used by both the decoder and the encoder.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Physical arrangement of luma and chroma samples in the byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interlace {
    /// Luma and chroma interleaved per scanline (packed 4:2:2).
    None,
    /// Full Y plane followed by the Cb and Cr planes in one stream.
    Plane,
    /// Y, Cb and Cr planes stored in three separate files.
    Partition,
}

impl FromStr for Interlace {
    type Err = CodecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "none" | "no" | "noninterlaced" => Ok(Self::None),
            "plane" => Ok(Self::Plane),
            "partition" => Ok(Self::Partition),
            other => Err(CodecError::InvalidInterlace(other.to_string())),
        }
    }
}

/// Bytes occupied by a single sample on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    One,
    Two,
}

impl SampleWidth {
    pub fn from_depth(depth: u8) -> Self {
        if depth <= 8 { Self::One } else { Self::Two }
    }

    pub fn bytes(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// Chroma subsampling divisors relative to luma, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingFactor {
    pub horizontal: u32,
    pub vertical: u32,
}

impl Default for SamplingFactor {
    fn default() -> Self {
        Self {
            horizontal: 2,
            vertical: 2,
        }
    }
}

impl SamplingFactor {
    /// Parses an "HxV" geometry string. A bare "H" applies the same factor
    /// to both axes. Each axis must be 1 or 2.
    pub fn parse(geometry: &str) -> Result<Self, CodecError> {
        let invalid = || CodecError::InvalidSamplingFactor(geometry.to_string());
        let trimmed = geometry.trim();
        let (h, v) = match trimmed.split_once(['x', 'X']) {
            Some((h, v)) => (h, v),
            None => (trimmed, trimmed),
        };
        let horizontal: u32 = h.trim().parse().map_err(|_| invalid())?;
        let vertical: u32 = if v.trim().is_empty() {
            horizontal
        } else {
            v.trim().parse().map_err(|_| invalid())?
        };
        if !matches!(horizontal, 1 | 2) || !matches!(vertical, 1 | 2) {
            return Err(invalid());
        }
        Ok(Self {
            horizontal,
            vertical,
        })
    }
}

/// The effective layout of one codec invocation, resolved once and reused
/// for every frame in the stream.
#[derive(Debug, Clone, Copy)]
pub struct SignalLayout {
    pub interlace: Interlace,
    pub sampling: SamplingFactor,
    pub sample_width: SampleWidth,
}

impl SignalLayout {
    /// Resolves the effective interlace mode. An unspecified mode, or a
    /// noninterlaced request combined with vertical subsampling, maps to
    /// 4:2:2 noninterlaced for vertical factor 1 and 4:1:1 plane
    /// interlace for vertical factor 2. Explicit plane or partition
    /// requests are honored unchanged.
    pub fn resolve(
        requested: Option<Interlace>,
        sampling_factor: Option<&str>,
        depth: u8,
    ) -> Result<Self, CodecError> {
        let sampling = match sampling_factor {
            Some(geometry) => SamplingFactor::parse(geometry)?,
            None => SamplingFactor::default(),
        };
        let mut interlace = requested.unwrap_or(Interlace::None);
        if requested.is_none() || (interlace == Interlace::None && sampling.vertical == 2) {
            interlace = if sampling.vertical == 2 {
                Interlace::Plane
            } else {
                Interlace::None
            };
        }
        Ok(Self {
            interlace,
            sampling,
            sample_width: SampleWidth::from_depth(depth),
        })
    }

    pub fn packed(&self) -> bool {
        self.interlace == Interlace::None
    }

    /// Chroma plane dimensions on decode (truncating division). The packed
    /// 4:2:2 layout fixes chroma at half horizontal resolution regardless
    /// of the declared sampling factor.
    pub fn chroma_dims(&self, width: u32, height: u32) -> (u32, u32) {
        if self.packed() {
            (width / 2, height)
        } else {
            (
                width / self.sampling.horizontal,
                height / self.sampling.vertical,
            )
        }
    }

    /// Factor-aligned dimensions of the luma reference on encode; odd
    /// dimensions are rounded up, never cropped.
    pub fn aligned_dims(&self, width: u32, height: u32) -> (u32, u32) {
        let horizontal = if self.packed() {
            2
        } else {
            self.sampling.horizontal
        };
        (
            ceil_to_factor(width, horizontal),
            ceil_to_factor(height, self.sampling.vertical),
        )
    }

    /// Chroma plane dimensions on encode, derived from the aligned frame.
    pub fn encode_chroma_dims(&self, width: u32, height: u32) -> (u32, u32) {
        let (aligned_w, aligned_h) = self.aligned_dims(width, height);
        if self.packed() {
            (aligned_w / 2, aligned_h)
        } else {
            (
                aligned_w / self.sampling.horizontal,
                aligned_h / self.sampling.vertical,
            )
        }
    }

    /// Bytes in one packed (noninterlaced) scanline: W/2 groups of
    /// [Cb, Y, Cr, Y].
    pub fn packed_row_bytes(&self, width: u32) -> usize {
        2 * self.sample_width.bytes() * width as usize
    }

    /// Bytes in one single-channel plane scanline.
    pub fn plane_row_bytes(&self, plane_width: u32) -> usize {
        self.sample_width.bytes() * plane_width as usize
    }

    /// Size of the chunk the frame sequencer reads ahead to probe for
    /// another frame: one scanline of whatever the stream starts with.
    pub fn probe_row_bytes(&self, width: u32) -> usize {
        if self.packed() {
            self.packed_row_bytes(width)
        } else {
            self.plane_row_bytes(width)
        }
    }
}

/// Rounds `value` up to the next multiple of `factor` (1 or 2).
pub fn ceil_to_factor(value: u32, factor: u32) -> u32 {
    value + (value & (factor - 1))
}
