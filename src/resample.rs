//! Bridging between subsampled chroma planes and full-resolution frames.
//!
//! Resampling is delegated to `image::imageops` with the triangle
//! (linear) kernel: CCIR subsampling is defined to be reconstructed with
//! linear interpolation, so nearest-neighbor is never used here.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, LumaA};

use crate::color;
use crate::error::CodecError;
use crate::frame::YccFrame;
use crate::layout::SignalLayout;

/// Chroma channel selector for plane reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromaChannel {
    Cb,
    Cr,
}

/// The per-frame chroma scratch image: two channels at chroma resolution,
/// created for one frame and discarded after upsampling.
#[derive(Debug)]
pub struct ChromaPlanes {
    width: u32,
    height: u32,
    cb: Vec<u16>,
    cr: Vec<u16>,
}

impl ChromaPlanes {
    pub fn new(width: u32, height: u32) -> Result<Self, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidDimensions);
        }
        let len = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            cb: vec![0; len],
            cr: vec![0; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn row_mut(&mut self, channel: ChromaChannel, row: u32) -> &mut [u16] {
        let width = self.width as usize;
        let plane = match channel {
            ChromaChannel::Cb => &mut self.cb,
            ChromaChannel::Cr => &mut self.cr,
        };
        &mut plane[row as usize * width..][..width]
    }

    /// Both chroma rows at once, for the packed scanline codec.
    pub fn rows_mut(&mut self, row: u32) -> (&mut [u16], &mut [u16]) {
        let width = self.width as usize;
        let start = row as usize * width;
        (
            &mut self.cb[start..][..width],
            &mut self.cr[start..][..width],
        )
    }

    fn row(&self, channel: ChromaChannel, row: u32) -> &[u16] {
        let width = self.width as usize;
        let plane = match channel {
            ChromaChannel::Cb => &self.cb,
            ChromaChannel::Cr => &self.cr,
        };
        &plane[row as usize * width..][..width]
    }
}

/// Upsamples the scratch chroma image to the frame's full resolution and
/// copies both channels onto the frame, scanline by scanline. One resize
/// invocation covers both channels. When chroma is already at full
/// resolution the copy is direct and lossless.
pub fn upsample_into(chroma: &ChromaPlanes, frame: &mut YccFrame) -> Result<(), CodecError> {
    let (width, height) = (frame.width(), frame.height());
    if chroma.width == width && chroma.height == height {
        for row in 0..height {
            frame
                .cb_row_mut(row)
                .copy_from_slice(chroma.row(ChromaChannel::Cb, row));
            frame
                .cr_row_mut(row)
                .copy_from_slice(chroma.row(ChromaChannel::Cr, row));
        }
        return Ok(());
    }

    let len = chroma.cb.len();
    let mut interleaved = Vec::with_capacity(len * 2);
    for i in 0..len {
        interleaved.push(chroma.cb[i]);
        interleaved.push(chroma.cr[i]);
    }
    let source: ImageBuffer<LumaA<u16>, Vec<u16>> =
        ImageBuffer::from_raw(chroma.width, chroma.height, interleaved)
            .ok_or(CodecError::ResamplingFailed { width, height })?;
    let resized = imageops::resize(&source, width, height, FilterType::Triangle);

    let stride = width as usize * 2;
    for row in 0..height {
        let source_row = &resized.as_raw()[row as usize * stride..][..stride];
        let cb_row = frame.cb_row_mut(row);
        for (x, pixel) in source_row.chunks_exact(2).enumerate() {
            cb_row[x] = pixel[0];
        }
        let cr_row = frame.cr_row_mut(row);
        for (x, pixel) in source_row.chunks_exact(2).enumerate() {
            cr_row[x] = pixel[1];
        }
    }
    Ok(())
}

/// Encode pass (a): pads the source to factor-aligned dimensions and
/// transforms it to luma/chroma. The resize is skipped when the source is
/// already aligned.
pub fn aligned_reference(
    image: &DynamicImage,
    layout: &SignalLayout,
) -> Result<YccFrame, CodecError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(CodecError::InvalidDimensions);
    }
    let (width, height) = layout.aligned_dims(image.width(), image.height());
    if (width, height) == (image.width(), image.height()) {
        color::frame_from_rgb(image)
    } else {
        color::frame_from_rgb(&image.resize_exact(width, height, FilterType::Triangle))
    }
}

/// Encode pass (b): downsamples the original source to chroma resolution
/// and transforms it to luma/chroma for chroma extraction.
pub fn chroma_reference(
    image: &DynamicImage,
    layout: &SignalLayout,
) -> Result<YccFrame, CodecError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(CodecError::InvalidDimensions);
    }
    let (width, height) = layout.encode_chroma_dims(image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(CodecError::ResamplingFailed { width, height });
    }
    if (width, height) == (image.width(), image.height()) {
        color::frame_from_rgb(image)
    } else {
        color::frame_from_rgb(&image.resize_exact(width, height, FilterType::Triangle))
    }
}
