//! The write-side frame sequencer.
//!
//! Each frame is prepared as two luma/chroma references: the source
//! padded to factor-aligned dimensions, and the source downsampled to
//! chroma resolution. Scanlines are then packed per the resolved layout
//! and written back to back; partition mode writes the three planes to
//! separate files.

use std::path::Path;

use image::DynamicImage;
use serde::Deserialize;
use tracing::debug;

use crate::error::CodecError;
use crate::frame::YccFrame;
use crate::layout::{Interlace, SignalLayout};
use crate::progress::{NoProgress, Progress, Ticker};
use crate::resample::{self, ChromaChannel};
use crate::scanline::{self, ScanlineBuffer};
use crate::stream::{Channel, RawStream};

fn default_depth() -> u8 {
    8
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncodeOptions {
    /// Bits per sample; 8 or fewer writes 1-byte samples, more writes
    /// big-endian 2-byte samples.
    #[serde(default = "default_depth")]
    pub depth: u8,
    #[serde(default)]
    pub interlace: Option<Interlace>,
    /// "HxV" geometry string, defaulting to "2x2".
    #[serde(default)]
    pub sampling_factor: Option<String>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            depth: 8,
            interlace: None,
            sampling_factor: None,
        }
    }
}

/// Encodes `images` as one raw stream at `path` (three partition files
/// in partition mode), frames concatenated without delimiters.
pub fn encode_file(
    path: &Path,
    images: &[DynamicImage],
    options: &EncodeOptions,
) -> Result<(), CodecError> {
    encode_file_with_progress(path, images, options, &mut NoProgress)
}

/// Like [`encode_file`], reporting per-scanline progress. Cancellation is
/// not an error: encoding stops at the next scanline boundary and returns
/// `Ok`, leaving the frames (and scanlines) already written in the output
/// stream.
pub fn encode_file_with_progress(
    path: &Path,
    images: &[DynamicImage],
    options: &EncodeOptions,
    progress: &mut dyn Progress,
) -> Result<(), CodecError> {
    let layout = SignalLayout::resolve(
        options.interlace,
        options.sampling_factor.as_deref(),
        options.depth,
    )?;
    let mut buffer = ScanlineBuffer::with_capacity(0);

    match write_frames(path, images, &layout, &mut buffer, progress) {
        Err(CodecError::Cancelled) => {
            debug!("encode cancelled; keeping scanlines already written");
            Ok(())
        }
        result => result,
    }
}

fn write_frames(
    path: &Path,
    images: &[DynamicImage],
    layout: &SignalLayout,
    buffer: &mut ScanlineBuffer,
    progress: &mut dyn Progress,
) -> Result<(), CodecError> {
    match layout.interlace {
        Interlace::Partition => {
            for (scene, image) in images.iter().enumerate() {
                debug!(scene, "writing partition frame");
                encode_partition_frame(path, image, layout, buffer, progress)?;
            }
        }
        _ => {
            let mut stream = RawStream::create(path, Channel::Combined)?;
            for (scene, image) in images.iter().enumerate() {
                debug!(scene, "writing frame");
                encode_stream_frame(&mut stream, image, layout, buffer, progress)?;
            }
        }
    }
    Ok(())
}

fn frame_references(
    image: &DynamicImage,
    layout: &SignalLayout,
) -> Result<(YccFrame, YccFrame), CodecError> {
    let luma_ref = resample::aligned_reference(image, layout)?;
    let chroma_ref = resample::chroma_reference(image, layout)?;
    Ok((luma_ref, chroma_ref))
}

fn encode_stream_frame(
    stream: &mut RawStream,
    image: &DynamicImage,
    layout: &SignalLayout,
    buffer: &mut ScanlineBuffer,
    progress: &mut dyn Progress,
) -> Result<(), CodecError> {
    let (luma_ref, chroma_ref) = frame_references(image, layout)?;
    let total_rows = if layout.packed() {
        luma_ref.height() as u64
    } else {
        luma_ref.height() as u64 + 2 * chroma_ref.height() as u64
    };
    let mut ticker = Ticker::new(progress, total_rows);

    if layout.packed() {
        for row in 0..luma_ref.height() {
            let out = buffer.start_row();
            scanline::encode_packed_row(
                luma_ref.y_row(row),
                chroma_ref.cb_row(row),
                chroma_ref.cr_row(row),
                layout.sample_width,
                out,
            );
            stream.write_row(buffer.as_bytes())?;
            ticker.tick()?;
        }
    } else {
        write_luma_plane(stream, &luma_ref, layout, buffer, &mut ticker)?;
        write_chroma_plane(
            stream,
            &chroma_ref,
            ChromaChannel::Cb,
            layout,
            buffer,
            &mut ticker,
        )?;
        write_chroma_plane(
            stream,
            &chroma_ref,
            ChromaChannel::Cr,
            layout,
            buffer,
            &mut ticker,
        )?;
    }
    Ok(())
}

fn encode_partition_frame(
    base: &Path,
    image: &DynamicImage,
    layout: &SignalLayout,
    buffer: &mut ScanlineBuffer,
    progress: &mut dyn Progress,
) -> Result<(), CodecError> {
    let (luma_ref, chroma_ref) = frame_references(image, layout)?;
    let total_rows = luma_ref.height() as u64 + 2 * chroma_ref.height() as u64;
    let mut ticker = Ticker::new(progress, total_rows);

    let mut luma = RawStream::create(base, Channel::Luma)?;
    write_luma_plane(&mut luma, &luma_ref, layout, buffer, &mut ticker)?;
    let mut blue = RawStream::create(base, Channel::ChromaBlue)?;
    write_chroma_plane(
        &mut blue,
        &chroma_ref,
        ChromaChannel::Cb,
        layout,
        buffer,
        &mut ticker,
    )?;
    let mut red = RawStream::create(base, Channel::ChromaRed)?;
    write_chroma_plane(
        &mut red,
        &chroma_ref,
        ChromaChannel::Cr,
        layout,
        buffer,
        &mut ticker,
    )?;
    Ok(())
}

fn write_luma_plane(
    stream: &mut RawStream,
    luma_ref: &YccFrame,
    layout: &SignalLayout,
    buffer: &mut ScanlineBuffer,
    ticker: &mut Ticker<'_>,
) -> Result<(), CodecError> {
    for row in 0..luma_ref.height() {
        let out = buffer.start_row();
        scanline::encode_plane_row(luma_ref.y_row(row), layout.sample_width, out);
        stream.write_row(buffer.as_bytes())?;
        ticker.tick()?;
    }
    Ok(())
}

fn write_chroma_plane(
    stream: &mut RawStream,
    chroma_ref: &YccFrame,
    channel: ChromaChannel,
    layout: &SignalLayout,
    buffer: &mut ScanlineBuffer,
    ticker: &mut Ticker<'_>,
) -> Result<(), CodecError> {
    for row in 0..chroma_ref.height() {
        let plane_row = match channel {
            ChromaChannel::Cb => chroma_ref.cb_row(row),
            ChromaChannel::Cr => chroma_ref.cr_row(row),
        };
        let out = buffer.start_row();
        scanline::encode_plane_row(plane_row, layout.sample_width, out);
        stream.write_row(buffer.as_bytes())?;
        ticker.tick()?;
    }
    Ok(())
}
