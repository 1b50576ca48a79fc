//! The read-side frame sequencer.
//!
//! Decoding walks one frame at a time through the resolved layout: read
//! the luma plane (or packed rows), then the two chroma planes, upsample
//! chroma to full resolution and merge. In single-stream modes a trial
//! read of one scanline after each frame probes for another; non-zero
//! bytes already hold the next frame's first row. A partition file set
//! holds a single frame.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::CodecError;
use crate::frame::YccFrame;
use crate::layout::{Interlace, SignalLayout};
use crate::progress::{NoProgress, Progress, Ticker};
use crate::resample::{self, ChromaChannel, ChromaPlanes};
use crate::scanline::{self, ScanlineBuffer};
use crate::stream::{Channel, RawStream};

fn default_depth() -> u8 {
    8
}

/// Options for decoding a raw stream. The stream is headerless, so width
/// and height are mandatory.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodeOptions {
    pub width: u32,
    pub height: u32,
    /// Bits per sample; 8 or fewer selects 1-byte samples, more selects
    /// big-endian 2-byte samples.
    #[serde(default = "default_depth")]
    pub depth: u8,
    #[serde(default)]
    pub interlace: Option<Interlace>,
    /// "HxV" geometry string, defaulting to "2x2".
    #[serde(default)]
    pub sampling_factor: Option<String>,
    /// Upper bound on the number of frames decoded from a multi-frame
    /// stream; `None` decodes until the stream is exhausted and
    /// `Some(0)` decodes nothing.
    #[serde(default)]
    pub scene_limit: Option<u64>,
}

impl DecodeOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth: 8,
            interlace: None,
            sampling_factor: None,
            scene_limit: None,
        }
    }
}

/// Decodes every frame of the raw stream at `path`.
pub fn decode_file(path: &Path, options: &DecodeOptions) -> Result<Vec<YccFrame>, CodecError> {
    decode_file_with_progress(path, options, &mut NoProgress)
}

/// Like [`decode_file`], reporting per-scanline progress and honoring
/// cancellation at row boundaries. On cancellation, and on truncation
/// after at least one complete frame, the frames completed so far are
/// returned; the aborted frame is discarded.
pub fn decode_file_with_progress(
    path: &Path,
    options: &DecodeOptions,
    progress: &mut dyn Progress,
) -> Result<Vec<YccFrame>, CodecError> {
    if options.width == 0 || options.height == 0 {
        return Err(CodecError::InvalidDimensions);
    }
    let layout = SignalLayout::resolve(
        options.interlace,
        options.sampling_factor.as_deref(),
        options.depth,
    )?;
    if layout.packed() && options.width % 2 != 0 {
        return Err(CodecError::OddPackedWidth(options.width));
    }
    if options.scene_limit == Some(0) {
        return Ok(Vec::new());
    }

    let mut buffer = ScanlineBuffer::with_capacity(layout.probe_row_bytes(options.width));
    let mut stream: Option<RawStream> = None;
    let mut frames: Vec<YccFrame> = Vec::new();
    let mut carried_row = false;

    loop {
        let outcome = decode_frame(
            path,
            &layout,
            options,
            stream.take(),
            &mut buffer,
            carried_row,
            progress,
        );
        match outcome {
            Ok((frame, trailing)) => {
                debug!(frame = frames.len(), "frame decoded");
                frames.push(frame);
                stream = Some(trailing);
            }
            Err(CodecError::Cancelled) => {
                debug!(
                    completed = frames.len(),
                    "decode cancelled; keeping completed frames"
                );
                return Ok(frames);
            }
            Err(err @ (CodecError::ShortRead { .. } | CodecError::UnexpectedEndOfFile { .. }))
                if !frames.is_empty() =>
            {
                warn!(
                    error = %err,
                    completed = frames.len(),
                    "stream truncated; returning completed frames"
                );
                return Ok(frames);
            }
            Err(err) => return Err(err),
        }

        if let Some(limit) = options.scene_limit {
            if frames.len() as u64 >= limit {
                break;
            }
        }

        // A partition file set holds exactly one frame per plane file.
        if layout.interlace == Interlace::Partition {
            break;
        }

        let Some(current) = stream.as_mut() else {
            break;
        };
        let probe = layout.probe_row_bytes(options.width);
        let got = current.read_row(buffer.fill_target(probe))?;
        if got == 0 {
            break;
        }
        if got < probe {
            warn!(
                expected = probe,
                got, "next frame truncated at its first scanline; stopping"
            );
            break;
        }
        carried_row = true;
    }
    Ok(frames)
}

/// Decodes one frame and returns it together with the stream the trial
/// read for the next frame must use.
fn decode_frame(
    base: &Path,
    layout: &SignalLayout,
    options: &DecodeOptions,
    stream: Option<RawStream>,
    buffer: &mut ScanlineBuffer,
    carried_row: bool,
    progress: &mut dyn Progress,
) -> Result<(YccFrame, RawStream), CodecError> {
    let (width, height) = (options.width, options.height);
    let (chroma_width, chroma_height) = layout.chroma_dims(width, height);
    let mut frame = YccFrame::new(width, height)?;
    let mut chroma = ChromaPlanes::new(chroma_width, chroma_height)?;
    let total_rows = if layout.packed() {
        height as u64
    } else {
        height as u64 + 2 * chroma_height as u64
    };
    let mut ticker = Ticker::new(progress, total_rows);

    let stream = match layout.interlace {
        Interlace::Partition => {
            let mut luma = RawStream::open(base, Channel::Luma)?;
            read_luma_plane(&mut luma, &mut frame, layout, buffer, false, &mut ticker)?;
            let mut blue = RawStream::open(base, Channel::ChromaBlue)?;
            read_chroma_plane(
                &mut blue,
                &mut chroma,
                ChromaChannel::Cb,
                layout,
                buffer,
                &mut ticker,
            )?;
            let mut red = RawStream::open(base, Channel::ChromaRed)?;
            read_chroma_plane(
                &mut red,
                &mut chroma,
                ChromaChannel::Cr,
                layout,
                buffer,
                &mut ticker,
            )?;
            red
        }
        Interlace::Plane => {
            let mut stream = open_or_resume(stream, base)?;
            read_luma_plane(
                &mut stream,
                &mut frame,
                layout,
                buffer,
                carried_row,
                &mut ticker,
            )?;
            read_chroma_plane(
                &mut stream,
                &mut chroma,
                ChromaChannel::Cb,
                layout,
                buffer,
                &mut ticker,
            )?;
            read_chroma_plane(
                &mut stream,
                &mut chroma,
                ChromaChannel::Cr,
                layout,
                buffer,
                &mut ticker,
            )?;
            stream
        }
        Interlace::None => {
            let mut stream = open_or_resume(stream, base)?;
            read_packed_rows(
                &mut stream,
                &mut frame,
                &mut chroma,
                layout,
                buffer,
                carried_row,
                &mut ticker,
            )?;
            stream
        }
    };

    resample::upsample_into(&chroma, &mut frame)?;
    Ok((frame, stream))
}

fn open_or_resume(stream: Option<RawStream>, base: &Path) -> Result<RawStream, CodecError> {
    match stream {
        Some(stream) => Ok(stream),
        None => RawStream::open(base, Channel::Combined),
    }
}

/// Fills the scanline buffer with exactly `expected` bytes. A zero-byte
/// read here is a missing scanline, not a clean end of stream.
fn read_full_row(
    stream: &mut RawStream,
    buffer: &mut ScanlineBuffer,
    expected: usize,
) -> Result<(), CodecError> {
    let got = stream.read_row(buffer.fill_target(expected))?;
    if got == 0 {
        return Err(CodecError::UnexpectedEndOfFile {
            path: stream.path().to_path_buf(),
        });
    }
    if got < expected {
        return Err(CodecError::ShortRead { expected, got });
    }
    Ok(())
}

fn read_luma_plane(
    stream: &mut RawStream,
    frame: &mut YccFrame,
    layout: &SignalLayout,
    buffer: &mut ScanlineBuffer,
    carried_row: bool,
    ticker: &mut Ticker<'_>,
) -> Result<(), CodecError> {
    let row_bytes = layout.plane_row_bytes(frame.width());
    for row in 0..frame.height() {
        if !(row == 0 && carried_row) {
            read_full_row(stream, buffer, row_bytes)?;
        }
        scanline::decode_plane_row(
            buffer.filled(row_bytes),
            layout.sample_width,
            frame.y_row_mut(row),
        )?;
        ticker.tick()?;
    }
    Ok(())
}

fn read_chroma_plane(
    stream: &mut RawStream,
    chroma: &mut ChromaPlanes,
    channel: ChromaChannel,
    layout: &SignalLayout,
    buffer: &mut ScanlineBuffer,
    ticker: &mut Ticker<'_>,
) -> Result<(), CodecError> {
    let row_bytes = layout.plane_row_bytes(chroma.width());
    for row in 0..chroma.height() {
        read_full_row(stream, buffer, row_bytes)?;
        scanline::decode_plane_row(
            buffer.filled(row_bytes),
            layout.sample_width,
            chroma.row_mut(channel, row),
        )?;
        ticker.tick()?;
    }
    Ok(())
}

fn read_packed_rows(
    stream: &mut RawStream,
    frame: &mut YccFrame,
    chroma: &mut ChromaPlanes,
    layout: &SignalLayout,
    buffer: &mut ScanlineBuffer,
    carried_row: bool,
    ticker: &mut Ticker<'_>,
) -> Result<(), CodecError> {
    let row_bytes = layout.packed_row_bytes(frame.width());
    for row in 0..frame.height() {
        if !(row == 0 && carried_row) {
            read_full_row(stream, buffer, row_bytes)?;
        }
        let (cb_row, cr_row) = chroma.rows_mut(row);
        scanline::decode_packed_row(
            buffer.filled(row_bytes),
            layout.sample_width,
            frame.y_row_mut(row),
            cb_row,
            cr_row,
        )?;
        ticker.tick()?;
    }
    Ok(())
}
