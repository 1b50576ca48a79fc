use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use rawyuv::{DecodeOptions, EncodeOptions, Interlace, YccFrame, color};
use serde_json::to_writer_pretty;
use tracing::info;
use tracing_subscriber::{EnvFilter, prelude::*};

fn main() -> Result<()> {
    configure_tracing()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode {
            input,
            output,
            size,
            depth,
            interlace,
            sampling_factor,
            frames,
            report,
        } => decode(
            input,
            output,
            size,
            depth,
            interlace,
            sampling_factor,
            frames,
            report,
        ),
        Commands::Encode {
            inputs,
            output,
            depth,
            interlace,
            sampling_factor,
        } => encode(inputs, output, depth, interlace, sampling_factor),
    }
}

fn configure_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|err| anyhow!(err.to_string()))?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn decode(
    input: PathBuf,
    output: PathBuf,
    size: (u32, u32),
    depth: u8,
    interlace: Option<Interlace>,
    sampling_factor: Option<String>,
    frames: Option<u64>,
    report: Option<PathBuf>,
) -> Result<()> {
    let options = DecodeOptions {
        width: size.0,
        height: size.1,
        depth,
        interlace,
        sampling_factor,
        scene_limit: frames,
    };
    let decoded = rawyuv::decode_file(&input, &options)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    if decoded.is_empty() {
        bail!("{} holds no complete frame", input.display());
    }

    let count = decoded.len();
    for (index, frame) in decoded.iter().enumerate() {
        let path = frame_output_path(&output, index, count);
        save_frame(frame, &path, depth)?;
        info!(frame = index, output = %path.display(), "frame written");
    }

    if let Some(path) = report {
        let infos: Vec<_> = decoded.iter().map(YccFrame::info).collect();
        let file = File::create(&path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        to_writer_pretty(file, &infos)
            .with_context(|| format!("Failed to write report JSON: {}", path.display()))?;
        info!(report = %path.display(), "Report written");
    }
    Ok(())
}

fn encode(
    inputs: Vec<PathBuf>,
    output: PathBuf,
    depth: u8,
    interlace: Option<Interlace>,
    sampling_factor: Option<String>,
) -> Result<()> {
    if inputs.is_empty() {
        bail!("At least one input image is required");
    }
    let mut images = Vec::with_capacity(inputs.len());
    for path in &inputs {
        let image = image::open(path)
            .with_context(|| format!("Failed to open image: {}", path.display()))?;
        images.push(image);
    }

    let options = EncodeOptions {
        depth,
        interlace,
        sampling_factor,
    };
    rawyuv::encode_file(&output, &images, &options)
        .with_context(|| format!("Failed to encode {}", output.display()))?;
    info!(
        frames = images.len(),
        output = %output.display(),
        "stream written"
    );
    Ok(())
}

/// Output path for frame `index`; multi-frame streams get the index spliced
/// in before the extension.
fn frame_output_path(output: &Path, index: usize, count: usize) -> PathBuf {
    if count == 1 {
        return output.to_path_buf();
    }
    let stem = output
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("frame");
    let name = match output.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{stem}-{index}.{ext}"),
        None => format!("{stem}-{index}"),
    };
    output.with_file_name(name)
}

fn save_frame(frame: &YccFrame, path: &Path, depth: u8) -> Result<()> {
    if depth > 8 {
        color::frame_to_rgb16(frame)
            .save(path)
            .with_context(|| format!("Failed to write image: {}", path.display()))
    } else {
        color::frame_to_rgb8(frame)
            .save(path)
            .with_context(|| format!("Failed to write image: {}", path.display()))
    }
}

fn parse_geometry(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH geometry, got '{value}'"))?;
    let width: u32 = w
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{value}'"))?;
    let height: u32 = h
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in '{value}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("geometry must be non-zero, got '{value}'"));
    }
    Ok((width, height))
}

#[derive(Parser)]
#[command(
    name = "rawyuv",
    version,
    about = "Raw CCIR 601 4:1:1 / 4:2:2 stream codec"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a raw stream into one image per frame.
    Decode {
        input: PathBuf,
        output: PathBuf,
        /// Frame geometry as WxH; the stream has no header to infer it from.
        #[arg(long, value_parser = parse_geometry)]
        size: (u32, u32),
        #[arg(long, default_value_t = 8)]
        depth: u8,
        #[arg(long)]
        interlace: Option<Interlace>,
        #[arg(long = "sampling-factor")]
        sampling_factor: Option<String>,
        /// Decode at most this many frames.
        #[arg(long)]
        frames: Option<u64>,
        /// Write a JSON summary of the decoded frames.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Encode one or more images as a raw stream, one frame per image.
    Encode {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value_t = 8)]
        depth: u8,
        #[arg(long)]
        interlace: Option<Interlace>,
        #[arg(long = "sampling-factor")]
        sampling_factor: Option<String>,
    },
}
