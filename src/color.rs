//! BT.601 full-range conversion between additive RGB and YCbCr.
//!
//! Raw stream samples are luma/chroma values, so the encoder transforms
//! its additive-color input before sample extraction and the CLI
//! transforms decoded frames back for viewing.

use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};

use crate::error::CodecError;
use crate::frame::YccFrame;

const QUANTUM_MAX: f32 = 65535.0;
const HALF: f32 = QUANTUM_MAX / 2.0;

/// Transforms one additive-color pixel into luma/chroma quantums.
pub fn rgb_to_ycbcr(r: u16, g: u16, b: u16) -> (u16, u16, u16) {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = -0.168_736 * r - 0.331_264 * g + 0.5 * b + HALF;
    let cr = 0.5 * r - 0.418_688 * g - 0.081_312 * b + HALF;
    (clamp_quantum(y), clamp_quantum(cb), clamp_quantum(cr))
}

/// Inverse of [`rgb_to_ycbcr`].
pub fn ycbcr_to_rgb(y: u16, cb: u16, cr: u16) -> (u16, u16, u16) {
    let y = y as f32;
    let cb = cb as f32 - HALF;
    let cr = cr as f32 - HALF;
    let r = y + 1.402 * cr;
    let g = y - 0.344_136 * cb - 0.714_136 * cr;
    let b = y + 1.772 * cb;
    (clamp_quantum(r), clamp_quantum(g), clamp_quantum(b))
}

fn clamp_quantum(value: f32) -> u16 {
    value.round().clamp(0.0, QUANTUM_MAX) as u16
}

/// Builds a planar luma/chroma frame from an additive-color image.
pub fn frame_from_rgb(image: &DynamicImage) -> Result<YccFrame, CodecError> {
    let rgb = image.to_rgb16();
    let (width, height) = rgb.dimensions();
    let len = width as usize * height as usize;
    let mut y = Vec::with_capacity(len);
    let mut cb = Vec::with_capacity(len);
    let mut cr = Vec::with_capacity(len);
    for pixel in rgb.pixels() {
        let Rgb([r, g, b]) = *pixel;
        let (py, pcb, pcr) = rgb_to_ycbcr(r, g, b);
        y.push(py);
        cb.push(pcb);
        cr.push(pcr);
    }
    YccFrame::from_planes(width, height, y, cb, cr)
}

/// Renders a decoded frame as 8-bit additive color.
pub fn frame_to_rgb8(frame: &YccFrame) -> RgbImage {
    let width = frame.width() as usize;
    ImageBuffer::from_fn(frame.width(), frame.height(), |x, y| {
        let i = y as usize * width + x as usize;
        let (r, g, b) = ycbcr_to_rgb(frame.y()[i], frame.cb()[i], frame.cr()[i]);
        Rgb([(r / 257) as u8, (g / 257) as u8, (b / 257) as u8])
    })
}

/// Renders a decoded frame as 16-bit additive color.
pub fn frame_to_rgb16(frame: &YccFrame) -> ImageBuffer<Rgb<u16>, Vec<u16>> {
    let width = frame.width() as usize;
    ImageBuffer::from_fn(frame.width(), frame.height(), |x, y| {
        let i = y as usize * width + x as usize;
        let (r, g, b) = ycbcr_to_rgb(frame.y()[i], frame.cb()[i], frame.cr()[i]);
        Rgb([r, g, b])
    })
}
