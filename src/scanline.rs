//! Scanline-level packing and unpacking of raw samples.
//!
//! Samples travel through the codec as 16-bit quantums. An 8-bit wire
//! sample `b` maps to the quantum `b * 257` (and back by truncating
//! division), so 8-bit data round-trips exactly; a 16-bit wire sample is
//! big-endian and maps directly.

use crate::error::CodecError;
use crate::layout::SampleWidth;

/// The scanline byte buffer, allocated once per codec invocation and
/// reused for every row, passed by exclusive reference.
#[derive(Debug)]
pub struct ScanlineBuffer {
    bytes: Vec<u8>,
}

impl ScanlineBuffer {
    pub fn with_capacity(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
        }
    }

    /// Mutable view of the first `len` bytes, for the stream to fill.
    pub fn fill_target(&mut self, len: usize) -> &mut [u8] {
        if self.bytes.len() < len {
            self.bytes.resize(len, 0);
        }
        &mut self.bytes[..len]
    }

    /// The `len` bytes most recently filled.
    pub fn filled(&self, len: usize) -> &[u8] {
        &self.bytes[..len]
    }

    /// Clears the buffer for packing a fresh row on the encode side.
    pub fn start_row(&mut self) -> &mut Vec<u8> {
        self.bytes.clear();
        &mut self.bytes
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

struct SampleReader<'a> {
    raw: &'a [u8],
    width: SampleWidth,
}

impl<'a> SampleReader<'a> {
    fn new(raw: &'a [u8], width: SampleWidth) -> Self {
        Self { raw, width }
    }

    fn next(&mut self) -> u16 {
        match self.width {
            SampleWidth::One => {
                let value = self.raw[0] as u16 * 257;
                self.raw = &self.raw[1..];
                value
            }
            SampleWidth::Two => {
                let value = u16::from_be_bytes([self.raw[0], self.raw[1]]);
                self.raw = &self.raw[2..];
                value
            }
        }
    }
}

struct SampleWriter<'a> {
    out: &'a mut Vec<u8>,
    width: SampleWidth,
}

impl<'a> SampleWriter<'a> {
    fn new(out: &'a mut Vec<u8>, width: SampleWidth) -> Self {
        Self { out, width }
    }

    fn push(&mut self, quantum: u16) {
        match self.width {
            SampleWidth::One => self.out.push((quantum / 257) as u8),
            SampleWidth::Two => self.out.extend_from_slice(&quantum.to_be_bytes()),
        }
    }
}

fn require_len(raw: &[u8], expected: usize) -> Result<(), CodecError> {
    if raw.len() != expected {
        return Err(CodecError::ShortRead {
            expected,
            got: raw.len(),
        });
    }
    Ok(())
}

/// Decodes one noninterlaced 4:2:2 scanline: W/2 groups of
/// [Cb, Y0, Cr, Y1], exactly `2 * S * W` bytes.
pub fn decode_packed_row(
    raw: &[u8],
    width: SampleWidth,
    luma: &mut [u16],
    cb: &mut [u16],
    cr: &mut [u16],
) -> Result<(), CodecError> {
    require_len(raw, 2 * width.bytes() * luma.len())?;
    let mut samples = SampleReader::new(raw, width);
    for pair in 0..luma.len() / 2 {
        cb[pair] = samples.next();
        luma[2 * pair] = samples.next();
        cr[pair] = samples.next();
        luma[2 * pair + 1] = samples.next();
    }
    Ok(())
}

/// Decodes one single-channel plane scanline of `S * W'` bytes.
pub fn decode_plane_row(
    raw: &[u8],
    width: SampleWidth,
    row: &mut [u16],
) -> Result<(), CodecError> {
    require_len(raw, width.bytes() * row.len())?;
    let mut samples = SampleReader::new(raw, width);
    for slot in row.iter_mut() {
        *slot = samples.next();
    }
    Ok(())
}

/// Packs one noninterlaced 4:2:2 scanline into `out`.
pub fn encode_packed_row(
    luma: &[u16],
    cb: &[u16],
    cr: &[u16],
    width: SampleWidth,
    out: &mut Vec<u8>,
) {
    let mut samples = SampleWriter::new(out, width);
    for pair in 0..luma.len() / 2 {
        samples.push(cb[pair]);
        samples.push(luma[2 * pair]);
        samples.push(cr[pair]);
        samples.push(luma[2 * pair + 1]);
    }
}

/// Packs one single-channel plane scanline into `out`.
pub fn encode_plane_row(row: &[u16], width: SampleWidth, out: &mut Vec<u8>) {
    let mut samples = SampleWriter::new(out, width);
    for &quantum in row {
        samples.push(quantum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_byte_samples_scale_to_quantums() {
        let mut row = [0u16; 3];
        decode_plane_row(&[0, 128, 255], SampleWidth::One, &mut row).unwrap();
        assert_eq!(row, [0, 128 * 257, 65535]);

        let mut out = Vec::new();
        encode_plane_row(&row, SampleWidth::One, &mut out);
        assert_eq!(out, vec![0, 128, 255]);
    }

    #[test]
    fn two_byte_samples_are_big_endian() {
        let mut row = [0u16; 2];
        decode_plane_row(&[0x12, 0x34, 0xAB, 0xCD], SampleWidth::Two, &mut row).unwrap();
        assert_eq!(row, [0x1234, 0xABCD]);

        let mut out = Vec::new();
        encode_plane_row(&row, SampleWidth::Two, &mut out);
        assert_eq!(out, vec![0x12, 0x34, 0xAB, 0xCD]);
    }

    #[test]
    fn packed_row_order_is_cb_y_cr_y() {
        let mut luma = [0u16; 4];
        let mut cb = [0u16; 2];
        let mut cr = [0u16; 2];
        decode_packed_row(
            &[10, 1, 20, 2, 30, 3, 40, 4],
            SampleWidth::One,
            &mut luma,
            &mut cb,
            &mut cr,
        )
        .unwrap();
        assert_eq!(luma, [257, 2 * 257, 3 * 257, 4 * 257]);
        assert_eq!(cb, [10 * 257, 30 * 257]);
        assert_eq!(cr, [20 * 257, 40 * 257]);

        let mut out = Vec::new();
        encode_packed_row(&luma, &cb, &cr, SampleWidth::One, &mut out);
        assert_eq!(out, vec![10, 1, 20, 2, 30, 3, 40, 4]);
    }

    #[test]
    fn short_input_is_rejected() {
        let mut row = [0u16; 4];
        let err = decode_plane_row(&[1, 2, 3], SampleWidth::One, &mut row).unwrap_err();
        match err {
            CodecError::ShortRead { expected, got } => {
                assert_eq!(expected, 4);
                assert_eq!(got, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
