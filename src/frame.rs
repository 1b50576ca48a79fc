//! The planar luma/chroma image model produced by the decoder.

use serde::Serialize;

use crate::error::CodecError;

/// A full-resolution planar YCbCr frame. Samples are 16-bit quantums, one
/// plane per channel, rows packed without stride padding.
#[derive(Debug, Clone)]
pub struct YccFrame {
    width: u32,
    height: u32,
    y: Vec<u16>,
    cb: Vec<u16>,
    cr: Vec<u16>,
}

impl YccFrame {
    pub fn new(width: u32, height: u32) -> Result<Self, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidDimensions);
        }
        let len = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            y: vec![0; len],
            cb: vec![0; len],
            cr: vec![0; len],
        })
    }

    pub fn from_planes(
        width: u32,
        height: u32,
        y: Vec<u16>,
        cb: Vec<u16>,
        cr: Vec<u16>,
    ) -> Result<Self, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::InvalidDimensions);
        }
        let len = width as usize * height as usize;
        if y.len() != len || cb.len() != len || cr.len() != len {
            return Err(CodecError::InvalidDimensions);
        }
        Ok(Self {
            width,
            height,
            y,
            cb,
            cr,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn y(&self) -> &[u16] {
        &self.y
    }

    pub fn cb(&self) -> &[u16] {
        &self.cb
    }

    pub fn cr(&self) -> &[u16] {
        &self.cr
    }

    pub fn y_row(&self, row: u32) -> &[u16] {
        let width = self.width as usize;
        &self.y[row as usize * width..][..width]
    }

    pub fn y_row_mut(&mut self, row: u32) -> &mut [u16] {
        let width = self.width as usize;
        &mut self.y[row as usize * width..][..width]
    }

    pub fn cb_row(&self, row: u32) -> &[u16] {
        let width = self.width as usize;
        &self.cb[row as usize * width..][..width]
    }

    pub fn cb_row_mut(&mut self, row: u32) -> &mut [u16] {
        let width = self.width as usize;
        &mut self.cb[row as usize * width..][..width]
    }

    pub fn cr_row(&self, row: u32) -> &[u16] {
        let width = self.width as usize;
        &self.cr[row as usize * width..][..width]
    }

    pub fn cr_row_mut(&mut self, row: u32) -> &mut [u16] {
        let width = self.width as usize;
        &mut self.cr[row as usize * width..][..width]
    }

    pub fn info(&self) -> FrameInfo {
        FrameInfo {
            width: self.width,
            height: self.height,
            colorspace: "ycbcr",
        }
    }
}

/// Serializable per-frame summary for reports.
#[derive(Debug, Clone, Serialize)]
pub struct FrameInfo {
    pub width: u32,
    pub height: u32,
    pub colorspace: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(YccFrame::new(0, 4).is_err());
        assert!(YccFrame::new(4, 0).is_err());
    }

    #[test]
    fn row_access() {
        let mut frame = YccFrame::new(3, 2).unwrap();
        frame.y_row_mut(1).copy_from_slice(&[1, 2, 3]);
        assert_eq!(frame.y_row(0), &[0, 0, 0]);
        assert_eq!(frame.y_row(1), &[1, 2, 3]);
        assert_eq!(&frame.y()[3..], &[1, 2, 3]);
    }
}
