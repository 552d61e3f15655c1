//! Owned interleaved 8-bit raster.
//!
//! A `Frame` carries either one (gray) or three (RGB) channels. Wall photos,
//! live frames, rectified views and rendered overlays are all frames; the
//! numeric stages borrow a grayscale [`ImageU8`] or convert to [`ImageF32`].
use super::{ImageF32, ImageU8};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl Frame {
    /// Zero-filled frame.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![0; width * height * channels],
        }
    }

    /// Wrap raw interleaved bytes. Returns `None` when the length does not
    /// match `width * height * channels` or the channel count is unsupported.
    pub fn from_raw(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Option<Self> {
        if !matches!(channels, 1 | 3) || data.len() != width * height * channels {
            return None;
        }
        Some(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (y * self.width + x) * self.channels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let o = self.offset(x, y);
        &self.data[o..o + self.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let o = self.offset(x, y);
        let c = self.channels;
        &mut self.data[o..o + c]
    }

    /// Mutable access to one full row of interleaved samples.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let len = self.width * self.channels;
        &mut self.data[y * len..(y + 1) * len]
    }

    /// Single-channel copy using Rec. 601 luma weights. Gray frames are cloned.
    pub fn to_gray(&self) -> Frame {
        if self.channels == 1 {
            return self.clone();
        }
        let mut out = Frame::new(self.width, self.height, 1);
        for (dst, px) in out.data.iter_mut().zip(self.data.chunks_exact(self.channels)) {
            let luma = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
            *dst = luma.round().clamp(0.0, 255.0) as u8;
        }
        out
    }

    /// Borrow as a grayscale view. Only available for single-channel frames.
    pub fn as_gray_view(&self) -> Option<ImageU8<'_>> {
        if self.channels != 1 {
            return None;
        }
        ImageU8::packed(self.width, self.height, &self.data)
    }

    /// Grayscale float conversion in `[0, 1]`.
    pub fn to_gray_f32(&self) -> ImageF32 {
        let gray = self.to_gray();
        match gray.as_gray_view() {
            Some(view) => ImageF32::from_u8(view),
            None => ImageF32::new(self.width, self.height),
        }
    }
}
