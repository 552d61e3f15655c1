use super::traits::ImageView;

/// Borrowed 8-bit grayscale view, rows `stride` bytes apart.
///
/// Gray [`Frame`](super::Frame)s lend one of these with `stride == w`; the
/// float stages convert it with [`ImageF32::from_u8`](super::ImageF32::from_u8).
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Tightly packed view. `None` when `data` is shorter than `w * h`.
    pub fn packed(w: usize, h: usize, data: &'a [u8]) -> Option<Self> {
        (data.len() >= w * h).then_some(Self {
            w,
            h,
            stride: w,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }
}

impl ImageView for ImageU8<'_> {
    type Pixel = u8;

    fn width(&self) -> usize {
        self.w
    }

    fn height(&self) -> usize {
        self.h
    }

    fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}
