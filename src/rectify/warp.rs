use crate::homography::Homography;
use crate::image::Frame;
use image::{GrayImage, ImageBuffer, Luma, Pixel, Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

/// Warp `src` into an `out_w × out_h` frame through `to_output`, which maps
/// source coordinates to output coordinates.
///
/// Sampling is bilinear. Output pixels whose pre-image has no full 2×2
/// neighbourhood inside `src` are black, including the source's last row and
/// column.
pub fn warp_frame(src: &Frame, to_output: &Homography, out_w: usize, out_h: usize) -> Frame {
    let channels = src.channels();
    let blank = Frame::new(out_w, out_h, channels);
    if src.is_empty() || out_w == 0 || out_h == 0 {
        return blank;
    }
    let Some(projection) = projection(to_output) else {
        log::warn!("warp: map is not invertible in single precision, output left black");
        return blank;
    };

    let (w, h) = (src.width() as u32, src.height() as u32);
    let data = src.data().to_vec();
    let warped = match channels {
        1 => GrayImage::from_raw(w, h, data)
            .map(|img| warp_buffer(&img, &projection, out_w, out_h, Luma([0]))),
        _ => RgbImage::from_raw(w, h, data)
            .map(|img| warp_buffer(&img, &projection, out_w, out_h, Rgb([0; 3]))),
    };
    warped
        .and_then(|raw| Frame::from_raw(out_w, out_h, channels, raw))
        .unwrap_or(blank)
}

fn projection(map: &Homography) -> Option<Projection> {
    let mut m = [0f32; 9];
    for (dst, &v) in m.iter_mut().zip(map.to_rows().iter().flatten()) {
        *dst = v as f32;
    }
    if m.iter().any(|v| !v.is_finite()) || m[8] == 0.0 {
        return None;
    }
    Projection::from_matrix(m)
}

fn warp_buffer<P>(
    src: &ImageBuffer<P, Vec<u8>>,
    projection: &Projection,
    out_w: usize,
    out_h: usize,
    black: P,
) -> Vec<u8>
where
    P: Pixel<Subpixel = u8> + Send + Sync,
{
    let mut out = ImageBuffer::from_pixel(out_w as u32, out_h as u32, black);
    warp_into(src, projection, Interpolation::Bilinear, black, &mut out);
    out.into_raw()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Matrix3;

    fn translation(tx: f64, ty: f64) -> Homography {
        Homography(Matrix3::new(1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0))
    }

    #[test]
    fn identity_warp_copies_interior() {
        let mut src = Frame::new(8, 6, 1);
        for y in 0..6 {
            for (i, v) in src.row_mut(y).iter_mut().enumerate() {
                *v = (10 + i * 30 + y) as u8;
            }
        }
        let out = warp_frame(&src, &Homography::identity(), 8, 6);
        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(out.pixel(x, y), src.pixel(x, y), "at {x},{y}");
            }
        }
        assert_eq!(out.pixel(7, 2), &[0]);
        assert_eq!(out.pixel(3, 5), &[0]);
    }

    #[test]
    fn rgb_channels_are_kept() {
        let mut src = Frame::new(6, 6, 3);
        src.pixel_mut(2, 3).copy_from_slice(&[10, 20, 30]);
        let out = warp_frame(&src, &translation(1.0, -1.0), 6, 6);
        assert_eq!(out.channels(), 3);
        assert_eq!(out.pixel(3, 2), &[10, 20, 30]);
    }

    #[test]
    fn outside_samples_are_black() {
        let mut src = Frame::new(4, 4, 3);
        src.pixel_mut(0, 0).copy_from_slice(&[9, 9, 9]);
        let out = warp_frame(&src, &translation(10.0, 0.0), 4, 4);
        assert!(out.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn half_pixel_shift_interpolates() {
        let src = Frame::from_raw(2, 2, 1, vec![0, 200, 0, 200]).expect("2x2");
        let out = warp_frame(&src, &translation(-0.5, 0.0), 1, 1);
        assert_eq!(out.pixel(0, 0), &[100]);
    }
}
