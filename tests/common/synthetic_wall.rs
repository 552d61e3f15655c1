use hang_guide::geometry::{convex_contains, Point2D};
use hang_guide::image::Frame;

pub const WALL: u8 = 200;
pub const BACKGROUND: u8 = 40;

/// RGB photo of a uniformly lit wall whose outline is the convex polygon
/// `corners` (tl, tr, br, bl), over a darker background.
pub fn wall_photo(width: usize, height: usize, corners: [(f64, f64); 4]) -> Frame {
    let polygon = corners.map(Point2D::from);
    let mut frame = Frame::new(width, height, 3);
    for y in 0..height {
        for x in 0..width {
            let inside = convex_contains(&polygon, Point2D::new(x as f64, y as f64));
            let v = if inside { WALL } else { BACKGROUND };
            frame.pixel_mut(x, y).copy_from_slice(&[v, v, v]);
        }
    }
    frame
}

/// Paint dark full-height vertical stripes `[x, x + width)` onto a frame.
pub fn paint_stripes(frame: &mut Frame, stripes: &[(usize, usize)], top: usize, bottom: usize) {
    for &(x0, w) in stripes {
        for y in top..bottom {
            for x in x0..x0 + w {
                frame.pixel_mut(x, y).fill(30);
            }
        }
    }
}

/// Deterministic busy texture, used as the wall seen in live frames.
pub fn textured_wall(width: usize, height: usize) -> Frame {
    let mut frame = Frame::new(width, height, 3);
    for y in 0..height {
        for x in 0..width {
            let v = ((x * 7 + y * 13) % 23) as u8 * 3 + 90;
            frame.pixel_mut(x, y).copy_from_slice(&[v, v, v]);
        }
    }
    frame
}

/// A framed picture: bright border around a coarse checker.
pub fn picture(width: usize, height: usize) -> Frame {
    let mut frame = Frame::new(width, height, 3);
    for y in 0..height {
        for x in 0..width {
            let border = x < 3 || y < 3 || x + 3 >= width || y + 3 >= height;
            let v = if border {
                250
            } else if (x / 12 + y / 12) % 2 == 0 {
                190
            } else {
                15
            };
            frame.pixel_mut(x, y).copy_from_slice(&[v, v, v]);
        }
    }
    frame
}

/// Copy `src` into `dst` with its top-left corner at `(ox, oy)`.
pub fn paste(dst: &mut Frame, src: &Frame, ox: usize, oy: usize) {
    for y in 0..src.height() {
        for x in 0..src.width() {
            dst.pixel_mut(ox + x, oy + y).copy_from_slice(src.pixel(x, y));
        }
    }
}

pub fn approx_point(p: Point2D, x: f64, y: f64, tol: f64) -> bool {
    (p.x - x).abs() <= tol && (p.y - y).abs() <= tol
}
