//! Overlay rendering for the output artifacts.
//!
//! Every function takes a frame by reference and returns a new RGB frame;
//! nothing here mutates pipeline state. Gray inputs are expanded to RGB.
use crate::border::BorderLines;
use crate::corners::Quadrilateral;
use crate::geometry::{Point2D, Segment};
use crate::grid::{Grid, Slice};
use crate::image::io::{frame_from_rgb, frame_to_rgb};
use crate::image::Frame;
use crate::matching::Match;
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut,
};
use imageproc::rect::Rect;

/// Slice tints, cycled by slice number.
pub const SLICE_TINTS: [[u8; 3]; 4] = [
    [70, 130, 180],
    [70, 180, 130],
    [180, 130, 70],
    [70, 180, 180],
];
pub const SLICE_ALPHA: f32 = 0.3;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);
const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

// 3x5 digit bitmaps, one row per entry, bit 2 is the left column.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];
const GLYPH_SCALE: i32 = 5;

fn draw_number(img: &mut RgbImage, number: usize, x: i32, y: i32, color: Rgb<u8>) {
    let text = number.to_string();
    let advance = 4 * GLYPH_SCALE;
    for (i, ch) in text.bytes().enumerate() {
        let Some(glyph) = DIGITS.get((ch - b'0') as usize) else {
            continue;
        };
        let gx = x + i as i32 * advance;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) != 0 {
                    let rect = Rect::at(gx + col * GLYPH_SCALE, y + row as i32 * GLYPH_SCALE)
                        .of_size(GLYPH_SCALE as u32, GLYPH_SCALE as u32);
                    draw_filled_rect_mut(img, rect, color);
                }
            }
        }
    }
}

fn draw_segment(img: &mut RgbImage, seg: &Segment, color: Rgb<u8>) {
    draw_line_segment_mut(
        img,
        (seg.start.x as f32, seg.start.y as f32),
        (seg.end.x as f32, seg.end.y as f32),
        color,
    );
}

fn blend_columns(img: &mut RgbImage, x0: u32, x1: u32, tint: [u8; 3], alpha: f32) {
    let x1 = x1.min(img.width());
    for y in 0..img.height() {
        for x in x0..x1 {
            let px = img.get_pixel_mut(x, y);
            for (c, &t) in px.0.iter_mut().zip(tint.iter()) {
                *c = ((1.0 - alpha) * *c as f32 + alpha * t as f32).round() as u8;
            }
        }
    }
}

/// Translucent numbered overlay of the wall slices.
pub fn draw_slices(frame: &Frame, slices: &[Slice]) -> Frame {
    let mut img = frame_to_rgb(frame);
    for slice in slices {
        let tint = SLICE_TINTS[(slice.number.saturating_sub(1)) % SLICE_TINTS.len()];
        let x0 = slice.x0.max(0.0).floor() as u32;
        let x1 = slice.x1.max(0.0).ceil() as u32;
        blend_columns(&mut img, x0, x1, tint, SLICE_ALPHA);
        let mid_x = slice.center_x() as i32;
        draw_number(&mut img, slice.number, mid_x - 10, 50, WHITE);
    }
    frame_from_rgb(img)
}

/// Grid lines in blue, lattice points in red and the selected target, if
/// any, in yellow.
pub fn draw_grid(frame: &Frame, grid: &Grid, target: Option<Point2D>) -> Frame {
    let mut img = frame_to_rgb(frame);
    for seg in grid.segments() {
        draw_segment(&mut img, seg, BLUE);
    }
    for p in grid.points() {
        draw_filled_circle_mut(&mut img, (p.x.round() as i32, p.y.round() as i32), 4, RED);
    }
    if let Some(t) = target {
        draw_filled_circle_mut(&mut img, (t.x.round() as i32, t.y.round() as i32), 6, YELLOW);
    }
    frame_from_rgb(img)
}

/// Live-frame annotation: the green target frame of the crop size centred
/// on the target, and the current detection box when there is one.
pub fn draw_target_frame(
    frame: &Frame,
    target: Point2D,
    crop_size: (usize, usize),
    detection: Option<&Match>,
) -> Frame {
    let mut img = frame_to_rgb(frame);
    let (w, h) = crop_size;
    if w > 0 && h > 0 {
        let rect = Rect::at(
            target.x.round() as i32 - (w / 2) as i32,
            target.y.round() as i32 - (h / 2) as i32,
        )
        .of_size(w as u32, h as u32);
        draw_hollow_rect_mut(&mut img, rect, GREEN);
    }
    if let Some(m) = detection.filter(|m| m.width > 0 && m.height > 0) {
        let rect = Rect::at(m.top_left.x.round() as i32, m.top_left.y.round() as i32)
            .of_size(m.width as u32, m.height as u32);
        draw_hollow_rect_mut(&mut img, rect, YELLOW);
        let c = m.center();
        draw_filled_circle_mut(&mut img, (c.x.round() as i32, c.y.round() as i32), 3, YELLOW);
    }
    frame_from_rgb(img)
}

/// Chosen border lines in green and the resolved quadrilateral in red.
pub fn draw_border_lines(frame: &Frame, lines: &BorderLines, quad: &Quadrilateral) -> Frame {
    let mut img = frame_to_rgb(frame);
    for seg in [&lines.top, &lines.bottom, &lines.left, &lines.right] {
        draw_segment(&mut img, seg, GREEN);
    }
    let pts = quad.points();
    for i in 0..4 {
        let (a, b) = (pts[i], pts[(i + 1) % 4]);
        draw_line_segment_mut(
            &mut img,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            RED,
        );
    }
    frame_from_rgb(img)
}
