//! I/O helpers for frames and JSON.
//!
//! - `load_frame`: read a PNG/JPEG/etc. into an owned RGB frame.
//! - `load_grayscale_frame`: same, converted to a single channel.
//! - `save_frame`: write a frame; the format follows the file extension.
//! - `write_json_file` / `read_json_file`: pretty JSON to and from disk.
use super::Frame;
use image::{DynamicImage, GrayImage, RgbImage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as a 3-channel RGB frame.
pub fn load_frame(path: &Path) -> Result<Frame, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    Ok(frame_from_rgb(img))
}

/// Load an image from disk and convert to 8-bit grayscale.
pub fn load_grayscale_frame(path: &Path) -> Result<Frame, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    Frame::from_raw(w, h, 1, img.into_raw())
        .ok_or_else(|| format!("Unexpected buffer layout in {}", path.display()))
}

/// Save a frame, creating parent directories. JPEG/PNG chosen by extension.
pub fn save_frame(frame: &Frame, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    to_dynamic(frame)
        .ok_or_else(|| "Failed to create image buffer".to_string())?
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Convert an `image` RGB buffer into a frame.
pub fn frame_from_rgb(img: RgbImage) -> Frame {
    let (w, h) = (img.width() as usize, img.height() as usize);
    // Length always matches for a well-formed RgbImage.
    Frame::from_raw(w, h, 3, img.into_raw()).unwrap_or_else(|| Frame::new(w, h, 3))
}

/// Expand a frame to an `image` RGB buffer (gray frames are replicated).
pub fn frame_to_rgb(frame: &Frame) -> RgbImage {
    let mut out = RgbImage::new(frame.width() as u32, frame.height() as u32);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let src = frame.pixel(x as usize, y as usize);
        px.0 = if src.len() == 3 {
            [src[0], src[1], src[2]]
        } else {
            [src[0]; 3]
        };
    }
    out
}

fn to_dynamic(frame: &Frame) -> Option<DynamicImage> {
    let (w, h) = (frame.width() as u32, frame.height() as u32);
    match frame.channels() {
        1 => GrayImage::from_raw(w, h, frame.data().to_vec()).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(w, h, frame.data().to_vec()).map(DynamicImage::ImageRgb8),
        _ => None,
    }
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

/// Read and deserialize a JSON document.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&data).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
