use super::AlignError;
use crate::image::io::load_frame;
use crate::image::Frame;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of one blocking read.
#[derive(Debug)]
pub enum FrameRead {
    Frame(Frame),
    /// A transient failure; the next read may succeed.
    Dropped,
    /// The source has no more frames.
    Closed,
}

/// An open frame source. Dropping the stream releases the device.
pub trait FrameStream {
    fn read(&mut self) -> FrameRead;
}

/// Something that can be opened into a [`FrameStream`].
pub trait CaptureDevice {
    type Stream: FrameStream;

    fn open(&mut self) -> Result<Self::Stream, AlignError>;
}

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Replays the images of a directory, sorted by file name.
#[derive(Clone, Debug)]
pub struct ImageSequenceDevice {
    dir: PathBuf,
}

impl ImageSequenceDevice {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, String> {
        let entries =
            fs::read_dir(dir).map_err(|e| format!("Failed to read {}: {e}", dir.display()))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        paths.sort();
        Ok(paths)
    }
}

impl CaptureDevice for ImageSequenceDevice {
    type Stream = ImageSequenceStream;

    fn open(&mut self) -> Result<Self::Stream, AlignError> {
        let frames = Self::list_frames(&self.dir).map_err(AlignError::CaptureUnavailable)?;
        if frames.is_empty() {
            return Err(AlignError::CaptureUnavailable(format!(
                "no frames in {}",
                self.dir.display()
            )));
        }
        log::info!(
            "capture: opened {} ({} frames)",
            self.dir.display(),
            frames.len()
        );
        Ok(ImageSequenceStream {
            frames: frames.into_iter(),
        })
    }
}

pub struct ImageSequenceStream {
    frames: std::vec::IntoIter<PathBuf>,
}

impl FrameStream for ImageSequenceStream {
    fn read(&mut self) -> FrameRead {
        let Some(path) = self.frames.next() else {
            return FrameRead::Closed;
        };
        match load_frame(&path) {
            Ok(frame) => FrameRead::Frame(frame),
            Err(err) => {
                log::warn!("capture: {err}");
                FrameRead::Dropped
            }
        }
    }
}

impl Drop for ImageSequenceStream {
    fn drop(&mut self) {
        log::debug!("capture: released ({} frames unread)", self.frames.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::io::save_frame;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hang_guide_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn missing_directory_is_unavailable() {
        let mut dev = ImageSequenceDevice::new("/definitely/not/here");
        assert!(matches!(dev.open(), Err(AlignError::CaptureUnavailable(_))));
    }

    #[test]
    fn frames_are_read_in_name_order_then_closed() {
        let dir = scratch_dir("seq");
        for (name, v) in [("b.png", 20u8), ("a.png", 10), ("notes.txt", 0)] {
            let path = dir.join(name);
            if name.ends_with(".png") {
                let mut f = Frame::new(4, 3, 3);
                f.pixel_mut(0, 0).copy_from_slice(&[v, v, v]);
                save_frame(&f, &path).expect("write frame");
            } else {
                fs::write(&path, "x").expect("write text");
            }
        }
        let mut stream = ImageSequenceDevice::new(&dir).open().expect("opens");
        let first = match stream.read() {
            FrameRead::Frame(f) => f,
            other => panic!("expected frame, got {other:?}"),
        };
        assert_eq!(first.pixel(0, 0), &[10, 10, 10]);
        assert!(matches!(stream.read(), FrameRead::Frame(_)));
        assert!(matches!(stream.read(), FrameRead::Closed));
        let _ = fs::remove_dir_all(&dir);
    }
}
