//! Frame acquisition: live capture devices and ordered image sequences.

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;

use crate::Frame;

/// Accepted still-image suffixes (case-sensitive).
pub const IMAGE_EXTENSIONS: [&str; 2] = [".png", ".jpg"];

/// Frame size requested from capture devices; drivers may not honor it
/// exactly.
pub const CAPTURE_SIZE: (u32, u32) = (600, 600);

/// Construction-time failures. Every variant is fatal: the pipeline must
/// not start on a source that failed to open.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("bad path: {0} does not exist")]
    MissingPath(PathBuf),
    #[error("bad path: no usable images under {0}")]
    NoImages(PathBuf),
    #[error("bad path: failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bad video device: invalid id")]
    BadDeviceId,
    #[error("bad video device: {0}")]
    DeviceOpen(String),
}

/// Outcome of an operator advance request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// The cursor moved to a new image.
    Moved,
    /// The cursor was already on the last image; exhaustion is now recorded
    /// and the cursor stays put.
    Exhausted,
    /// Advance past an exhausted sequence: the session is over.
    EndOfSession,
    /// Live sources have no cursor; the request is ignored.
    Ignored,
}

/// Pull interface over a live capture device or an ordered image sequence.
pub trait FrameSource {
    /// Produce a frame for this tick, if the source has a new one.
    ///
    /// Live sources block on the device read and yield a fresh frame every
    /// call; `None` means the read failed and the caller keeps its previous
    /// frame. Sequence sources yield a frame only after a granted advance
    /// request (and once at startup); `None` is otherwise routine.
    fn next_frame(&mut self) -> Option<Frame>;

    /// Apply an operator advance request to the cursor.
    fn request_advance(&mut self) -> Advance;

    /// Live sources recompute every tick and never exhaust.
    fn is_live(&self) -> bool {
        false
    }
}

/// Ordered still-image sequence over a directory or a single image file.
///
/// The file list is fixed at construction, filtered to
/// [`IMAGE_EXTENSIONS`] and sorted by name so runs are deterministic.
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    cursor: usize,
    pending: bool,
    exhausted: bool,
}

impl ImageSequence {
    /// Enumerate `path` and position the cursor on the first image.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let paths = enumerate_images(path)?;
        log::info!("image sequence: {} file(s) under {}", paths.len(), path.display());
        Ok(Self {
            paths,
            cursor: 0,
            pending: true,
            exhausted: false,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Name of the image under the cursor.
    pub fn current_name(&self) -> Option<&str> {
        self.paths[self.cursor].file_name()?.to_str()
    }
}

impl FrameSource for ImageSequence {
    fn next_frame(&mut self) -> Option<Frame> {
        if !self.pending {
            return None;
        }
        self.pending = false;

        let path = &self.paths[self.cursor];
        let decoded = ImageReader::open(path)
            .map_err(image::ImageError::IoError)
            .and_then(|reader| reader.decode());
        match decoded {
            Ok(img) => {
                log::info!("image loaded: {}", path.display());
                Some(img.to_rgb8())
            }
            Err(err) => {
                log::warn!("failed to load {}: {err}", path.display());
                None
            }
        }
    }

    fn request_advance(&mut self) -> Advance {
        if self.exhausted {
            return Advance::EndOfSession;
        }
        if self.cursor + 1 == self.paths.len() {
            self.exhausted = true;
            log::info!("image sequence: end reached");
            return Advance::Exhausted;
        }
        self.cursor += 1;
        self.pending = true;
        Advance::Moved
    }
}

/// List the usable images under `path`.
///
/// A directory yields its immediate regular files with an accepted suffix,
/// sorted by file name; an image-file path yields itself. Anything else is
/// an error, as is an enumeration that comes up empty.
pub fn enumerate_images(path: &Path) -> Result<Vec<PathBuf>, SourceError> {
    if !path.exists() {
        return Err(SourceError::MissingPath(path.to_path_buf()));
    }

    let mut paths = Vec::new();
    if path.is_dir() {
        let entries = fs::read_dir(path).map_err(|source| SourceError::ReadDir {
            path: path.to_path_buf(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| SourceError::ReadDir {
                path: path.to_path_buf(),
                source,
            })?;
            let candidate = entry.path();
            if candidate.is_file() && has_image_extension(&candidate) {
                paths.push(candidate);
            }
        }
        paths.sort();
    } else if has_image_extension(path) {
        paths.push(path.to_path_buf());
    }

    if paths.is_empty() {
        return Err(SourceError::NoImages(path.to_path_buf()));
    }
    Ok(paths)
}

fn has_image_extension(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::TempDir;

    fn write_image(dir: &Path, name: &str) {
        RgbImage::new(4, 4).save(dir.join(name)).unwrap();
    }

    fn fixture(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            write_image(dir.path(), name);
        }
        dir
    }

    #[test]
    fn enumeration_is_filtered_and_sorted() {
        let dir = fixture(&["b.png", "a.jpg", "c.png"]);
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        std::fs::write(dir.path().join("upper.PNG"), "x").unwrap();

        let paths = enumerate_images(dir.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.jpg", "b.png", "c.png"]);
    }

    #[test]
    fn single_image_file_is_a_one_element_sequence() {
        let dir = fixture(&["only.png"]);
        let seq = ImageSequence::open(&dir.path().join("only.png")).unwrap();
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn missing_path_and_empty_directory_fail_open() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            ImageSequence::open(&dir.path().join("nope")),
            Err(SourceError::MissingPath(_))
        ));
        assert!(matches!(
            ImageSequence::open(dir.path()),
            Err(SourceError::NoImages(_))
        ));
    }

    #[test]
    fn advance_visits_each_image_then_exhausts_then_ends() {
        let dir = fixture(&["0.png", "1.png", "2.png"]);
        let mut seq = ImageSequence::open(dir.path()).unwrap();

        assert!(seq.next_frame().is_some(), "first image loads at startup");
        assert_eq!(seq.current_name(), Some("0.png"));
        assert!(seq.next_frame().is_none(), "no advance, no new frame");

        assert_eq!(seq.request_advance(), Advance::Moved);
        assert!(seq.next_frame().is_some());
        assert_eq!(seq.current_name(), Some("1.png"));

        assert_eq!(seq.request_advance(), Advance::Moved);
        assert!(seq.next_frame().is_some());
        assert_eq!(seq.current_name(), Some("2.png"));

        assert_eq!(seq.request_advance(), Advance::Exhausted);
        assert!(seq.is_exhausted());
        assert_eq!(seq.current_name(), Some("2.png"), "cursor stays put");
        assert!(seq.next_frame().is_none());

        assert_eq!(seq.request_advance(), Advance::EndOfSession);
    }

    #[test]
    fn undecodable_image_yields_no_frame() {
        let dir = fixture(&["good.png"]);
        std::fs::write(dir.path().join("bad.png"), b"not an image").unwrap();

        let mut seq = ImageSequence::open(dir.path()).unwrap();
        assert!(seq.next_frame().is_none(), "bad.png sorts first and fails");
        assert_eq!(seq.request_advance(), Advance::Moved);
        assert!(seq.next_frame().is_some());
    }
}
