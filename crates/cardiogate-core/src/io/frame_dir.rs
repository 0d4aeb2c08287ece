use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{GatingError, Result};
use crate::frame::Frame;
use crate::io::image_io::{is_frame_file, load_image};

/// A pullback acquisition stored as one image per frame.
///
/// Frames are ordered by file name, so zero-padded numbering is expected.
#[derive(Clone, Debug)]
pub struct FrameDirectory {
    root: PathBuf,
    paths: Vec<PathBuf>,
}

impl FrameDirectory {
    /// Index every frame image directly inside `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_frame_file(&path) {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            warn!(dir = %dir.display(), "no frame images found");
            return Err(GatingError::EmptySequence);
        }
        paths.sort();
        debug!(dir = %dir.display(), frames = paths.len(), "indexed frame directory");
        Ok(Self {
            root: dir.to_path_buf(),
            paths,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn frame_count(&self) -> usize {
        self.paths.len()
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Read the frame at 0-based `index`.
    pub fn read_frame(&self, index: usize) -> Result<Frame> {
        let path = self.paths.get(index).ok_or(GatingError::InvalidFrameRange {
            lower: index,
            upper: index + 1,
            total: self.paths.len(),
        })?;
        load_image(path)
    }

    /// Lazily decode frames in order.
    pub fn frames(&self) -> impl Iterator<Item = Result<Frame>> + '_ {
        self.paths.iter().map(|p| load_image(p))
    }

    /// Decode all frames, failing on the first unreadable file or on a
    /// frame whose size differs from the first one.
    pub fn read_all(&self) -> Result<Vec<Frame>> {
        let frames = self.frames().collect::<Result<Vec<_>>>()?;
        check_uniform(&frames)?;
        Ok(frames)
    }
}

/// Every frame must have the shape of the first.
pub fn check_uniform(frames: &[Frame]) -> Result<()> {
    let Some(first) = frames.first() else {
        return Err(GatingError::EmptySequence);
    };
    let expected = first.width() * first.height();
    for frame in &frames[1..] {
        if frame.data.dim() != first.data.dim() {
            return Err(GatingError::DimensionMismatch {
                expected,
                actual: frame.width() * frame.height(),
            });
        }
    }
    Ok(())
}
