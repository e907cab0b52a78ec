//! Offline device: screenshots from a directory, swipes recorded

use std::io;
use std::path::{Path, PathBuf};

use super::DeviceController;
use crate::planner::Swipe;
use crate::vision::Screenshot;
use crate::{Error, Result};

const EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Plays back saved screenshots in file name order
#[derive(Debug)]
pub struct ReplayController {
    frames: Vec<PathBuf>,
    next: usize,
    current: Option<PathBuf>,
    loop_playback: bool,
    swipes: Vec<Swipe>,
}

impl ReplayController {
    /// Collect every image in `dir`
    pub fn from_directory(dir: impl AsRef<Path>, loop_playback: bool) -> Result<Self> {
        let dir = dir.as_ref();
        let mut frames = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false);
            if path.is_file() && is_image {
                frames.push(path);
            }
        }
        frames.sort();

        if frames.is_empty() {
            return Err(Error::NoFrames(dir.to_path_buf()));
        }
        log::info!("Replaying {} screenshots from {:?}", frames.len(), dir);
        Ok(Self::from_frames(frames, loop_playback))
    }

    /// Replay an explicit list of files
    pub fn from_frames(frames: Vec<PathBuf>, loop_playback: bool) -> Self {
        Self {
            frames,
            next: 0,
            current: None,
            loop_playback,
            swipes: Vec::new(),
        }
    }

    /// Number of screenshots available
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Swipes that would have been sent, oldest first
    pub fn swipes(&self) -> &[Swipe] {
        &self.swipes
    }
}

impl DeviceController for ReplayController {
    fn capture_screen(&mut self) -> Result<()> {
        if self.next >= self.frames.len() {
            if !self.loop_playback || self.frames.is_empty() {
                self.current = None;
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "replay has no more screenshots",
                )));
            }
            self.next = 0;
        }
        self.current = Some(self.frames[self.next].clone());
        self.next += 1;
        Ok(())
    }

    fn fetch_screen(&mut self) -> Result<Screenshot> {
        let path = self.current.as_ref().ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "no screenshot captured",
            ))
        })?;
        log::debug!("Replay frame {:?}", path);
        Screenshot::open(path)
    }

    fn swipe(&mut self, swipe: &Swipe) -> Result<()> {
        log::info!("{} (replay, not sent)", swipe);
        self.swipes.push(*swipe);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}
