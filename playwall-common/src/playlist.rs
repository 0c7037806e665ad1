use std::path::{Path, PathBuf};
use crate::error::{PlaywallError, DisplayError};
use crate::Result;

/// One video file plus the display it is currently assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackItem {
    path: PathBuf,
    display: usize,
}

impl PlaybackItem {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display(&self) -> usize {
        self.display
    }
}

/// The ordered playback items and their display assignment.
///
/// Order and cardinality are fixed at construction; only the per-item display
/// index changes, through [`Playlist::rotate`].
#[derive(Debug, Clone)]
pub struct Playlist {
    items: Vec<PlaybackItem>,
}

impl Playlist {
    /// Assigns the item at position `i` to display `i % display_count`.
    pub fn new(videos: Vec<PathBuf>, display_count: usize) -> Result<Self> {
        if display_count == 0 {
            return Err(PlaywallError::Display(DisplayError::NoDisplays));
        }

        if videos.len() != display_count {
            log::warn!(
                "{} displays detected, but {} videos provided",
                display_count,
                videos.len()
            );
        }

        let items = videos
            .into_iter()
            .enumerate()
            .map(|(i, path)| PlaybackItem { path, display: i % display_count })
            .collect();

        Ok(Self { items })
    }

    pub fn items(&self) -> &[PlaybackItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current display index of every item, in item order.
    pub fn assignment(&self) -> Vec<usize> {
        self.items.iter().map(|item| item.display).collect()
    }

    /// Shifts the assignment ring by one: `new[i] = old[(i + 1) % n]`.
    pub fn rotate(&mut self) {
        let mut displays = self.assignment();
        if displays.is_empty() {
            return;
        }
        displays.rotate_left(1);

        for (item, display) in self.items.iter_mut().zip(displays) {
            item.display = display;
        }
    }
}
