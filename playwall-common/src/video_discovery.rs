use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use crate::error::{PlaywallError, ValidationError};
use crate::Result;

const SUPPORTED_EXTENSIONS: [&str; 10] = ["mp4", "mkv", "webm", "mov", "avi", "m4v", "wmv", "mpg", "mpeg", "ts"];

/// Startup checks for the player binary and the video list.
pub struct VideoDiscovery;

impl VideoDiscovery {
    /// Walks `path` recursively and returns the video files in sorted order.
    pub fn discover_videos(path: &Path) -> Result<Vec<PathBuf>> {
        if !path.is_dir() {
            return Err(PlaywallError::Validation(ValidationError::DirectoryRead {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "Directory not found"),
            }));
        }

        let mut videos: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|p| Self::has_video_extension(p))
            .collect();
        videos.sort();

        log::info!("Discovered {} videos in {:?}", videos.len(), path);
        Ok(videos)
    }

    fn has_video_extension(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false)
    }

    pub fn validate_video(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PlaywallError::Validation(ValidationError::VideoNotFound {
                path: path.to_path_buf(),
            }));
        }
        if !path.is_file() {
            return Err(PlaywallError::Validation(ValidationError::NotAFile {
                path: path.to_path_buf(),
            }));
        }
        Ok(())
    }

    /// Explicit videos first, in the given order, then anything found in `dir`.
    /// Every entry must exist; an empty result is an error.
    pub fn collect(videos: &[PathBuf], dir: Option<&Path>) -> Result<Vec<PathBuf>> {
        let mut all = Vec::with_capacity(videos.len());
        let mut seen = HashSet::new();
        for video in videos {
            Self::validate_video(video)?;
            seen.insert(Self::identity(video));
            all.push(video.clone());
        }

        if let Some(dir) = dir {
            for video in Self::discover_videos(dir)? {
                if seen.insert(Self::identity(&video)) {
                    all.push(video);
                }
            }
        }

        if all.is_empty() {
            return Err(PlaywallError::Validation(ValidationError::NoVideos));
        }
        Ok(all)
    }

    /// Same file, however it was spelled
    fn identity(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    }

    /// Resolves the player binary: paths must exist, bare names go through `PATH`.
    pub fn resolve_player(player: &Path) -> Result<PathBuf> {
        let not_found = || PlaywallError::Validation(ValidationError::PlayerNotFound {
            path: player.to_path_buf(),
        });

        if player.components().count() > 1 || player.is_absolute() {
            return if player.is_file() { Ok(player.to_path_buf()) } else { Err(not_found()) };
        }

        which::which(player).map_err(|_| not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_discover_videos_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.mp4"), b"").unwrap();
        fs::write(dir.path().join("a.MKV"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.webm"), b"").unwrap();

        let videos = VideoDiscovery::discover_videos(dir.path()).unwrap();
        assert_eq!(
            videos,
            vec![
                dir.path().join("a.MKV"),
                dir.path().join("b.mp4"),
                dir.path().join("nested").join("c.webm"),
            ]
        );
    }

    #[test]
    fn test_missing_video_is_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.mp4");

        match VideoDiscovery::collect(&[missing.clone()], None) {
            Err(PlaywallError::Validation(ValidationError::VideoNotFound { path })) => assert_eq!(path, missing),
            other => panic!("Expected ValidationError::VideoNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_is_not_a_video() {
        let dir = tempdir().unwrap();
        match VideoDiscovery::validate_video(dir.path()) {
            Err(PlaywallError::Validation(ValidationError::NotAFile { .. })) => {},
            other => panic!("Expected ValidationError::NotAFile, got {:?}", other),
        }
    }

    #[test]
    fn test_collect_keeps_explicit_order_and_dedups() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.mp4");
        let z = dir.path().join("z.mp4");
        fs::write(&a, b"").unwrap();
        fs::write(&z, b"").unwrap();

        let videos = VideoDiscovery::collect(&[z.clone()], Some(dir.path())).unwrap();
        assert_eq!(videos, vec![z, a]);
    }

    #[test]
    fn test_collect_dedups_differently_spelled_paths() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let a = dir.path().join("a.mp4");
        fs::write(&a, b"").unwrap();
        let indirect = dir.path().join("sub").join("..").join("a.mp4");

        let videos = VideoDiscovery::collect(&[indirect.clone()], Some(dir.path())).unwrap();
        assert_eq!(videos, vec![indirect]);
    }

    #[test]
    fn test_empty_video_list_is_fatal() {
        let dir = tempdir().unwrap();
        match VideoDiscovery::collect(&[], Some(dir.path())) {
            Err(PlaywallError::Validation(ValidationError::NoVideos)) => {},
            other => panic!("Expected ValidationError::NoVideos, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_player_path() {
        let dir = tempdir().unwrap();
        let player = dir.path().join("mpv");
        fs::write(&player, b"").unwrap();

        assert_eq!(VideoDiscovery::resolve_player(&player).unwrap(), player);
        assert!(VideoDiscovery::resolve_player(&dir.path().join("vlc")).is_err());
        assert!(VideoDiscovery::resolve_player(Path::new("playwall-no-such-player")).is_err());
    }
}
