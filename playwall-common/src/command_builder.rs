use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use crate::display::Display;

#[derive(Debug, Clone)]
pub struct CommandBuilder {
    player_path: PathBuf,
    log_dir: PathBuf,
}

impl CommandBuilder {
    pub fn new(player_path: PathBuf, log_dir: PathBuf) -> Self {
        Self { player_path, log_dir }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Per-display log file; the same path is reused across rotations.
    pub fn log_file(&self, display_index: usize) -> PathBuf {
        self.log_dir.join(format!("mpv_log_screen_{}.txt", display_index))
    }

    pub fn build_play_command(&self, video: &Path, display: &Display) -> Command {
        let mut cmd = Command::new(&self.player_path);
        cmd.arg("--loop-file=inf");
        cmd.arg("--fullscreen");
        cmd.arg(format!("--fs-screen={}", display.index));
        // Geometry as well, for window managers that ignore --fs-screen
        cmd.arg(format!("--geometry={}", display.geometry()));
        cmd.arg("--no-border");
        cmd.arg("--no-osc");
        cmd.arg("--no-input-default-bindings");

        let mut log_arg = std::ffi::OsString::from("--log-file=");
        log_arg.push(self.log_file(display.index));
        cmd.arg(log_arg);

        cmd.arg("--");
        cmd.arg(video);

        cmd.stdin(Stdio::null());
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_play_command_arguments() {
        let builder = CommandBuilder::new(PathBuf::from("/usr/bin/mpv"), PathBuf::from("/var/log/playwall"));
        let display = Display::new(1, 1920, 0, 1920, 1080);
        let cmd = builder.build_play_command(Path::new("/videos/city scan.mp4"), &display);

        assert_eq!(cmd.get_program(), OsStr::new("/usr/bin/mpv"));
        assert_eq!(
            args(&cmd),
            vec![
                "--loop-file=inf",
                "--fullscreen",
                "--fs-screen=1",
                "--geometry=1920x1080+1920+0",
                "--no-border",
                "--no-osc",
                "--no-input-default-bindings",
                "--log-file=/var/log/playwall/mpv_log_screen_1.txt",
                "--",
                "/videos/city scan.mp4",
            ]
        );
    }

    #[test]
    fn test_video_path_is_a_single_argument() {
        let builder = CommandBuilder::new(PathBuf::from("mpv"), PathBuf::from("."));
        let display = Display::new(0, 0, 0, 1280, 720);
        let cmd = builder.build_play_command(Path::new("/videos/a\"; rm -rf x.mp4"), &display);

        assert_eq!(args(&cmd).last().map(String::as_str), Some("/videos/a\"; rm -rf x.mp4"));
    }

    #[test]
    fn test_log_file_is_keyed_by_display() {
        let builder = CommandBuilder::new(PathBuf::from("mpv"), PathBuf::from("/logs"));
        assert_eq!(builder.log_file(3), PathBuf::from("/logs/mpv_log_screen_3.txt"));
    }
}
