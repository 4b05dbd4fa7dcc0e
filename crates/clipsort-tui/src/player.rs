use std::process::{Child, Command, Stdio};

use clipsort_core::playback::{Playback, PlaybackState, TrackingPlayback};

/// Plays the bound file through an external command (`ffplay`, `mpv`, ...).
///
/// Pausing stops the child; playing again restarts the file from the top.
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
    source: Option<String>,
    child: Option<Child>,
    state: PlaybackState,
}

impl CommandPlayer {
    /// Returns `None` for an empty command line.
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            source: None,
            child: None,
            state: PlaybackState::Idle,
        })
    }

    fn start(&mut self) {
        let Some(source) = &self.source else {
            self.state = PlaybackState::Idle;
            return;
        };
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => {
                tracing::debug!(pid = child.id(), source = %source, "player started");
                self.child = Some(child);
                self.state = PlaybackState::Playing;
            }
            Err(e) => {
                tracing::warn!(program = %self.program, error = %e, "failed to start player");
                self.state = PlaybackState::Paused;
            }
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Playback for CommandPlayer {
    fn bind(&mut self, file_path: &str) {
        self.stop();
        self.source = Some(file_path.to_string());
        self.state = PlaybackState::Paused;
    }

    fn toggle(&mut self) {
        self.refresh();
        match self.state {
            PlaybackState::Playing => {
                self.stop();
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Paused | PlaybackState::Idle => self.start(),
        }
    }

    fn reset(&mut self) {
        self.stop();
        self.source = None;
        self.state = PlaybackState::Idle;
    }

    fn state(&self) -> PlaybackState {
        self.state
    }

    fn refresh(&mut self) {
        let finished = match self.child.as_mut() {
            Some(child) => !matches!(child.try_wait(), Ok(None)),
            None => false,
        };
        if finished {
            self.child = None;
            self.state = PlaybackState::Paused;
        }
    }
}

impl Drop for CommandPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Pick the external player if one is configured, else state tracking only.
pub fn from_command(command: Option<&[String]>) -> Box<dyn Playback> {
    match command.and_then(CommandPlayer::new) {
        Some(player) => Box::new(player),
        None => Box::new(TrackingPlayback::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_command_falls_back_to_tracking() {
        assert!(CommandPlayer::new(&[]).is_none());
        let mut player = from_command(None);
        player.bind("/a.wav");
        assert_eq!(player.state(), PlaybackState::Paused);
        player.toggle();
        assert_eq!(player.state(), PlaybackState::Playing);
    }

    #[test]
    fn missing_program_stays_paused() {
        let mut player =
            CommandPlayer::new(&["clipsort-no-such-player-binary".to_string()]).unwrap();
        player.bind("/a.wav");
        player.toggle();
        assert_eq!(player.state(), PlaybackState::Paused);
        player.reset();
        assert_eq!(player.state(), PlaybackState::Idle);
    }

    #[test]
    fn toggle_without_source_is_idle() {
        let mut player = CommandPlayer::new(&["true".to_string()]).unwrap();
        player.toggle();
        assert_eq!(player.state(), PlaybackState::Idle);
    }
}
