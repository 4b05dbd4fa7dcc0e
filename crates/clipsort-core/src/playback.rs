//! Audio playback port for the file under review.

/// Instruction for whoever owns the playback device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackCommand {
    /// A new file is under review; stop anything playing and load it.
    Bind { file_path: String },
    /// Nothing is under review any more.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// The single playback element, exclusively owned by the reviewed file.
pub trait Playback: Send {
    fn bind(&mut self, file_path: &str);

    /// Play when paused or idle-with-a-source, pause when playing.
    fn toggle(&mut self);

    fn reset(&mut self);

    fn state(&self) -> PlaybackState;

    /// Pick up changes made outside of `toggle`, e.g. a player that ran to
    /// the end of the file.
    fn refresh(&mut self) {}

    fn apply(&mut self, command: &PlaybackCommand) {
        match command {
            PlaybackCommand::Bind { file_path } => self.bind(file_path),
            PlaybackCommand::Reset => self.reset(),
        }
    }
}

/// Playback that only tracks state; used when no player is configured.
#[derive(Debug, Default)]
pub struct TrackingPlayback {
    source: Option<String>,
    state: PlaybackState,
}

impl TrackingPlayback {
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl Playback for TrackingPlayback {
    fn bind(&mut self, file_path: &str) {
        self.source = Some(file_path.to_string());
        self.state = PlaybackState::Paused;
    }

    fn toggle(&mut self) {
        self.state = match (self.state, &self.source) {
            (_, None) => PlaybackState::Idle,
            (PlaybackState::Playing, Some(_)) => PlaybackState::Paused,
            (_, Some(_)) => PlaybackState::Playing,
        };
    }

    fn reset(&mut self) {
        self.source = None;
        self.state = PlaybackState::Idle;
    }

    fn state(&self) -> PlaybackState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_without_source_stays_idle() {
        let mut p = TrackingPlayback::default();
        p.toggle();
        assert_eq!(p.state(), PlaybackState::Idle);
    }

    #[test]
    fn rebinding_resets_to_paused() {
        let mut p = TrackingPlayback::default();
        p.apply(&PlaybackCommand::Bind {
            file_path: "/a.wav".into(),
        });
        p.toggle();
        assert_eq!(p.state(), PlaybackState::Playing);

        p.apply(&PlaybackCommand::Bind {
            file_path: "/b.wav".into(),
        });
        assert_eq!(p.state(), PlaybackState::Paused);
        assert_eq!(p.source(), Some("/b.wav"));

        p.apply(&PlaybackCommand::Reset);
        assert_eq!(p.state(), PlaybackState::Idle);
        assert_eq!(p.source(), None);
    }
}
