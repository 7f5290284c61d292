//! Audio cue sink
//!
//! The simulation never plays sound itself. It reports named cues and music
//! commands to whatever backend the host wires in. Sinks are best-effort:
//! a missing or broken backend must quietly do nothing.

use serde::{Deserialize, Serialize};

/// Sound effect cues emitted by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Ball bounced off a wall, the arena edge, or the paddle
    BallHit,
    /// Ball destroyed a brick
    BoxHit,
    /// Level cleared or game won
    Win,
    /// Game over
    Lose,
    /// Power-up caught (also used by menus)
    MenuClick,
}

impl Cue {
    /// Asset clip name for this cue
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::BallHit => "ballHit",
            Cue::BoxHit => "boxHit",
            Cue::Win => "win",
            Cue::Lose => "lose",
            Cue::MenuClick => "menuClick",
        }
    }
}

/// Background music transport commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicCommand {
    Play,
    Pause,
    Resume,
    Stop,
}

/// Fire-and-forget audio backend
pub trait AudioSink {
    /// Play a one-shot cue
    fn play(&mut self, cue: Cue);

    /// Control background music
    fn music(&mut self, command: MusicCommand);
}

/// Sink that drops everything (headless runs, no audio device)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: Cue) {}

    fn music(&mut self, _command: MusicCommand) {}
}

/// Sink that traces cues through the `log` facade
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    muted: bool,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        log::trace!("sfx {}", cue.as_str());
    }

    fn music(&mut self, command: MusicCommand) {
        if self.muted {
            return;
        }
        log::debug!("music {:?}", command);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_names() {
        assert_eq!(Cue::BallHit.as_str(), "ballHit");
        assert_eq!(Cue::BoxHit.as_str(), "boxHit");
        assert_eq!(Cue::MenuClick.as_str(), "menuClick");
    }

    #[test]
    fn test_sinks_are_usable_as_trait_objects() {
        let mut sinks: Vec<Box<dyn AudioSink>> = vec![Box::new(NullAudio), Box::new(LogAudio::new())];
        for sink in sinks.iter_mut() {
            sink.play(Cue::Win);
            sink.music(MusicCommand::Stop);
        }
    }

    #[test]
    fn test_log_audio_mute() {
        let mut sink = LogAudio::new();
        assert!(!sink.muted);
        sink.set_muted(true);
        assert!(sink.muted);
        sink.play(Cue::Lose);
    }
}
