use std::time::Duration;

use crate::config::AudioSettings;

/// A single timed tone emitted by the real-time player
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneBurst {
    pub frequency_hz: f32,
    pub duration: Duration,
    pub amplitude: f32,
}

/// Messages from UI thread to Audio thread
#[derive(Clone, Debug)]
pub enum AudioCommand {
    /// Sound one tone burst, mixed over anything already playing
    PlayBurst(ToneBurst),
    /// Update global audio settings
    UpdateSettings(AudioSettings),
}
