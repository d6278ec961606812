//! Text to Morse code: encoding, real-time playback scheduling, offline
//! rendering and WAVE export.

pub mod audio;
pub mod config;
pub mod export;
pub mod messages;
pub mod wave;
