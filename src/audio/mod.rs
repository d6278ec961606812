mod engine;
mod mixer;
pub mod morse;
pub mod player;
pub mod render;

pub use engine::AudioEngine;
pub use morse::TimingParams;
pub use player::{Player, PlayerState, SystemClock};
pub use render::render;
