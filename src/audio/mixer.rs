use super::morse::ToneGenerator;
use crate::config::AudioSettings;
use crate::messages::ToneBurst;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A tone burst being rendered by the output stream
pub struct ActiveBurst {
    tone_generator: ToneGenerator,
    samples_total: usize,
    samples_elapsed: usize,
    amplitude: f32,
}

impl ActiveBurst {
    pub fn new(burst: &ToneBurst, sample_rate: u32) -> Self {
        let samples_total = (burst.duration.as_secs_f64() * sample_rate as f64) as usize;
        let mut tone_generator = ToneGenerator::new(burst.frequency_hz, sample_rate);
        tone_generator.reset_phase();

        Self {
            tone_generator,
            samples_total,
            samples_elapsed: 0,
            amplitude: burst.amplitude,
        }
    }

    /// Generate the next sample for this burst
    /// Returns None once the burst has run its length
    pub fn next_sample(&mut self) -> Option<f32> {
        if self.is_completed() {
            return None;
        }

        let raw = self.tone_generator.next_sample();
        let envelope = self
            .tone_generator
            .envelope(self.samples_elapsed, self.samples_total);
        self.samples_elapsed += 1;

        Some(raw * envelope * self.amplitude)
    }

    pub fn is_completed(&self) -> bool {
        self.samples_elapsed >= self.samples_total
    }
}

/// Mixes overlapping tone bursts into the output stream
pub struct Mixer {
    bursts: Vec<ActiveBurst>,
    sample_rate: u32,
    settings: AudioSettings,
    rng: SmallRng,
}

impl Mixer {
    pub fn new(sample_rate: u32, settings: AudioSettings) -> Self {
        Self {
            bursts: Vec::new(),
            sample_rate,
            settings,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Start sounding a burst on top of whatever is already playing
    pub fn add_burst(&mut self, burst: &ToneBurst) {
        self.bursts.push(ActiveBurst::new(burst, self.sample_rate));
    }

    pub fn update_settings(&mut self, settings: AudioSettings) {
        self.settings = settings;
    }

    /// Fill a buffer with mixed audio
    pub fn fill_buffer(&mut self, buffer: &mut [f32]) {
        // Clear buffer
        for sample in buffer.iter_mut() {
            *sample = 0.0;
        }

        for burst in &mut self.bursts {
            for sample in buffer.iter_mut() {
                match burst.next_sample() {
                    Some(burst_sample) => *sample += burst_sample,
                    None => break,
                }
            }
        }

        self.bursts.retain(|b| !b.is_completed());

        // Apply master volume and dither; a lone burst never exceeds its
        // amplitude, so only overlapping bursts reach the clamp
        for sample in buffer.iter_mut() {
            *sample *= self.settings.master_volume;
            let dither = (self.rng.gen::<f32>() - 0.5) * 0.001;
            *sample = (*sample + dither).clamp(-1.0, 1.0);
        }
    }

    /// Number of bursts still sounding
    pub fn active_burst_count(&self) -> usize {
        self.bursts.len()
    }
}
