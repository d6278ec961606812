use std::time::Duration;

/// A single symbol of an encoded Morse string
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MorseSymbol {
    Dot,       // '.'
    Dash,      // '-'
    LetterGap, // ' ' between characters (and anything unrecognized)
    WordGap,   // '/'
}

impl MorseSymbol {
    pub fn from_char(ch: char) -> Self {
        match ch {
            '.' => MorseSymbol::Dot,
            '-' => MorseSymbol::Dash,
            '/' => MorseSymbol::WordGap,
            _ => MorseSymbol::LetterGap,
        }
    }

    /// Returns the tone and silence lengths of this symbol in units.
    /// Shared by the real-time player and the offline renderer.
    pub fn timing(&self) -> SymbolTiming {
        match self {
            MorseSymbol::Dot => SymbolTiming::tone(1),
            MorseSymbol::Dash => SymbolTiming::tone(3),
            MorseSymbol::LetterGap => SymbolTiming::silence(3),
            MorseSymbol::WordGap => SymbolTiming::silence(7),
        }
    }

    /// Returns true if this symbol produces a tone
    pub fn is_tone(&self) -> bool {
        matches!(self, MorseSymbol::Dot | MorseSymbol::Dash)
    }
}

/// Tone/silence split of one symbol, measured in Morse units
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolTiming {
    pub tone_units: u32,
    pub silence_units: u32,
}

impl SymbolTiming {
    /// A tone is always followed by one unit of silence (the element gap)
    fn tone(units: u32) -> Self {
        Self {
            tone_units: units,
            silence_units: 1,
        }
    }

    fn silence(units: u32) -> Self {
        Self {
            tone_units: 0,
            silence_units: units,
        }
    }

    pub fn total_units(&self) -> u32 {
        self.tone_units + self.silence_units
    }
}

/// Tone, speed and volume used to sound a Morse sequence
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimingParams {
    pub tone_hz: f32,
    pub wpm: u32,
    pub volume: f32,
}

impl TimingParams {
    pub fn new(tone_hz: f32, wpm: u32, volume: f32) -> Self {
        Self {
            tone_hz: tone_hz.max(1.0),
            wpm: wpm.max(1),
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn timer(&self) -> MorseTimer {
        MorseTimer::new(self.wpm)
    }
}

/// Length of one Morse unit (a dot) in seconds at the given speed.
///
/// Uses the classic `1.2 / wpm` approximation.
pub fn unit_duration(wpm: u32) -> f64 {
    1.2 / wpm.max(1) as f64
}

/// Converts Morse units into wall-clock durations and sample counts
#[derive(Clone, Copy, Debug)]
pub struct MorseTimer {
    unit_seconds: f64,
}

impl MorseTimer {
    pub fn new(wpm: u32) -> Self {
        Self {
            unit_seconds: unit_duration(wpm),
        }
    }

    /// Seconds per unit (dot length)
    pub fn unit_seconds(&self) -> f64 {
        self.unit_seconds
    }

    pub fn seconds(&self, units: u32) -> f64 {
        self.unit_seconds * units as f64
    }

    pub fn duration(&self, units: u32) -> Duration {
        Duration::from_secs_f64(self.seconds(units))
    }

    /// Whole samples covered by `units` at `sample_rate` (truncated)
    pub fn samples(&self, units: u32, sample_rate: u32) -> usize {
        (sample_rate as f64 * self.seconds(units)).floor() as usize
    }
}

/// Generates sine wave tones with envelope shaping
pub struct ToneGenerator {
    frequency_hz: f32,
    sample_rate: f32,
    phase: f64,
    // Envelope for click-free keying (in samples)
    ramp_samples: usize,
}

impl ToneGenerator {
    pub fn new(frequency_hz: f32, sample_rate: u32) -> Self {
        // Ramp time ~5ms to avoid clicks
        let ramp_samples = (sample_rate as f32 * 0.005) as usize;

        Self {
            frequency_hz,
            sample_rate: sample_rate as f32,
            phase: 0.0,
            ramp_samples,
        }
    }

    /// Generate a sample at the current phase
    pub fn next_sample(&mut self) -> f32 {
        let sample = (self.phase * 2.0 * std::f64::consts::PI).sin() as f32;
        self.phase += self.frequency_hz as f64 / self.sample_rate as f64;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }

    /// Apply raised cosine envelope to avoid clicks
    pub fn envelope(&self, position: usize, total: usize) -> f32 {
        let ramp = self.ramp_samples.min(total / 2);
        if ramp == 0 {
            return 1.0;
        }
        if position < ramp {
            // Attack: raised cosine ramp up
            0.5 * (1.0 - (std::f32::consts::PI * position as f32 / ramp as f32).cos())
        } else if position >= total - ramp {
            // Release: raised cosine ramp down
            let release_pos = position - (total - ramp);
            0.5 * (1.0 + (std::f32::consts::PI * release_pos as f32 / ramp as f32).cos())
        } else {
            1.0
        }
    }

    /// Reset phase (for starting fresh)
    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
    }
}

/// Look up the dot/dash pattern for an (uppercase) character
pub fn char_to_pattern(ch: char) -> Option<&'static str> {
    let pattern = match ch {
        'A' => ".-",
        'B' => "-...",
        'C' => "-.-.",
        'D' => "-..",
        'E' => ".",
        'F' => "..-.",
        'G' => "--.",
        'H' => "....",
        'I' => "..",
        'J' => ".---",
        'K' => "-.-",
        'L' => ".-..",
        'M' => "--",
        'N' => "-.",
        'O' => "---",
        'P' => ".--.",
        'Q' => "--.-",
        'R' => ".-.",
        'S' => "...",
        'T' => "-",
        'U' => "..-",
        'V' => "...-",
        'W' => ".--",
        'X' => "-..-",
        'Y' => "-.--",
        'Z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        ' ' => "/",
        _ => return None,
    };

    Some(pattern)
}

/// Encode text as a space-separated Morse string.
///
/// Text is uppercased first. A character without a pattern contributes an
/// empty pattern, so its separator is still emitted and sounds as an extra
/// letter gap.
pub fn encode(text: &str) -> String {
    text.to_uppercase()
        .chars()
        .map(|ch| char_to_pattern(ch).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split an encoded Morse string into playable symbols
pub fn symbols(encoded: &str) -> Vec<MorseSymbol> {
    encoded.chars().map(MorseSymbol::from_char).collect()
}

/// Encode text and split it into symbols in one step
pub fn text_to_symbols(text: &str) -> Vec<MorseSymbol> {
    symbols(&encode(text))
}
