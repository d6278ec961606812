use super::morse::{text_to_symbols, MorseSymbol, MorseTimer, TimingParams, ToneGenerator};

/// Sample rate of every offline render
pub const RENDER_SAMPLE_RATE: u32 = 44100;

/// Mono audio rendered in memory
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl SampleBuffer {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Render `text` as Morse into a sample buffer at [`RENDER_SAMPLE_RATE`]
pub fn render(text: &str, params: TimingParams) -> SampleBuffer {
    render_symbols(&text_to_symbols(text), params, RENDER_SAMPLE_RATE)
}

/// Render a symbol sequence sample-accurately, without any wall clock.
///
/// Tones are pure sines whose phase restarts at every dot/dash; each tone is
/// followed by one unit of silence. Gaps are plain silence.
pub fn render_symbols(
    symbols: &[MorseSymbol],
    params: TimingParams,
    sample_rate: u32,
) -> SampleBuffer {
    let timer = params.timer();
    let mut samples = vec![0.0f32; rendered_len(symbols, &timer, sample_rate)];
    let mut generator = ToneGenerator::new(params.tone_hz, sample_rate);
    let mut index = 0;

    for symbol in symbols {
        let timing = symbol.timing();
        if symbol.is_tone() {
            let tone_samples = timer.samples(timing.tone_units, sample_rate);
            generator.reset_phase();
            for sample in &mut samples[index..index + tone_samples] {
                *sample = generator.next_sample() * params.volume;
            }
            index += tone_samples;
        }
        // Buffer starts zeroed, so silence only moves the cursor
        index += timer.samples(timing.silence_units, sample_rate);
    }

    debug_assert_eq!(index, samples.len());
    SampleBuffer {
        samples,
        sample_rate,
    }
}

/// Exact number of samples `render_symbols` writes for this sequence
fn rendered_len(symbols: &[MorseSymbol], timer: &MorseTimer, sample_rate: u32) -> usize {
    symbols
        .iter()
        .map(|symbol| {
            let timing = symbol.timing();
            let tone = if symbol.is_tone() {
                timer.samples(timing.tone_units, sample_rate)
            } else {
                0
            };
            tone + timer.samples(timing.silence_units, sample_rate)
        })
        .sum()
}
