//! RIFF/WAVE serialization for rendered Morse audio.
//!
//! Only the layout this application produces is supported: a single `fmt `
//! chunk describing 16-bit PCM followed directly by the `data` chunk.

use snafu::{ensure, Snafu};

/// Size of the canonical PCM header in bytes
pub const HEADER_LEN: usize = 44;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;
const PCM_FORMAT: u16 = 1;

/// Fields recovered from a WAVE header
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveHeader {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub data_len: u32,
}

/// Possible errors when reading a WAVE header.
#[derive(Debug, PartialEq, Snafu)]
pub enum WaveError {
    #[snafu(display("Header needs {} bytes but only {} were given", HEADER_LEN, len))]
    Truncated { len: usize },
    #[snafu(display("Expected {:?} tag at offset {}", expected, offset))]
    BadTag {
        expected: &'static str,
        offset: usize,
    },
    #[snafu(display("Unsupported audio format {}", format))]
    UnsupportedFormat { format: u16 },
}

/// Convert one float sample to signed 16-bit PCM.
///
/// Negative values scale by 0x8000 and positive ones by 0x7FFF so both ends
/// of the two's-complement range are reachable.
pub fn sample_to_i16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// Serialize the first `sample_count` samples as a mono 16-bit PCM WAVE file.
pub fn to_wave(samples: &[f32], sample_count: usize, sample_rate: u32) -> Vec<u8> {
    let sample_count = sample_count.min(samples.len());
    let data_len = (sample_count * 2) as u32;
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate * block_align as u32;

    let mut out = Vec::with_capacity(HEADER_LEN + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&PCM_FORMAT.to_le_bytes());
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());

    for &sample in &samples[..sample_count] {
        out.extend_from_slice(&sample_to_i16(sample).to_le_bytes());
    }

    out
}

/// Read back the header written by [`to_wave`]
pub fn decode_wave_header(bytes: &[u8]) -> Result<WaveHeader, WaveError> {
    ensure!(bytes.len() >= HEADER_LEN, TruncatedSnafu { len: bytes.len() });

    for (offset, expected) in [(0, "RIFF"), (8, "WAVE"), (12, "fmt "), (36, "data")] {
        ensure!(
            &bytes[offset..offset + 4] == expected.as_bytes(),
            BadTagSnafu { expected, offset }
        );
    }

    let format = read_u16(bytes, 20);
    ensure!(format == PCM_FORMAT, UnsupportedFormatSnafu { format });

    Ok(WaveHeader {
        channels: read_u16(bytes, 22),
        sample_rate: read_u32(bytes, 24),
        bits_per_sample: read_u16(bytes, 34),
        data_len: read_u32(bytes, 40),
    })
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
