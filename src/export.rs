use crate::audio::render;
use crate::config::AppSettings;
use crate::wave::to_wave;
use chrono::{DateTime, Utc};
use snafu::{ensure, ResultExt, Snafu};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

const DEFAULT_PREFIX: &str = "morseplayer";

/// Possible errors when downloading a rendered file.
#[derive(Debug, Snafu)]
pub enum ExportError {
    #[snafu(display("Enter some text first!"))]
    EmptyText,
    #[snafu(display("Failed to write {}: {}", path.display(), source))]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result of a successful download
#[derive(Clone, Debug)]
pub struct ExportOutcome {
    pub filename: String,
    pub path: PathBuf,
}

/// Filename for a download made at `now`: `<prefix>-YYYYMMDDHHMMSS.wav` (UTC)
pub fn wave_filename(prefix: &str, now: DateTime<Utc>) -> String {
    let prefix = match prefix.trim() {
        "" => DEFAULT_PREFIX,
        trimmed => trimmed,
    };
    format!("{}-{}.wav", prefix, now.format("%Y%m%d%H%M%S"))
}

/// Render `text` with the current player settings and write it as a WAVE
/// file into the export directory.
pub fn export_wave(settings: &AppSettings, text: &str) -> Result<ExportOutcome, ExportError> {
    export_wave_at(settings, text, Utc::now())
}

fn export_wave_at(
    settings: &AppSettings,
    text: &str,
    now: DateTime<Utc>,
) -> Result<ExportOutcome, ExportError> {
    ensure!(!text.is_empty(), EmptyTextSnafu);

    let buffer = render(text, settings.player.timing_params());
    let bytes = to_wave(&buffer.samples, buffer.len(), buffer.sample_rate);

    let filename = wave_filename(&settings.export.file_prefix, now);
    let path = settings.export.output_dir().join(&filename);

    let mut file = File::create(&path).context(WriteSnafu { path: &path })?;
    file.write_all(&bytes).context(WriteSnafu { path: &path })?;

    log::info!(
        "Wrote {} ({:.2}s, {} bytes)",
        path.display(),
        buffer.duration_seconds(),
        bytes.len()
    );

    Ok(ExportOutcome {
        filename,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::{decode_wave_header, HEADER_LEN};
    use chrono::TimeZone;

    fn settings_in(name: &str) -> AppSettings {
        let dir = std::env::temp_dir().join(format!(
            "morse_player_export_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let mut settings = AppSettings::default();
        settings.export.directory = dir.to_string_lossy().into_owned();
        settings
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 42).unwrap()
    }

    #[test]
    fn test_wave_filename() {
        let name = wave_filename("morseplayer", fixed_time());
        assert_eq!(name, "morseplayer-20240309070542.wav");
        let stamp = name
            .trim_start_matches("morseplayer-")
            .trim_end_matches(".wav");
        assert_eq!(stamp.len(), 14);

        assert_eq!(
            wave_filename("  ", fixed_time()),
            "morseplayer-20240309070542.wav"
        );
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let settings = settings_in("empty");
        let err = export_wave_at(&settings, "", fixed_time()).unwrap_err();
        assert!(matches!(err, ExportError::EmptyText));
        assert_eq!(err.to_string(), "Enter some text first!");

        let dir = settings.export.output_dir();
        assert_eq!(std::fs::read_dir(dir).unwrap().count(), 0);
    }

    #[test]
    fn test_sos_scenario() {
        let mut settings = settings_in("sos");
        settings.player.tone_hz = 600;
        settings.player.wpm = 20;
        settings.player.volume_percent = 50;

        let outcome = export_wave_at(&settings, "SOS", fixed_time()).unwrap();
        assert_eq!(outcome.filename, "morseplayer-20240309070542.wav");

        let bytes = std::fs::read(&outcome.path).unwrap();
        let header = decode_wave_header(&bytes).unwrap();
        assert_eq!(header.sample_rate, 44100);
        assert_eq!(header.channels, 1);
        assert_eq!(header.bits_per_sample, 16);
        // 30 units of 2646 samples, 2 bytes each
        assert_eq!(header.data_len, 30 * 2646 * 2);
        assert_eq!(bytes.len(), HEADER_LEN + header.data_len as usize);
    }

    #[test]
    fn test_unmappable_text_gives_silent_file() {
        let settings = settings_in("unmappable");
        let outcome = export_wave_at(&settings, "!!!", fixed_time()).unwrap();
        let bytes = std::fs::read(&outcome.path).unwrap();
        let header = decode_wave_header(&bytes).unwrap();
        // Two bare separators, 3 silent units each
        assert_eq!(header.data_len, 2 * 3 * 2646 * 2);
        assert!(bytes[HEADER_LEN..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_missing_directory_reports_path() {
        let mut settings = AppSettings::default();
        settings.export.directory = std::env::temp_dir()
            .join("morse_player_export_does_not_exist")
            .join("deeper")
            .to_string_lossy()
            .into_owned();

        let err = export_wave_at(&settings, "E", fixed_time()).unwrap_err();
        match err {
            ExportError::Write { path, .. } => {
                assert!(path.ends_with("morseplayer-20240309070542.wav"))
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
