use crate::audio::TimingParams;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub player: PlayerSettings,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub tone_hz: u32,
    pub wpm: u32,
    /// Volume in percent (0 - 100)
    pub volume_percent: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Gain applied to the live output; 1.0 plays bursts at their own volume
    pub master_volume: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory for downloaded files; empty means the current directory
    pub directory: String,
    pub file_prefix: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            tone_hz: 600,
            wpm: 20,
            volume_percent: 50,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { master_volume: 1.0 }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            directory: String::new(),
            file_prefix: "morseplayer".to_string(),
        }
    }
}

impl PlayerSettings {
    pub fn timing_params(&self) -> TimingParams {
        TimingParams::new(
            self.tone_hz as f32,
            self.wpm,
            self.volume_percent.min(100) as f32 / 100.0,
        )
    }
}

impl ExportSettings {
    pub fn output_dir(&self) -> PathBuf {
        let dir = self.directory.trim();
        if dir.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(dir)
        }
    }
}

/// Possible errors when loading or saving settings.
#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read {}: {}", path.display(), source))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse {}: {}", path.display(), source))]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[snafu(display("Failed to serialize settings: {}", source))]
    Serialize { source: toml::ser::Error },
    #[snafu(display("Failed to write {}: {}", path.display(), source))]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub struct SettingsLoadResult {
    pub settings: AppSettings,
    pub notice: Option<String>,
}

impl AppSettings {
    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("morse_player").join("settings.toml")
        } else {
            PathBuf::from("settings.toml")
        }
    }

    /// Load settings from the default config path, or return defaults if not found
    pub fn load_with_notice() -> SettingsLoadResult {
        Self::load_from_path_with_notice(&Self::config_path())
    }

    fn load_from_path_with_notice(path: &Path) -> SettingsLoadResult {
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                SettingsLoadResult {
                    settings,
                    notice: None,
                }
            }
            Err(e) => {
                let mut notice = None;
                if path.exists() {
                    log::warn!("{}", e);
                    notice = Some(match backup_settings_file(path) {
                        Some(backup_path) => format!(
                            "Settings file was reset due to an incompatible format. Backup saved to {}",
                            backup_path.display()
                        ),
                        None => {
                            "Settings file was reset due to an incompatible format.".to_string()
                        }
                    });
                }

                log::info!(
                    "Using default settings (unable to load config at {})",
                    path.display()
                );
                SettingsLoadResult {
                    settings: Self::default(),
                    notice,
                }
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).context(ReadSnafu { path })?;
        toml::from_str(&content).context(ParseSnafu { path })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context(WriteSnafu { path: parent })?;
        }

        let content = toml::to_string_pretty(self).context(SerializeSnafu)?;
        std::fs::write(path, content).context(WriteSnafu { path })?;
        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }
}

fn backup_settings_file(path: &Path) -> Option<PathBuf> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())?;
    let file_name = path.file_name()?.to_string_lossy();
    let backup_name = format!("{}.bak.{}", file_name, timestamp);
    let backup_path = path.with_file_name(backup_name);
    if std::fs::rename(path, &backup_path).is_ok() {
        Some(backup_path)
    } else {
        None
    }
}
