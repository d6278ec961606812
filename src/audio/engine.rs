use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex};

use super::mixer::Mixer;
use crate::config::AudioSettings;
use crate::messages::AudioCommand;

pub struct AudioEngine {
    mixer: Arc<Mutex<Mixer>>,
    cmd_rx: Receiver<AudioCommand>,
    _stream: cpal::Stream,
}

impl AudioEngine {
    pub fn new(
        cmd_rx: Receiver<AudioCommand>,
        settings: AudioSettings,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or("No audio output device found")?;

        let supported_config = device.default_output_config()?;
        let sample_rate = supported_config.sample_rate().0;
        log::info!(
            "Opening audio output {} at {} Hz ({:?})",
            device.name().unwrap_or_else(|_| "<unknown>".to_string()),
            sample_rate,
            supported_config.sample_format()
        );

        let mixer = Arc::new(Mutex::new(Mixer::new(sample_rate, settings)));
        let mixer_for_callback = Arc::clone(&mixer);

        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &supported_config.into(), mixer_for_callback)?
            }
            cpal::SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &supported_config.into(), mixer_for_callback)?
            }
            cpal::SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &supported_config.into(), mixer_for_callback)?
            }
            _ => return Err("Unsupported sample format".into()),
        };

        stream.play()?;

        Ok(Self {
            mixer,
            cmd_rx,
            _stream: stream,
        })
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        mixer: Arc<Mutex<Mixer>>,
    ) -> Result<cpal::Stream, cpal::BuildStreamError>
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        let channels = config.channels as usize;

        device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let num_frames = data.len() / channels;
                let mut mono_buffer = vec![0.0f32; num_frames];

                {
                    let mut mixer = mixer.lock().unwrap();
                    mixer.fill_buffer(&mut mono_buffer);
                }

                // Convert to output format (duplicate mono to all channels)
                for (frame_idx, frame) in data.chunks_mut(channels).enumerate() {
                    let sample = mono_buffer.get(frame_idx).copied().unwrap_or(0.0);
                    let converted: T = T::from_sample(sample);
                    for channel_sample in frame.iter_mut() {
                        *channel_sample = converted;
                    }
                }
            },
            |err| log::error!("Audio stream error: {}", err),
            None,
        )
    }

    /// Process pending commands (call this from the main thread periodically)
    pub fn process_commands(&self) {
        loop {
            match self.cmd_rx.try_recv() {
                Ok(cmd) => {
                    let mut mixer = self.mixer.lock().unwrap();
                    match cmd {
                        AudioCommand::PlayBurst(burst) => {
                            mixer.add_burst(&burst);
                        }
                        AudioCommand::UpdateSettings(settings) => {
                            mixer.update_settings(settings);
                        }
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Number of bursts currently sounding
    pub fn active_bursts(&self) -> usize {
        self.mixer.lock().map(|m| m.active_burst_count()).unwrap_or(0)
    }
}
