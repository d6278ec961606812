use crossbeam_channel::{bounded, Sender};
use egui_file_dialog::FileDialog;

use crate::ui::{
    render_download_dialog, render_main_panel, render_settings_panel, DownloadNotice,
    FileDialogTarget,
};
use morse_player::audio::{AudioEngine, Player, PlayerState, SystemClock, TimingParams};
use morse_player::config::AppSettings;
use morse_player::export::export_wave;
use morse_player::messages::AudioCommand;

pub struct MorsePlayerApp {
    pub settings: AppSettings,
    /// Text being sent; lives only for this session
    pub text: String,
    pub settings_notice: Option<String>,

    // Audio system
    cmd_tx: Sender<AudioCommand>,
    audio_engine: Option<AudioEngine>,
    player: Player<SystemClock>,

    // UI state
    pub show_settings: bool,
    pub download_notice: Option<DownloadNotice>,
    settings_changed: bool,
    settings_unsaved: bool,

    // File dialog for settings
    file_dialog: FileDialog,
    file_dialog_target: Option<FileDialogTarget>,
}

impl MorsePlayerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let load_result = AppSettings::load_with_notice();
        let settings = load_result.settings;

        // Create channel for audio communication
        let (cmd_tx, cmd_rx) = bounded::<AudioCommand>(256);

        // Create audio engine
        let audio_engine = match AudioEngine::new(cmd_rx, settings.audio.clone()) {
            Ok(engine) => Some(engine),
            Err(e) => {
                log::warn!("Failed to initialize audio, playback will be silent: {}", e);
                None
            }
        };

        let player = Player::new(SystemClock::new(), settings.player.timing_params());

        Self {
            settings,
            text: String::new(),
            settings_notice: load_result.notice,
            cmd_tx,
            audio_engine,
            player,
            show_settings: false,
            download_notice: None,
            settings_changed: false,
            settings_unsaved: false,
            file_dialog: FileDialog::new(),
            file_dialog_target: None,
        }
    }

    fn timing_params(&self) -> TimingParams {
        self.settings.player.timing_params()
    }

    pub fn player_state(&self) -> PlayerState {
        self.player.state()
    }

    /// Progress through the current sequence as (fired, total) symbols
    pub fn progress(&self) -> (usize, usize) {
        (self.player.resume_index(), self.player.symbol_count())
    }

    pub fn mark_settings_changed(&mut self) {
        self.settings_changed = true;
    }

    pub fn play(&mut self) {
        let params = self.timing_params();
        self.player.play(&self.text, params, 0);
        log::info!(
            "Playing {} symbols at {} wpm, {} Hz",
            self.player.symbol_count(),
            params.wpm,
            params.tone_hz
        );
    }

    pub fn pause(&mut self) {
        self.player.pause();
    }

    pub fn resume(&mut self) {
        let params = self.timing_params();
        self.player.resume(&self.text, params);
    }

    pub fn restart(&mut self) {
        let params = self.timing_params();
        self.player.restart(&self.text, params);
    }

    pub fn download(&mut self) {
        self.download_notice = Some(match export_wave(&self.settings, &self.text) {
            Ok(outcome) => DownloadNotice::Saved {
                filename: outcome.filename,
                path: outcome.path,
            },
            Err(e) => {
                log::warn!("Download failed: {}", e);
                DownloadNotice::Failed {
                    message: e.to_string(),
                }
            }
        });
    }

    fn apply_settings_changes(&mut self, ctx: &egui::Context) {
        if self.settings_changed {
            // Update audio settings
            let _ = self
                .cmd_tx
                .send(AudioCommand::UpdateSettings(self.settings.audio.clone()));
            self.settings_changed = false;
            self.settings_unsaved = true;
        }

        // Save once the pointer is released, not on every slider drag frame
        if self.settings_unsaved && !ctx.input(|i| i.pointer.any_down()) {
            if let Err(e) = self.settings.save() {
                log::warn!("Failed to save settings: {}", e);
            }
            self.settings_unsaved = false;
        }
    }
}

impl eframe::App for MorsePlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Fire due symbols, then hand the resulting bursts to the mixer
        self.player.tick(&mut self.cmd_tx);
        if let Some(ref engine) = self.audio_engine {
            engine.process_commands();
        }

        // Apply any settings changes
        self.apply_settings_changes(ctx);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings").clicked() {
                        self.show_settings = !self.show_settings;
                        ui.close();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Settings window (separate OS window)
        if self.show_settings {
            let settings = &mut self.settings;
            let settings_changed = &mut self.settings_changed;
            let show_settings = &mut self.show_settings;
            let file_dialog = &mut self.file_dialog;
            let file_dialog_target = &mut self.file_dialog_target;

            ctx.show_viewport_immediate(
                egui::ViewportId::from_hash_of("settings_viewport"),
                egui::ViewportBuilder::default()
                    .with_title("Settings")
                    .with_inner_size([420.0, 260.0]),
                |ctx, _class| {
                    // Update file dialog
                    file_dialog.update(ctx);

                    // Check if a directory was picked
                    if let Some(path) = file_dialog.take_picked() {
                        if let Some(path_str) = path.to_str() {
                            match file_dialog_target {
                                Some(FileDialogTarget::ExportDirectory) => {
                                    settings.export.directory = path_str.to_string();
                                    *settings_changed = true;
                                }
                                None => {}
                            }
                            *file_dialog_target = None;
                        }
                    }

                    egui::CentralPanel::default().show(ctx, |ui| {
                        render_settings_panel(
                            ui,
                            settings,
                            settings_changed,
                            file_dialog,
                            file_dialog_target,
                        );
                    });

                    if ctx.input(|i| i.viewport().close_requested()) {
                        *show_settings = false;
                    }
                },
            );
        }

        // Download result (blocks the main panel until dismissed)
        render_download_dialog(ctx, &mut self.download_notice);

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(self.download_notice.is_none(), |ui| {
                render_main_panel(ui, self);
            });
        });

        // Wake up when the next symbol is due, and keep going while bursts sound
        if let Some(wait) = self.player.time_until_next() {
            ctx.request_repaint_after(wait);
        }
        let sounding = self
            .audio_engine
            .as_ref()
            .is_some_and(|engine| engine.active_bursts() > 0);
        if sounding || self.settings_unsaved {
            ctx.request_repaint();
        }
    }
}
