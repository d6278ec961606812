use crate::app::MorsePlayerApp;
use egui::{Color32, RichText, Vec2};
use morse_player::audio::morse::encode;
use morse_player::audio::PlayerState;

pub fn render_main_panel(ui: &mut egui::Ui, app: &mut MorsePlayerApp) {
    if let Some(notice) = app.settings_notice.clone() {
        ui.horizontal(|ui| {
            ui.label(RichText::new(notice).color(Color32::YELLOW));
            if ui.button("Dismiss").clicked() {
                app.settings_notice = None;
            }
        });
        ui.add_space(4.0);
    }

    render_text_fields(ui, app);

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    render_tone_controls(ui, app);

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    render_transport(ui, app);

    ui.add_space(8.0);
    render_status(ui, app);
}

fn render_text_fields(ui: &mut egui::Ui, app: &mut MorsePlayerApp) {
    ui.label(RichText::new("Text").strong());
    let text_edit = egui::TextEdit::multiline(&mut app.text)
        .hint_text("Type text to send")
        .desired_rows(3)
        .font(egui::TextStyle::Monospace);
    let response = ui.add_sized(Vec2::new(ui.available_width(), 60.0), text_edit);
    if response.changed() {
        app.text = app.text.to_uppercase();
    }

    ui.add_space(6.0);

    ui.label(RichText::new("Morse").strong());
    let mut morse = encode(&app.text);
    ui.add_sized(
        Vec2::new(ui.available_width(), 60.0),
        egui::TextEdit::multiline(&mut morse)
            .interactive(false)
            .desired_rows(3)
            .font(egui::TextStyle::Monospace),
    );
}

fn render_tone_controls(ui: &mut egui::Ui, app: &mut MorsePlayerApp) {
    let mut changed = false;

    egui::Grid::new("tone_controls_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Tone (Hz):");
            changed |= ui
                .add(egui::Slider::new(&mut app.settings.player.tone_hz, 200..=1200))
                .changed();
            ui.end_row();

            ui.label("Speed (WPM):");
            changed |= ui
                .add(egui::Slider::new(&mut app.settings.player.wpm, 5..=50))
                .changed();
            ui.end_row();

            ui.label("Volume (%):");
            changed |= ui
                .add(egui::Slider::new(&mut app.settings.player.volume_percent, 0..=100))
                .changed();
            ui.end_row();
        });

    if changed {
        app.mark_settings_changed();
    }
}

fn render_transport(ui: &mut egui::Ui, app: &mut MorsePlayerApp) {
    let state = app.player_state();

    ui.horizontal(|ui| {
        if ui.button("Play").clicked() {
            app.play();
        }

        ui.add_space(6.0);

        if ui
            .add_enabled(state == PlayerState::Playing, egui::Button::new("Pause"))
            .clicked()
        {
            app.pause();
        }

        if ui
            .add_enabled(state == PlayerState::Paused, egui::Button::new("Resume"))
            .clicked()
        {
            app.resume();
        }

        if ui.button("Restart").clicked() {
            app.restart();
        }

        ui.add_space(20.0);

        if ui.button("Download WAV").clicked() {
            app.download();
        }
    });
}

fn render_status(ui: &mut egui::Ui, app: &MorsePlayerApp) {
    let (fired, total) = app.progress();
    let (status_text, color) = match app.player_state() {
        PlayerState::Idle => ("Idle".to_string(), Color32::GRAY),
        PlayerState::Playing => (
            format!("Playing {}/{}", fired, total),
            Color32::from_rgb(100, 200, 100),
        ),
        PlayerState::Paused => (format!("Paused at {}/{}", fired, total), Color32::YELLOW),
    };

    ui.horizontal(|ui| {
        ui.label(RichText::new("Status:").strong());
        ui.label(RichText::new(status_text).color(color));
    });
}
