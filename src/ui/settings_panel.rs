use egui::RichText;
use egui_file_dialog::FileDialog;
use morse_player::config::AppSettings;

/// Tracks which field triggered the file dialog
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FileDialogTarget {
    ExportDirectory,
}

pub fn render_settings_panel(
    ui: &mut egui::Ui,
    settings: &mut AppSettings,
    settings_changed: &mut bool,
    file_dialog: &mut FileDialog,
    file_dialog_target: &mut Option<FileDialogTarget>,
) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::CollapsingHeader::new(RichText::new("Download").strong())
            .default_open(true)
            .show(ui, |ui| {
                ui.label("Download Directory:");
                ui.horizontal(|ui| {
                    let display = if settings.export.directory.is_empty() {
                        "(current directory)".to_string()
                    } else {
                        settings.export.directory.clone()
                    };
                    ui.add(egui::TextEdit::singleline(&mut display.as_str()).desired_width(250.0));
                    if ui.button("Browse...").clicked() {
                        *file_dialog_target = Some(FileDialogTarget::ExportDirectory);
                        file_dialog.pick_directory();
                    }
                    if !settings.export.directory.is_empty() && ui.button("Clear").clicked() {
                        settings.export.directory.clear();
                        *settings_changed = true;
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("File Prefix:");
                    if ui
                        .text_edit_singleline(&mut settings.export.file_prefix)
                        .changed()
                    {
                        *settings_changed = true;
                    }
                });
            });

        ui.add_space(8.0);

        egui::CollapsingHeader::new(RichText::new("Audio").strong())
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Master Volume:");
                    if ui
                        .add(egui::Slider::new(&mut settings.audio.master_volume, 0.0..=1.0))
                        .changed()
                    {
                        *settings_changed = true;
                    }
                });
            });
    });
}
