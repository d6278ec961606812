use std::path::PathBuf;

/// Outcome of the last download, shown until the user dismisses it
#[derive(Clone, Debug, PartialEq)]
pub enum DownloadNotice {
    Saved { filename: String, path: PathBuf },
    Failed { message: String },
}

pub fn render_download_dialog(ctx: &egui::Context, notice: &mut Option<DownloadNotice>) {
    let Some(current) = notice.as_ref() else {
        return;
    };

    let (title, body, detail) = match current {
        DownloadNotice::Saved { filename, path } => (
            "Download Complete",
            format!("Download successful: {}", filename),
            Some(path.display().to_string()),
        ),
        DownloadNotice::Failed { message } => ("Download Failed", message.clone(), None),
    };

    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.label(egui::RichText::new(body).strong());
            if let Some(detail) = detail {
                ui.add_space(4.0);
                ui.label(egui::RichText::new(detail).monospace().weak());
            }
            ui.add_space(12.0);

            ui.with_layout(egui::Layout::top_down(egui::Align::Center), |ui| {
                if ui.button("OK").clicked() {
                    *notice = None;
                }
            });
            ui.add_space(4.0);
        });
}
