pub mod download_dialog;
pub mod main_panel;
pub mod settings_panel;

pub use download_dialog::{render_download_dialog, DownloadNotice};
pub use main_panel::render_main_panel;
pub use settings_panel::{render_settings_panel, FileDialogTarget};
