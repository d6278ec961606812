mod app;
mod ui;

use app::MorsePlayerApp;

fn log_level() -> log::Level {
    match std::env::var("MORSE_PLAYER_LOG").as_deref() {
        Ok("trace") => log::Level::Trace,
        Ok("debug") => log::Level::Debug,
        Ok("warn") => log::Level::Warn,
        Ok("error") => log::Level::Error,
        _ => log::Level::Info,
    }
}

fn main() -> Result<(), eframe::Error> {
    if let Err(e) = simple_logger::init_with_level(log_level()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 420.0])
            .with_min_inner_size([420.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Morse Player",
        options,
        Box::new(|cc| Ok(Box::new(MorsePlayerApp::new(cc)))),
    )
}
