use eframe::NativeOptions;

mod app;
mod config;

fn main() {
    tracing_subscriber::fmt::init();
    let options = NativeOptions::default();
    if let Err(e) = eframe::run_native(
        "SimScope",
        options,
        Box::new(|_cc| {
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(Box::new(app::UiApp::new()))
        }),
    ) {
        eprintln!("Application stopped with error: {e}");
    }
}
