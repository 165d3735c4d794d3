use brainmap_revision::RevisionApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "BrainMap Revision",
        options,
        Box::new(|cc| Ok(Box::new(RevisionApp::new(cc)))),
    )
}
