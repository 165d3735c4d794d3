use egui::{Button, Color32, RichText, Ui, Vec2};

pub fn big_list_button(ui: &mut Ui, label: String, width: f32, height: f32, enabled: bool) -> bool {
    ui.add_enabled(enabled, Button::new(label).min_size(Vec2::new(width, height)))
        .clicked()
}

/// Status line under a form or list; yellow so it reads as a notice in both
/// themes.
pub fn message_line(ui: &mut Ui, message: &str) {
    if !message.is_empty() {
        ui.add_space(8.0);
        ui.label(RichText::new(message).color(Color32::YELLOW).strong());
    }
}

/// One topic tile. Returns (start, retake) clicks; completed tiles swap the
/// primary action for an explicit retake.
pub fn topic_tile(
    ui: &mut Ui,
    label: &str,
    detail: &str,
    total_width: f32,
    is_completed: bool,
) -> (bool, bool) {
    let height = 44.0;
    if !is_completed {
        let clicked = ui
            .add_sized(
                [total_width, height],
                Button::new(format!("{label}\n{detail}")),
            )
            .clicked();
        return (clicked, false);
    }

    let gap = 8.0;
    let retake_w = (total_width / 4.0).max(80.0);
    let main_w = (total_width - retake_w - gap).max(120.0);
    let mut clicked_retake = false;

    ui.horizontal(|ui| {
        let main = Button::new(format!("{label}  ✅\n{detail}")).min_size(Vec2::new(main_w, height));
        ui.add_enabled(false, main)
            .on_hover_text("Completed: retakes don't earn XP or coins");
        let retake = Button::new("⟲ Retake").min_size(Vec2::new(retake_w, height));
        if ui.add(retake).clicked() {
            clicked_retake = true;
        }
    });
    (false, clicked_retake)
}
