use egui::{Context, TextEdit};

use crate::app::RevisionApp;
use crate::ui::helpers::message_line;
use crate::ui::layout::{centered_panel, two_button_row};

pub fn ui_classroom_join(app: &mut RevisionApp, ctx: &Context) {
    centered_panel(ctx, 220.0, 420.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("Join a classroom");
            ui.label("Enter the invite code your teacher gave you.");
        });
        ui.add_space(12.0);

        ui.add(
            TextEdit::singleline(&mut app.join_form.code)
                .hint_text("e.g. ABC123")
                .desired_width(f32::INFINITY),
        );
        ui.add_space(12.0);

        let (join, back) = two_button_row(ui, 380.0, "Join", "Back");
        if join {
            app.join_classroom();
        }
        if back {
            app.go_to_classrooms();
        }

        message_line(ui, &app.message.clone());
    });
}
