use egui::{Context, TextEdit};

use crate::app::RevisionApp;
use crate::ui::helpers::message_line;
use crate::ui::layout::{centered_panel, two_button_row};

pub fn ui_reset_password(app: &mut RevisionApp, ctx: &Context) {
    centered_panel(ctx, 220.0, 420.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("Reset your password");
        });
        ui.add_space(12.0);

        ui.label("Email");
        ui.add(TextEdit::singleline(&mut app.reset_form.email).desired_width(f32::INFINITY));
        ui.add_space(12.0);

        let send_label = if app.reset_form.sent {
            "Send again"
        } else {
            "Send reset link"
        };
        let (send, back) = two_button_row(ui, 380.0, send_label, "Back to sign in");
        if send {
            app.send_password_reset();
        }
        if back {
            app.go_to_login();
        }

        message_line(ui, &app.message.clone());
    });
}
