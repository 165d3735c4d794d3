use egui::{Context, TextEdit};

use crate::app::RevisionApp;
use crate::ui::helpers::message_line;
use crate::ui::layout::{centered_panel, two_button_row};

pub fn ui_login(app: &mut RevisionApp, ctx: &Context) {
    centered_panel(ctx, 300.0, 420.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("🧠 BrainMap Revision");
            ui.label("Sign in to keep levelling up");
        });
        ui.add_space(16.0);

        ui.label("Email");
        ui.add(TextEdit::singleline(&mut app.login_form.email).desired_width(f32::INFINITY));
        ui.add_space(6.0);
        ui.label("Password");
        ui.add(
            TextEdit::singleline(&mut app.login_form.password)
                .password(true)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(6.0);
        ui.checkbox(&mut app.remember_me, "Remember me on this device");
        ui.add_space(12.0);

        let (sign_in, sign_up) = two_button_row(ui, 380.0, "Sign in", "Create account");
        if sign_in {
            app.sign_in();
        }
        if sign_up {
            app.go_to_sign_up();
        }

        ui.add_space(6.0);
        ui.vertical_centered(|ui| {
            if ui.link("Forgot your password?").clicked() {
                app.go_to_reset_password();
            }
        });

        message_line(ui, &app.message.clone());
    });
}
