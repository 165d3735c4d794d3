use egui::{Context, TextEdit};

use crate::app::RevisionApp;
use crate::model::Role;
use crate::ui::helpers::message_line;
use crate::ui::layout::{centered_panel, two_button_row};

pub fn ui_sign_up(app: &mut RevisionApp, ctx: &Context) {
    centered_panel(ctx, 420.0, 420.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("Create your account");
        });
        ui.add_space(12.0);

        ui.label("Username");
        ui.add(TextEdit::singleline(&mut app.signup_form.username).desired_width(f32::INFINITY));
        ui.add_space(6.0);
        ui.label("Email");
        ui.add(TextEdit::singleline(&mut app.signup_form.email).desired_width(f32::INFINITY));
        ui.add_space(6.0);
        ui.label("Password (at least 8 characters)");
        ui.add(
            TextEdit::singleline(&mut app.signup_form.password)
                .password(true)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(6.0);
        ui.label("Confirm password");
        ui.add(
            TextEdit::singleline(&mut app.signup_form.confirm)
                .password(true)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("I am a");
            ui.selectable_value(&mut app.signup_form.role, Role::Student, "Student");
            ui.selectable_value(&mut app.signup_form.role, Role::Teacher, "Teacher");
        });
        if app.signup_form.role == Role::Student {
            ui.add_space(6.0);
            ui.label("Year group (optional)");
            ui.add(
                TextEdit::singleline(&mut app.signup_form.year_group)
                    .hint_text("e.g. Year 8")
                    .desired_width(f32::INFINITY),
            );
        }
        ui.add_space(12.0);

        let (create, back) = two_button_row(ui, 380.0, "Create account", "Back");
        if create {
            app.sign_up();
        }
        if back {
            app.go_to_login();
        }

        message_line(ui, &app.message.clone());
    });
}
