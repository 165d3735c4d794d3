use egui::{ComboBox, Context, TextEdit};

use crate::app::RevisionApp;
use crate::ui::helpers::message_line;
use crate::ui::layout::{centered_panel, two_button_row};

pub fn ui_classroom_create(app: &mut RevisionApp, ctx: &Context) {
    centered_panel(ctx, 300.0, 460.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading("New classroom");
        });
        ui.add_space(12.0);

        ui.label("Name");
        ui.add(TextEdit::singleline(&mut app.classroom_form.name).desired_width(f32::INFINITY));
        ui.add_space(6.0);

        ui.label("Subject");
        let selected_name = app
            .classroom_form
            .subject_id
            .and_then(|id| app.subjects.iter().find(|s| s.id == id))
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "Any subject".to_owned());
        ComboBox::from_id_salt("classroom_subject")
            .selected_text(selected_name)
            .width(200.0)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut app.classroom_form.subject_id, None, "Any subject");
                for subject in &app.subjects {
                    ui.selectable_value(
                        &mut app.classroom_form.subject_id,
                        Some(subject.id),
                        &subject.name,
                    );
                }
            });
        ui.add_space(6.0);

        ui.label("Year group (optional)");
        ui.add(
            TextEdit::singleline(&mut app.classroom_form.year_group)
                .hint_text("e.g. Year 8")
                .desired_width(f32::INFINITY),
        );
        ui.add_space(12.0);

        let (create, back) = two_button_row(ui, 420.0, "Create classroom", "Back");
        if create {
            app.create_classroom();
        }
        if back {
            app.go_to_classrooms();
        }

        message_line(ui, &app.message.clone());
    });
}
