use egui::{Context, ScrollArea};

use crate::app::RevisionApp;
use crate::model::Role;
use crate::ui::helpers::{big_list_button, message_line};
use crate::ui::layout::simple_panel;

pub fn ui_classrooms(app: &mut RevisionApp, ctx: &Context) {
    let is_teacher = app
        .profile
        .as_ref()
        .is_some_and(|p| p.role == Role::Teacher);

    simple_panel(ctx, 640.0, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Classrooms");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if is_teacher {
                    if ui.button("➕ New classroom").clicked() {
                        app.go_to_classroom_create();
                    }
                } else if ui.button("🔑 Join with a code").clicked() {
                    app.go_to_classroom_join();
                }
            });
        });
        ui.add_space(8.0);

        if app.classrooms.is_empty() {
            if is_teacher {
                ui.label("You haven't created any classrooms yet.");
            } else {
                ui.label("You haven't joined a classroom yet. Ask your teacher for a code.");
            }
        }

        let tile_w = ui.available_width().min(600.0);
        let mut open = None;
        ScrollArea::vertical().show(ui, |ui| {
            for card in &app.classrooms {
                let subject = card.subject_name.as_deref().unwrap_or("General");
                let plural = if card.member_count == 1 { "" } else { "s" };
                let label = format!(
                    "{}\n{subject} · {} student{plural}",
                    card.classroom.name, card.member_count
                );
                if big_list_button(ui, label, tile_w, 48.0, true) {
                    open = Some(card.clone());
                }
                ui.add_space(6.0);
            }
        });
        if let Some(card) = open {
            app.view_classroom(card);
        }

        message_line(ui, &app.message.clone());
    });
}
