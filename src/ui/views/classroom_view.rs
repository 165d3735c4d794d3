use egui::{Context, RichText, ScrollArea};

use crate::app::RevisionApp;
use crate::model::Role;
use crate::ui::layout::simple_panel;

pub fn ui_classroom_view(app: &mut RevisionApp, ctx: &Context) {
    let Some(card) = app.open_classroom.clone() else {
        app.go_to_classrooms();
        return;
    };
    let is_teacher = app
        .profile
        .as_ref()
        .is_some_and(|p| p.role == Role::Teacher);

    simple_panel(ctx, 640.0, |ui| {
        ui.horizontal(|ui| {
            ui.heading(&card.classroom.name);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("← Back").clicked() {
                    app.go_to_classrooms();
                }
            });
        });
        if let Some(subject) = &card.subject_name {
            ui.label(subject);
        }
        if let Some(year_group) = &card.classroom.year_group {
            ui.label(year_group);
        }
        if is_teacher {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("Invite code:");
                ui.label(RichText::new(&card.classroom.invite_code).strong().monospace());
                if ui.button("📋 Copy").clicked() {
                    ctx.copy_text(card.classroom.invite_code.clone());
                }
            });
        }
        ui.separator();
        ui.add_space(8.0);

        let count = app.classroom_members.len();
        let plural = if count == 1 { "" } else { "s" };
        ui.heading(format!("{count} student{plural}"));
        let assignments = app.classroom_assignment_count;
        if assignments > 0 {
            let plural = if assignments == 1 { "" } else { "s" };
            ui.label(format!("{assignments} assignment{plural}"));
        }
        if app.classroom_members.is_empty() {
            ui.label("Nobody has joined yet. Share the invite code to get started.");
        }

        ScrollArea::vertical().show(ui, |ui| {
            for member in &app.classroom_members {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&member.username).strong());
                    ui.label(format!("Level {}", member.level));
                    ui.label(format!("{} XP", member.xp));
                    if let Some(year_group) = &member.year_group {
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| ui.weak(year_group),
                        );
                    }
                });
                ui.separator();
            }
        });
    });
}
