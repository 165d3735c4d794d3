use egui::{Context, RichText, ScrollArea};

use crate::app::RevisionApp;
use crate::model::xp_range_for_level;
use crate::ui::helpers::{big_list_button, message_line};
use crate::ui::layout::simple_panel;

pub fn ui_dashboard(app: &mut RevisionApp, ctx: &Context) {
    let Some(profile) = app.profile.clone() else {
        app.go_to_login();
        return;
    };

    simple_panel(ctx, 640.0, |ui| {
        ui.heading(format!("Welcome back, {}!", profile.username));
        let (_, next) = xp_range_for_level(profile.level);
        ui.label(format!(
            "Level {} · {} XP · {} XP to level {}",
            profile.level,
            profile.xp,
            next - profile.xp,
            profile.level + 1
        ));
        ui.add_space(16.0);

        let btn_w = ui.available_width().min(600.0);
        if big_list_button(ui, "📝 Take a quiz".to_owned(), btn_w, 44.0, true) {
            app.go_to_quiz_list();
        }
        ui.add_space(6.0);
        if big_list_button(ui, "🏫 Classrooms".to_owned(), btn_w, 44.0, true) {
            app.go_to_classrooms();
        }

        ui.add_space(20.0);
        ui.heading("Recent activity");
        if app.recent_activity.is_empty() {
            ui.label("No quizzes yet. Your attempts will show up here.");
        } else {
            ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                for row in &app.recent_activity {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&row.subject_name).strong());
                        ui.label(format!("{}/{}", row.score, row.total));
                        if row.xp_earned > 0 {
                            ui.label(format!("+{} XP", row.xp_earned));
                        }
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| ui.weak(&row.when),
                        );
                    });
                    ui.separator();
                }
            });
        }

        message_line(ui, &app.message.clone());
    });
}
