use egui::{Context, ScrollArea};

use crate::app::RevisionApp;
use crate::ui::helpers::{message_line, topic_tile};
use crate::ui::layout::simple_panel;

pub fn ui_quiz_list(app: &mut RevisionApp, ctx: &Context) {
    simple_panel(ctx, 640.0, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Pick a quiz");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("⟳ Refresh").clicked() {
                    app.go_to_quiz_list();
                }
            });
        });
        ui.add_space(8.0);

        if app.topic_cards.is_empty() {
            ui.label("No quizzes are available yet. Check back soon!");
        }

        let tile_w = ui.available_width().min(600.0);
        let mut start_card = None;
        ScrollArea::vertical().show(ui, |ui| {
            for card in &app.topic_cards {
                let label = format!("{} — {}", card.subject_name, card.topic);
                let plural = if card.question_count == 1 { "" } else { "s" };
                let detail = format!("{} question{plural}", card.question_count);
                let (start, retake) = topic_tile(ui, &label, &detail, tile_w, card.completed);
                if start || retake {
                    start_card = Some(card.clone());
                }
                ui.add_space(6.0);
            }
        });
        if let Some(card) = start_card {
            app.start_quiz(&card);
        }

        message_line(ui, &app.message.clone());
    });
}
