use egui::{Button, Color32, Context, Key, RichText, TextEdit, Vec2};

use crate::app::RevisionApp;
use crate::model::QuestionKind;
use crate::ui::helpers::message_line;
use crate::ui::layout::simple_panel;

enum QuizAction {
    UseHint,
    Exit,
    Finish,
}

pub fn ui_quiz(app: &mut RevisionApp, ctx: &Context) {
    let hint_tokens = app.profile.as_ref().map_or(0, |p| p.hint_tokens);
    let message = app.message.clone();
    let mut action = None;

    let Some(session) = app.quiz.as_mut() else {
        app.go_to_dashboard();
        return;
    };

    simple_panel(ctx, 640.0, |ui| {
        ui.horizontal(|ui| {
            ui.heading(format!("{} — {}", session.subject_name, session.topic));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✖ Exit").clicked() {
                    action = Some(QuizAction::Exit);
                }
            });
        });
        ui.label(format!(
            "Question {} of {}",
            session.current + 1,
            session.total()
        ));
        if session.is_retake {
            ui.weak("Retake: no XP or coins this time");
        }
        ui.separator();
        ui.add_space(8.0);

        let question = session.current_question().clone();
        ui.label(RichText::new(&question.prompt).heading());
        ui.add_space(12.0);

        match &question.kind {
            QuestionKind::MultipleChoice { options } => {
                let option_w = ui.available_width().min(600.0);
                for (i, option) in options.iter().enumerate() {
                    let removed = session.removed_options.contains(&i);
                    let selected = session.selected == Some(i);
                    let mut button = Button::new(option).min_size(Vec2::new(option_w, 36.0));
                    if selected {
                        button = button.fill(ui.visuals().selection.bg_fill);
                    }
                    let enabled = !session.answered && !removed;
                    let response = ui.add_enabled(enabled, button);
                    if removed {
                        response.on_hover_text("Removed by your hint");
                    } else if response.clicked() {
                        session.select_option(i);
                    }
                    ui.add_space(4.0);
                }
            }
            QuestionKind::ShortAnswer => {
                let response = ui.add_enabled(
                    !session.answered,
                    TextEdit::singleline(&mut session.input)
                        .hint_text("Type your answer")
                        .desired_width(f32::INFINITY),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                    session.submit_answer();
                }
            }
        }

        if let Some(hint) = &session.hint_text {
            ui.add_space(8.0);
            ui.label(RichText::new(hint).color(Color32::LIGHT_BLUE));
        }
        ui.add_space(12.0);

        if !session.answered {
            ui.horizontal(|ui| {
                let hint_label = format!("💡 Hint ({hint_tokens})");
                if ui
                    .add_enabled(hint_tokens > 0, Button::new(hint_label))
                    .on_disabled_hover_text("No hint tokens left")
                    .clicked()
                {
                    action = Some(QuizAction::UseHint);
                }
                let can_submit = session.staged_answer().is_some();
                if ui.add_enabled(can_submit, Button::new("Submit")).clicked() {
                    session.submit_answer();
                }
            });
        } else {
            let last = session.answers.last().cloned();
            if let Some(record) = last {
                if record.correct {
                    ui.label(RichText::new("✔ Correct!").color(Color32::GREEN).strong());
                } else {
                    ui.label(RichText::new("✘ Not quite.").color(Color32::RED).strong());
                    ui.label(format!("The answer was: {}", record.correct_answer));
                }
                if let Some(explanation) = &question.explanation {
                    ui.weak(explanation);
                }
            }
            ui.add_space(8.0);
            let next_label = if session.is_last_question() {
                "See results"
            } else {
                "Next question ▶"
            };
            if ui.button(next_label).clicked() {
                if !session.advance() {
                    action = Some(QuizAction::Finish);
                }
            }
        }

        message_line(ui, &message);
    });

    match action {
        Some(QuizAction::UseHint) => app.use_hint(),
        Some(QuizAction::Exit) => app.request_exit_quiz(),
        Some(QuizAction::Finish) => app.finish_quiz(),
        None => {}
    }
}
