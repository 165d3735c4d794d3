use egui::{Color32, Context, RichText};

use crate::app::RevisionApp;
use crate::ui::layout::{centered_panel, two_button_row};

pub fn ui_results(app: &mut RevisionApp, ctx: &Context) {
    let Some(results) = &app.results else {
        app.go_to_dashboard();
        return;
    };

    let headline = match results.percentage {
        100 => "🏆 Perfect score!",
        70..=99 => "🎉 Great work!",
        40..=69 => "👍 Good effort!",
        _ => "📚 Keep practising!",
    };
    let summary = format!(
        "{} — {}: {}/{} ({}%)",
        results.subject_name, results.topic, results.score, results.total, results.percentage
    );
    let reward_line = if results.is_retake {
        "Retakes don't earn rewards, but practice makes perfect.".to_owned()
    } else {
        format!(
            "+{} XP · +{} Brain Coins",
            results.xp_earned, results.coins_earned
        )
    };
    let level_line = results
        .leveled_up_to
        .map(|level| format!("⭐ Level up! You're now level {level}."));
    let notices = results.notices.clone();

    centered_panel(ctx, 320.0, 480.0, |ui| {
        ui.vertical_centered(|ui| {
            ui.heading(headline);
            ui.add_space(8.0);
            ui.label(RichText::new(summary).strong());
            ui.label(reward_line);
            if let Some(line) = &level_line {
                ui.label(RichText::new(line).strong());
            }

            for notice in &notices {
                ui.add_space(4.0);
                ui.label(RichText::new(notice).color(Color32::YELLOW));
            }
        });
        ui.add_space(16.0);

        let (more, home) = two_button_row(ui, 420.0, "📝 More quizzes", "🏠 Dashboard");
        if more {
            app.results = None;
            app.go_to_quiz_list();
        }
        if home {
            app.go_to_dashboard();
        }
    });
}
