use egui::{Button, CentralPanel, Context, Frame, ProgressBar, Ui, Visuals};

use crate::app::{AppState, RevisionApp};
use crate::model::xp_range_for_level;

/// Header shown on every signed-in screen: identity, gamification counters
/// and the sign-out button.
pub fn top_panel(app: &mut RevisionApp, ctx: &Context) {
    let Some(profile) = app.profile.clone() else {
        return;
    };
    egui::TopBottomPanel::top("header_panel").show(ctx, |ui| {
        ui.horizontal_centered(|ui| {
            ui.label(format!("🧠 {}", profile.username));
            ui.separator();
            ui.label(format!("Level {}", profile.level));

            let (lo, hi) = xp_range_for_level(profile.level);
            let frac = ((profile.xp - lo) as f32 / (hi - lo) as f32).clamp(0.0, 1.0);
            ui.add_sized(
                [120.0, 14.0],
                ProgressBar::new(frac).text(format!("{} XP", profile.xp)),
            );

            ui.separator();
            ui.label(format!("🪙 {}", profile.brain_coins));
            ui.label(format!("💡 {}", profile.hint_tokens));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Sign out").clicked() {
                    app.sign_out();
                }
                if app.state != AppState::Quiz {
                    if ui.button("🏠 Home").clicked() {
                        app.go_to_dashboard();
                    }
                }
            });
        });
    });
}

pub fn bottom_panel(ctx: &Context) {
    egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("🌙 Dark").clicked() {
                ctx.set_visuals(Visuals::dark());
            }
            if ui.button("☀ Light").clicked() {
                ctx.set_visuals(Visuals::light());
            }
        });
    });
}

/// Vertically and horizontally centered panel with a capped content width.
pub fn centered_panel(ctx: &Context, est_height: f32, max_width: f32, inner: impl FnOnce(&mut Ui)) {
    CentralPanel::default().show(ctx, |ui| {
        let extra = ((ui.available_height() - est_height) / 2.0).max(0.0);
        ui.add_space(extra);
        Frame::default()
            .fill(ui.visuals().window_fill())
            .inner_margin(egui::Margin::symmetric(16, 16))
            .show(ui, |ui| {
                let w = ui.available_width().min(max_width);
                ui.set_width(w);
                inner(ui);
            });
        ui.add_space(extra);
    });
}

pub fn simple_panel(ctx: &Context, max_width: f32, inner: impl FnOnce(&mut Ui)) {
    CentralPanel::default().show(ctx, |ui| {
        let w = ui.available_width().min(max_width);
        Frame::default()
            .fill(ui.visuals().window_fill())
            .inner_margin(egui::Margin::symmetric(16, 16))
            .show(ui, |ui| {
                ui.set_width(w);
                inner(ui);
            });
    });
}

/// Two equal-width buttons in one centered row. Returns (left, right).
pub fn two_button_row(
    ui: &mut Ui,
    panel_width: f32,
    left_label: &str,
    right_label: &str,
) -> (bool, bool) {
    let btn_w = (panel_width - 8.0) / 2.0;
    let mut clicked_left = false;
    let mut clicked_right = false;
    ui.horizontal(|ui| {
        ui.add_space((ui.available_width() - panel_width) / 2.0);
        clicked_left = ui
            .add_sized([btn_w, 36.0], Button::new(left_label))
            .clicked();
        clicked_right = ui
            .add_sized([btn_w, 36.0], Button::new(right_label))
            .clicked();
    });
    (clicked_left, clicked_right)
}

/// The pending yes/no modal, when one is queued.
pub fn confirm_dialog(app: &mut RevisionApp, ctx: &Context) {
    let Some(confirm) = &app.confirm else { return };
    let title = confirm.title.clone();
    let body = confirm.body.clone();

    let mut decision: Option<bool> = None;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(body);
            ui.add_space(12.0);
            let (yes, no) = two_button_row(ui, 260.0, "Yes", "Cancel");
            if yes {
                decision = Some(true);
            } else if no {
                decision = Some(false);
            }
        });
    if let Some(accepted) = decision {
        app.resolve_confirm(accepted);
    }
}

/// Celebration overlay after crossing a level boundary.
pub fn level_up_overlay(app: &mut RevisionApp, ctx: &Context) {
    let Some(level) = app.level_up else { return };
    let mut dismissed = false;
    egui::Window::new("Level up!")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(format!("🎉 You reached level {level}!"));
                ui.add_space(8.0);
                if ui.button("Keep going").clicked() {
                    dismissed = true;
                }
            });
        });
    if dismissed {
        app.level_up = None;
    }
}
