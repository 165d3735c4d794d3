mod helpers;
pub mod layout;
pub mod views;

use eframe::{set_value, App, Frame, APP_KEY};
use egui::Context;

use crate::app::{AppState, RevisionApp};
use layout::{bottom_panel, confirm_dialog, level_up_overlay, top_panel};

impl App for RevisionApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        let on_auth_screen = matches!(
            self.state,
            AppState::Login | AppState::SignUp | AppState::ResetPassword
        );
        if !on_auth_screen {
            // Bounces to Login when the session is gone.
            self.require_session();
        }

        // Header only once signed in; auth screens stay uncluttered.
        if self.profile.is_some() {
            top_panel(self, ctx);
        }
        bottom_panel(ctx);

        match self.state {
            AppState::Login => views::login::ui_login(self, ctx),
            AppState::SignUp => views::signup::ui_sign_up(self, ctx),
            AppState::ResetPassword => views::reset::ui_reset_password(self, ctx),
            AppState::Dashboard => views::dashboard::ui_dashboard(self, ctx),
            AppState::QuizList => views::quiz_list::ui_quiz_list(self, ctx),
            AppState::Quiz => views::quiz::ui_quiz(self, ctx),
            AppState::Results => views::results::ui_results(self, ctx),
            AppState::Classrooms => views::classrooms::ui_classrooms(self, ctx),
            AppState::ClassroomCreate => views::classroom_create::ui_classroom_create(self, ctx),
            AppState::ClassroomJoin => views::classroom_join::ui_classroom_join(self, ctx),
            AppState::ClassroomView => views::classroom_view::ui_classroom_view(self, ctx),
        }

        confirm_dialog(self, ctx);
        level_up_overlay(self, ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        set_value(storage, APP_KEY, self);
    }
}
