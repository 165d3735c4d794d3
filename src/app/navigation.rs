use super::*;

/// Screen transitions. Each entry point loads what its screen renders so
/// views never fetch during painting.
impl RevisionApp {
    pub fn go_to_dashboard(&mut self) {
        self.refresh_profile();
        self.load_recent_activity();
        self.results = None;
        self.quiz = None;
        self.open_classroom = None;
        self.state = AppState::Dashboard;
    }

    pub fn go_to_quiz_list(&mut self) {
        self.load_topic_cards();
        self.state = AppState::QuizList;
    }

    pub fn go_to_classrooms(&mut self) {
        self.load_classrooms();
        self.open_classroom = None;
        self.state = AppState::Classrooms;
    }

    pub fn go_to_classroom_create(&mut self) {
        if !self.require_teacher() {
            return;
        }
        if self.subjects.is_empty() {
            self.load_subjects();
        }
        self.classroom_form = ClassroomForm::default();
        self.state = AppState::ClassroomCreate;
    }

    pub fn go_to_classroom_join(&mut self) {
        self.join_form = JoinForm::default();
        self.state = AppState::ClassroomJoin;
    }

    pub fn go_to_sign_up(&mut self) {
        self.message.clear();
        self.signup_form = SignUpForm::default();
        self.state = AppState::SignUp;
    }

    pub fn go_to_reset_password(&mut self) {
        self.message.clear();
        self.reset_form = ResetForm::default();
        self.state = AppState::ResetPassword;
    }

    pub fn go_to_login(&mut self) {
        self.message.clear();
        self.state = AppState::Login;
    }
}
