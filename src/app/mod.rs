use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::backend::{Backend, Session};
use crate::model::{Profile, Role, Subject};

pub mod actions;
pub mod auth;
pub mod classroom;
pub mod completion;
pub mod navigation;
pub mod profile;
pub mod queries;
pub mod quiz;
pub mod view_models;

pub use quiz::QuizSession;
pub use view_models::{ActivityRow, ClassroomCard, TopicCard};

/// Which screen the update loop renders.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AppState {
    #[default]
    Login,
    SignUp,
    ResetPassword,
    Dashboard,
    QuizList,
    Quiz,
    Results,
    Classrooms,
    ClassroomCreate,
    ClassroomJoin,
    ClassroomView,
}

#[derive(Default, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub role: Role,
    pub year_group: String,
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            confirm: String::new(),
            role: Role::Student,
            year_group: String::new(),
        }
    }
}

#[derive(Default, Clone)]
pub struct ResetForm {
    pub email: String,
    pub sent: bool,
}

#[derive(Default, Clone)]
pub struct ClassroomForm {
    pub name: String,
    pub subject_id: Option<i64>,
    pub year_group: String,
}

#[derive(Default, Clone)]
pub struct JoinForm {
    pub code: String,
}

/// A pending yes/no decision rendered as a modal window.
pub struct Confirm {
    pub title: String,
    pub body: String,
    pub action: ConfirmAction,
}

pub enum ConfirmAction {
    StartRetake {
        subject_id: i64,
        subject_name: String,
        topic: String,
    },
    ExitQuiz,
}

/// Outcome of a finished session, kept around for the results screen after
/// the session itself is dropped.
pub struct QuizResults {
    pub subject_name: String,
    pub topic: String,
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub xp_earned: i64,
    pub coins_earned: i64,
    pub is_retake: bool,
    pub leveled_up_to: Option<i64>,
    /// Non-fatal problems while recording the attempt or granting rewards.
    pub notices: Vec<String>,
}

/// Root application state. The persisted slice is deliberately small: the
/// remember-me session and the per-identity completed-quiz sets. Everything
/// else is refetched from the backend after sign-in.
#[derive(Serialize, Deserialize)]
pub struct RevisionApp {
    pub remember_me: bool,
    pub saved_session: Option<Session>,
    /// identity id -> set of completed quiz keys (`<subject_id>-<topic>`).
    pub completed: HashMap<String, HashSet<String>>,

    #[serde(skip)]
    pub backend: Backend,
    #[serde(skip)]
    pub state: AppState,
    #[serde(skip)]
    pub profile: Option<Profile>,
    #[serde(skip)]
    pub quiz: Option<QuizSession>,
    #[serde(skip)]
    pub results: Option<QuizResults>,
    #[serde(skip)]
    pub message: String,
    #[serde(skip)]
    pub confirm: Option<Confirm>,
    /// Set when the last reward grant crossed a level boundary; cleared when
    /// the overlay is dismissed.
    #[serde(skip)]
    pub level_up: Option<i64>,

    #[serde(skip)]
    pub login_form: LoginForm,
    #[serde(skip)]
    pub signup_form: SignUpForm,
    #[serde(skip)]
    pub reset_form: ResetForm,
    #[serde(skip)]
    pub classroom_form: ClassroomForm,
    #[serde(skip)]
    pub join_form: JoinForm,

    #[serde(skip)]
    pub subjects: Vec<Subject>,
    #[serde(skip)]
    pub topic_cards: Vec<TopicCard>,
    #[serde(skip)]
    pub recent_activity: Vec<ActivityRow>,
    #[serde(skip)]
    pub classrooms: Vec<ClassroomCard>,
    #[serde(skip)]
    pub open_classroom: Option<ClassroomCard>,
    #[serde(skip)]
    pub classroom_members: Vec<Profile>,
    #[serde(skip)]
    pub classroom_assignment_count: u64,
}

impl Default for RevisionApp {
    fn default() -> Self {
        Self {
            remember_me: false,
            saved_session: None,
            completed: HashMap::new(),
            backend: Backend::default(),
            state: AppState::Login,
            profile: None,
            quiz: None,
            results: None,
            message: String::new(),
            confirm: None,
            level_up: None,
            login_form: LoginForm::default(),
            signup_form: SignUpForm::default(),
            reset_form: ResetForm::default(),
            classroom_form: ClassroomForm::default(),
            join_form: JoinForm::default(),
            subjects: Vec::new(),
            topic_cards: Vec::new(),
            recent_activity: Vec::new(),
            classrooms: Vec::new(),
            open_classroom: None,
            classroom_members: Vec::new(),
            classroom_assignment_count: 0,
        }
    }
}

impl RevisionApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: RevisionApp = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        app.try_restore_session();
        app
    }

    /// Resume a remembered session on startup: exchange the stored refresh
    /// token and land on the dashboard. Any failure drops the stored session
    /// and falls back to the login screen.
    fn try_restore_session(&mut self) {
        if !self.remember_me {
            self.saved_session = None;
            return;
        }
        let Some(saved) = self.saved_session.clone() else {
            return;
        };
        match self.backend.refresh_session(&saved.refresh_token) {
            Ok(session) => {
                self.saved_session = Some(session.clone());
                self.after_sign_in(&session);
            }
            Err(err) => {
                log::warn!("stored session could not be refreshed: {err}");
                self.saved_session = None;
            }
        }
    }

    /// The signed-in identity id, if any.
    pub fn user_id(&self) -> Option<String> {
        self.backend.session().map(|s| s.user.id.clone())
    }

    /// Route a backend failure: authentication problems force a sign-out and
    /// return to the login screen, everything else becomes a status message.
    pub fn handle_backend_error(&mut self, context: &str, err: crate::backend::BackendError) {
        log::error!("{context}: {err}");
        if err.is_auth_error() {
            self.force_sign_out("Your session has expired. Please sign in again.");
        } else {
            self.message = format!("{context}: {err}");
        }
    }
}
