use super::*;
use crate::backend::BackendError;
use crate::model::Role;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 8;

/// Usernames are handles: letters, digits and underscore only, matched
/// case-insensitively for availability.
pub fn validate_username(username: &str) -> Result<(), String> {
    let len = username.chars().count();
    if len < USERNAME_MIN || len > USERNAME_MAX {
        return Err(format!(
            "Username must be between {USERNAME_MIN} and {USERNAME_MAX} characters."
        ));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Username can only contain letters, numbers and underscores.".to_owned());
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    let valid = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(())
    } else {
        Err("Please enter a valid email address.".to_owned())
    }
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < PASSWORD_MIN {
        Err(format!("Password must be at least {PASSWORD_MIN} characters."))
    } else {
        Ok(())
    }
}

impl RevisionApp {
    pub fn sign_in(&mut self) {
        let email = self.login_form.email.trim().to_owned();
        let password = self.login_form.password.clone();
        if email.is_empty() || password.is_empty() {
            self.message = "Please enter your email and password.".to_owned();
            return;
        }

        match self.backend.sign_in_with_password(&email, &password) {
            Ok(session) => {
                self.saved_session = self.remember_me.then(|| session.clone());
                self.login_form = LoginForm::default();
                self.after_sign_in(&session);
            }
            Err(err) => {
                log::warn!("sign-in failed: {err}");
                self.message = "Sign-in failed. Check your email and password.".to_owned();
            }
        }
    }

    pub fn sign_up(&mut self) {
        let form = self.signup_form.clone();
        let username = form.username.trim().to_owned();
        let email = form.email.trim().to_owned();

        if let Err(msg) = validate_username(&username)
            .and_then(|_| validate_email(&email))
            .and_then(|_| validate_password(&form.password))
        {
            self.message = msg;
            return;
        }
        if form.password != form.confirm {
            self.message = "Passwords do not match.".to_owned();
            return;
        }
        match self.username_available(&username) {
            Ok(false) => {
                self.message = "That username is already taken.".to_owned();
                return;
            }
            Ok(true) => {}
            Err(err) => {
                // Signup still has a unique constraint behind it.
                log::warn!("username availability check failed: {err}");
            }
        }
        match self.email_available(&email) {
            Ok(false) => {
                self.message = "An account with that email already exists.".to_owned();
                return;
            }
            Ok(true) => {}
            Err(err) => {
                log::warn!("email availability check failed: {err}");
            }
        }

        let metadata = serde_json::json!({
            "username": username,
            "role": form.role.as_str(),
            "year_group": normalize_year_group(&form.year_group),
        });
        match self.backend.sign_up(&email, &form.password, metadata) {
            Ok(Some(session)) => {
                self.saved_session = self.remember_me.then(|| session.clone());
                self.signup_form = SignUpForm::default();
                self.after_sign_in(&session);
            }
            Ok(None) => {
                self.signup_form = SignUpForm::default();
                self.state = AppState::Login;
                self.message =
                    "Account created. Check your email to confirm before signing in.".to_owned();
            }
            Err(err) if err.is_unique_violation() => {
                self.message = "An account with that email or username already exists.".to_owned();
            }
            Err(err) => {
                log::error!("sign-up failed: {err}");
                self.message = format!("Sign-up failed: {err}");
            }
        }
    }

    /// Check whether a username is free, preferring the dedicated procedure
    /// and falling back to a case-insensitive profile lookup when the
    /// procedure is not deployed.
    fn username_available(&self, username: &str) -> Result<bool, BackendError> {
        match self.backend.rpc::<bool>(
            "check_username_available",
            serde_json::json!({ "check_username": username }),
        ) {
            Ok(free) => Ok(free),
            Err(err) if err.is_rpc_missing() => {
                let existing: Option<serde_json::Value> = self
                    .backend
                    .from("profiles")
                    .select("id")
                    .ilike("username", username)
                    .fetch_optional()?;
                Ok(existing.is_none())
            }
            Err(err) => Err(err),
        }
    }

    fn email_available(&self, email: &str) -> Result<bool, BackendError> {
        match self.backend.rpc::<bool>(
            "check_email_available",
            serde_json::json!({ "check_email": email }),
        ) {
            Ok(free) => Ok(free),
            Err(err) if err.is_rpc_missing() => {
                let existing: Option<serde_json::Value> = self
                    .backend
                    .from("profiles")
                    .select("id")
                    .ilike("email", email)
                    .fetch_optional()?;
                Ok(existing.is_none())
            }
            Err(err) => Err(err),
        }
    }

    pub fn send_password_reset(&mut self) {
        let email = self.reset_form.email.trim().to_owned();
        if let Err(msg) = validate_email(&email) {
            self.message = msg;
            return;
        }
        match self.backend.reset_password_for_email(&email) {
            Ok(()) => {
                self.reset_form.sent = true;
                self.message = "If that email exists, a reset link has been sent.".to_owned();
            }
            Err(err) => {
                log::error!("password reset failed: {err}");
                self.message = "Could not send the reset email. Try again later.".to_owned();
            }
        }
    }

    /// Shared post-authentication path: load (or create) the profile and
    /// land on the dashboard.
    pub(crate) fn after_sign_in(&mut self, session: &crate::backend::Session) {
        self.message.clear();
        match self.load_or_create_profile(session) {
            Ok(profile) => {
                // Best-effort; a missing column or a denied update never
                // blocks sign-in.
                let stamp = chrono::Utc::now().to_rfc3339();
                if let Err(err) = self
                    .backend
                    .update("profiles")
                    .set(serde_json::json!({ "last_login": stamp }))
                    .eq("id", &profile.id)
                    .execute()
                {
                    log::debug!("last_login update failed: {err}");
                }
                self.profile = Some(profile);
                self.go_to_dashboard();
            }
            Err(err) => {
                log::error!("profile load failed after sign-in: {err}");
                self.force_sign_out("Could not load your profile. Please sign in again.");
            }
        }
    }

    pub fn sign_out(&mut self) {
        if let Err(err) = self.backend.sign_out() {
            log::warn!("sign-out revocation failed: {err}");
        }
        self.clear_signed_in_state();
        self.message.clear();
        self.state = AppState::Login;
    }

    /// Local-only sign-out used when the backend already considers the
    /// session dead.
    pub(crate) fn force_sign_out(&mut self, message: &str) {
        self.backend.set_session(None);
        self.clear_signed_in_state();
        self.message = message.to_owned();
        self.state = AppState::Login;
    }

    fn clear_signed_in_state(&mut self) {
        self.saved_session = None;
        self.profile = None;
        self.quiz = None;
        self.results = None;
        self.confirm = None;
        self.level_up = None;
        self.subjects.clear();
        self.topic_cards.clear();
        self.recent_activity.clear();
        self.classrooms.clear();
        self.open_classroom = None;
        self.classroom_members.clear();
    }

    /// Gate for protected screens. Without a live session and a loaded
    /// profile the app can only show the auth screens.
    pub fn require_session(&mut self) -> bool {
        if self.backend.session().is_some() && self.profile.is_some() {
            return true;
        }
        self.state = AppState::Login;
        false
    }

    /// Teacher-only screens bounce students back to the dashboard.
    pub fn require_teacher(&mut self) -> bool {
        let is_teacher = self
            .profile
            .as_ref()
            .is_some_and(|p| p.role == Role::Teacher);
        if !is_teacher {
            self.message = "Only teachers can do that.".to_owned();
            self.state = AppState::Dashboard;
        }
        is_teacher
    }
}

fn normalize_year_group(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("al").is_err()); // too short
        assert!(validate_username("alice_99").is_ok());
        assert!(validate_username("alice!").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
        assert!(validate_username(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("kid@school.org").is_ok());
        assert!(validate_email("  kid@school.org  ").is_ok());
        assert!(validate_email("kid@school").is_err());
        assert!(validate_email("@school.org").is_err());
        assert!(validate_email("no-at-sign").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn blank_year_group_becomes_none() {
        assert_eq!(normalize_year_group("  "), None);
        assert_eq!(normalize_year_group(" Year 8 "), Some("Year 8".to_owned()));
    }
}
