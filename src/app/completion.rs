use std::collections::HashSet;

use super::*;

/// Completed-quiz bookkeeping. The sets are keyed by identity id so that
/// several accounts sharing one machine never see each other's retake
/// status; they persist across restarts with the rest of the app state,
/// best-effort.
impl RevisionApp {
    pub fn has_completed(&self, quiz_key: &str) -> bool {
        let Some(id) = self.user_id() else {
            return false;
        };
        self.completed
            .get(&id)
            .is_some_and(|set| set.contains(quiz_key))
    }

    /// Record a first completion. Retakes do not call this; the set only
    /// grows.
    pub fn mark_completed(&mut self, quiz_key: &str) {
        let Some(id) = self.user_id() else { return };
        self.completed
            .entry(id)
            .or_insert_with(HashSet::new)
            .insert(quiz_key.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AuthUser, Session};

    fn app_with_user(id: &str) -> RevisionApp {
        let mut app = RevisionApp::default();
        app.backend.set_session(Some(Session {
            access_token: "t".into(),
            refresh_token: "r".into(),
            user: AuthUser {
                id: id.into(),
                email: String::new(),
                user_metadata: serde_json::Value::Null,
            },
        }));
        app
    }

    #[test]
    fn completion_is_scoped_per_identity() {
        let mut app = app_with_user("u1");
        assert!(!app.has_completed("3-Algebra"));
        app.mark_completed("3-Algebra");
        assert!(app.has_completed("3-Algebra"));

        // Same machine, different account.
        let completed = app.completed.clone();
        let mut other = app_with_user("u2");
        other.completed = completed;
        assert!(!other.has_completed("3-Algebra"));
    }

    #[test]
    fn signed_out_user_sees_nothing_and_records_nothing() {
        let mut app = RevisionApp::default();
        app.mark_completed("3-Algebra");
        assert!(app.completed.is_empty());
        assert!(!app.has_completed("3-Algebra"));
    }
}
