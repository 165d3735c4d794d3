use std::thread;
use std::time::Duration;

use super::*;
use crate::backend::{BackendError, Session};
use crate::model::Profile;

const PROFILE_LOAD_ATTEMPTS: u32 = 3;
const PROFILE_RETRY_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_HINT_TOKENS: i64 = 5;

impl RevisionApp {
    /// Fetch the signed-in identity's profile row, creating it when absent.
    ///
    /// Right after signup the row may not be visible yet (the session's
    /// claims can lag the trigger that provisions the row), which shows up
    /// as a permission error. Those are retried a few times before giving
    /// up; a clean not-found means the trigger is not installed and the row
    /// is created client-side instead.
    pub(crate) fn load_or_create_profile(
        &mut self,
        session: &Session,
    ) -> Result<Profile, BackendError> {
        let mut attempt = 1;
        loop {
            match self.fetch_profile(&session.user.id) {
                Ok(profile) => return Ok(profile),
                Err(err) if err.is_not_found() => return self.create_profile(session),
                Err(err) if err.is_permission_denied() && attempt < PROFILE_LOAD_ATTEMPTS => {
                    log::warn!("profile fetch attempt {attempt} denied, retrying: {err}");
                    thread::sleep(PROFILE_RETRY_DELAY);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn fetch_profile(&self, user_id: &str) -> Result<Profile, BackendError> {
        self.backend
            .from("profiles")
            .select("*")
            .eq("id", user_id)
            .fetch_single()
    }

    /// Provision a fresh profile from the signup metadata. A unique-key
    /// conflict means a trigger won the race, so the row is re-fetched.
    fn create_profile(&mut self, session: &Session) -> Result<Profile, BackendError> {
        let user = &session.user;
        let row = serde_json::json!({
            "id": user.id,
            "email": user.email,
            "username": user.metadata_str("username").unwrap_or(""),
            "role": user.metadata_str("role").unwrap_or("student"),
            "year_group": user.user_metadata.get("year_group").cloned(),
            "xp": 0,
            "level": 1,
            "brain_coins": 0,
            "hint_tokens": DEFAULT_HINT_TOKENS,
        });

        match self.backend.insert::<Profile>("profiles", &row) {
            Ok(profile) => Ok(profile),
            Err(err) if err.is_unique_violation() => self.fetch_profile(&user.id),
            Err(err) => Err(err),
        }
    }

    /// Re-read the profile row, keeping the cached copy on failure.
    pub fn refresh_profile(&mut self) {
        let Some(id) = self.user_id() else { return };
        match self.fetch_profile(&id) {
            Ok(profile) => self.profile = Some(profile),
            Err(err) => log::warn!("profile refresh failed: {err}"),
        }
    }
}
