use rand::seq::SliceRandom;
use rand::thread_rng;
use serde::Deserialize;

use super::*;
use crate::backend::BackendError;
use crate::model::{Classroom, Profile, Role};

pub const CLASSROOM_NAME_MAX: usize = 200;
pub const INVITE_CODE_MIN: usize = 6;
pub const INVITE_CODE_MAX: usize = 10;

/// Alphabet for generated invite codes; skips 0/O/1/I to keep codes easy
/// to read out in a classroom.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const CODE_LEN: usize = 6;

/// Canonicalize whatever the student typed: uppercase, alphanumeric only.
/// Returns `None` when the cleaned code cannot be a valid invite.
pub fn normalize_invite_code(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    (INVITE_CODE_MIN..=INVITE_CODE_MAX)
        .contains(&cleaned.len())
        .then_some(cleaned)
}

pub fn generate_invite_code() -> String {
    let mut rng = thread_rng();
    (0..CODE_LEN)
        .filter_map(|_| CODE_ALPHABET.choose(&mut rng))
        .map(|&b| b as char)
        .collect()
}

#[derive(Deserialize)]
struct MembershipRow {
    classrooms: Classroom,
}

#[derive(Deserialize)]
struct MemberRow {
    profiles: Profile,
}

impl RevisionApp {
    /// Teachers see the classrooms they own; students the ones they joined.
    pub(crate) fn load_classrooms(&mut self) {
        let Some(user_id) = self.user_id() else { return };
        let is_teacher = self
            .profile
            .as_ref()
            .is_some_and(|p| p.role == Role::Teacher);

        let fetched: Result<Vec<Classroom>, BackendError> = if is_teacher {
            self.backend
                .from("classrooms")
                .select("*,subjects(name,slug)")
                .eq("teacher_id", &user_id)
                .order("created_at", false)
                .fetch()
        } else {
            self.backend
                .from("classroom_members")
                .select("classrooms(*,subjects(name,slug))")
                .eq("student_id", &user_id)
                .fetch()
                .map(|rows: Vec<MembershipRow>| rows.into_iter().map(|r| r.classrooms).collect())
        };

        let classrooms = match fetched {
            Ok(classrooms) => classrooms,
            Err(err) => {
                self.handle_backend_error("Could not load classrooms", err);
                return;
            }
        };

        self.classrooms = classrooms
            .into_iter()
            .map(|classroom| {
                let member_count = self.count_members(&classroom.id);
                let subject_name = classroom.subjects.as_ref().map(|s| s.name.clone());
                ClassroomCard {
                    classroom,
                    member_count,
                    subject_name,
                }
            })
            .collect();
    }

    fn count_members(&self, classroom_id: &str) -> u64 {
        self.backend
            .from("classroom_members")
            .select("id")
            .eq("classroom_id", classroom_id)
            .count()
            .unwrap_or_else(|err| {
                log::warn!("member count failed for classroom {classroom_id}: {err}");
                0
            })
    }

    pub fn create_classroom(&mut self) {
        if !self.require_teacher() {
            return;
        }
        let Some(user_id) = self.user_id() else { return };

        let name = self.classroom_form.name.trim().to_owned();
        if name.is_empty() {
            self.message = "Give the classroom a name.".to_owned();
            return;
        }
        if name.chars().count() > CLASSROOM_NAME_MAX {
            self.message = format!("Classroom names are limited to {CLASSROOM_NAME_MAX} characters.");
            return;
        }

        let year_group = self.classroom_form.year_group.trim();
        let year_group = (!year_group.is_empty()).then_some(year_group);
        let row = serde_json::json!({
            "teacher_id": user_id,
            "name": name,
            "subject_id": self.classroom_form.subject_id,
            "year_group": year_group,
            "invite_code": generate_invite_code(),
        });

        match self.backend.insert::<Classroom>("classrooms", &row) {
            Ok(created) => {
                self.classroom_form = ClassroomForm::default();
                self.message = format!(
                    "Classroom created. Share the invite code {} with your students.",
                    created.invite_code
                );
                self.go_to_classrooms();
            }
            Err(err) => self.handle_backend_error("Could not create the classroom", err),
        }
    }

    /// Join via invite code: the dedicated procedure when deployed, else a
    /// lookup-then-insert fallback. Joining a classroom twice is reported,
    /// not an error.
    pub fn join_classroom(&mut self) {
        let Some(user_id) = self.user_id() else { return };
        let Some(code) = normalize_invite_code(&self.join_form.code) else {
            self.message = "Invite codes are 6-10 letters and numbers.".to_owned();
            return;
        };

        match self
            .backend
            .rpc::<serde_json::Value>("join_classroom_by_code", serde_json::json!({ "code": code }))
        {
            Ok(_) => {
                self.join_form = JoinForm::default();
                self.message = "You have joined the classroom.".to_owned();
                self.go_to_classrooms();
                return;
            }
            Err(err) if err.is_rpc_missing() => {
                log::debug!("join procedure missing, using direct lookup");
            }
            Err(err) if err.is_unique_violation() => {
                self.message = "You are already in that classroom.".to_owned();
                return;
            }
            Err(err) if err.is_not_found() => {
                self.message = "No classroom found with that code.".to_owned();
                return;
            }
            Err(err) => {
                self.handle_backend_error("Could not join the classroom", err);
                return;
            }
        }

        let classroom = match self.lookup_classroom_by_code(&code) {
            Ok(Some(classroom)) => classroom,
            Ok(None) => {
                self.message = "No classroom found with that code.".to_owned();
                return;
            }
            Err(err) => {
                self.handle_backend_error("Could not look up the invite code", err);
                return;
            }
        };

        let membership = serde_json::json!({
            "classroom_id": classroom.id,
            "student_id": user_id,
        });
        match self.backend.insert_only("classroom_members", &membership) {
            Ok(()) => {
                self.join_form = JoinForm::default();
                self.message = format!("You have joined {}.", classroom.name);
                self.go_to_classrooms();
            }
            Err(err) if err.is_unique_violation() => {
                self.message = "You are already in that classroom.".to_owned();
            }
            Err(err) => self.handle_backend_error("Could not join the classroom", err),
        }
    }

    /// Invite-code lookup, itself with a procedure-first fallback: the
    /// procedure reads across row-level security, the direct query only
    /// works where policies allow it.
    fn lookup_classroom_by_code(&self, code: &str) -> Result<Option<Classroom>, BackendError> {
        match self.backend.rpc::<Vec<Classroom>>(
            "get_classroom_by_invite_code",
            serde_json::json!({ "code": code }),
        ) {
            Ok(rows) => Ok(rows.into_iter().next()),
            Err(err) if err.is_rpc_missing() => self
                .backend
                .from("classrooms")
                .select("*")
                .eq("invite_code", code)
                .fetch_optional(),
            Err(err) => Err(err),
        }
    }

    /// Open one classroom's detail view with its member roster.
    pub fn view_classroom(&mut self, card: ClassroomCard) {
        let members: Result<Vec<MemberRow>, BackendError> = self
            .backend
            .from("classroom_members")
            .select("profiles(*)")
            .eq("classroom_id", &card.classroom.id)
            .fetch();

        match members {
            Ok(rows) => {
                self.classroom_members = rows.into_iter().map(|r| r.profiles).collect();
                self.classroom_members
                    .sort_by(|a, b| a.username.cmp(&b.username));
                self.classroom_assignment_count = self
                    .backend
                    .from("assignments")
                    .select("id")
                    .eq("classroom_id", &card.classroom.id)
                    .count()
                    .unwrap_or_else(|err| {
                        log::warn!("assignment count failed: {err}");
                        0
                    });
                self.open_classroom = Some(card);
                self.state = AppState::ClassroomView;
            }
            Err(err) => self.handle_backend_error("Could not load the classroom", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_codes_normalize_to_uppercase_alphanumeric() {
        assert_eq!(normalize_invite_code(" ab-c1 23 "), Some("ABC123".to_owned()));
        assert_eq!(normalize_invite_code("abc123"), Some("ABC123".to_owned()));
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_invite_code("xY-9 zW3q").unwrap();
        assert_eq!(normalize_invite_code(&once), Some(once.clone()));
    }

    #[test]
    fn invite_codes_outside_the_length_band_are_rejected() {
        assert_eq!(normalize_invite_code("ab12"), None); // 4 after cleaning
        assert_eq!(normalize_invite_code("abcde12345x"), None); // 11
        assert_eq!(normalize_invite_code("!!!---"), None); // nothing left
    }

    #[test]
    fn generated_codes_round_trip_through_normalization() {
        for _ in 0..50 {
            let code = generate_invite_code();
            assert_eq!(code.len(), CODE_LEN);
            assert_eq!(normalize_invite_code(&code), Some(code.clone()));
        }
    }
}
