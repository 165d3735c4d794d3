use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }
}

/// Unknown role strings in stored rows degrade to Student rather than
/// failing the whole profile decode.
fn lenient_role<'de, D: Deserializer<'de>>(de: D) -> Result<Role, D::Error> {
    let raw = String::deserialize(de)?;
    Ok(match raw.as_str() {
        "teacher" => Role::Teacher,
        _ => Role::Student,
    })
}

/// The application-level record associated one-to-one with an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Role,
    #[serde(default)]
    pub year_group: Option<String>,
    #[serde(default)]
    pub xp: i64,
    #[serde(default = "one")]
    pub level: i64,
    #[serde(default)]
    pub brain_coins: i64,
    #[serde(default)]
    pub hint_tokens: i64,
}

fn one() -> i64 {
    1
}

/// Level L owns the XP range [(L-1)²·100, L²·100). XP exactly at a
/// threshold belongs to the higher level.
pub fn level_for_xp(xp: i64) -> i64 {
    let mut level = 1;
    while xp >= level * level * 100 {
        level += 1;
    }
    level
}

/// (floor, ceiling) of the XP range owned by `level`.
pub fn xp_range_for_level(level: i64) -> (i64, i64) {
    ((level - 1) * (level - 1) * 100, level * level * 100)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// Question body, tagged by type rather than interpreted conditionally
/// off a string field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice { options: Vec<String> },
    ShortAnswer,
}

#[derive(Debug, Clone)]
pub struct Question {
    pub id: i64,
    pub subject_id: i64,
    pub topic: String,
    pub difficulty: String,
    pub prompt: String,
    pub kind: QuestionKind,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

impl Question {
    /// Option indices holding an incorrect answer.
    pub fn wrong_option_indices(&self) -> Vec<usize> {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => options
                .iter()
                .enumerate()
                .filter(|(_, opt)| *opt != &self.correct_answer)
                .map(|(i, _)| i)
                .collect(),
            QuestionKind::ShortAnswer => Vec::new(),
        }
    }
}

/// Wire shape of a `quiz_questions` row, optionally with the joined
/// subject name.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRow {
    pub id: i64,
    pub subject_id: i64,
    pub topic: String,
    #[serde(default)]
    pub difficulty: String,
    pub question: String,
    #[serde(default)]
    pub question_type: String,
    #[serde(default)]
    pub options: serde_json::Value,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub subjects: Option<SubjectRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectRef {
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

impl QuestionRow {
    /// Decode the polymorphic row into the tagged shape. Options may arrive
    /// as a JSON array or as a string containing JSON; anything malformed
    /// degrades to an empty option list. Unknown question types are treated
    /// as free-text.
    pub fn into_question(self) -> Question {
        let kind = if self.question_type == "multiple_choice" {
            QuestionKind::MultipleChoice {
                options: parse_options(&self.options),
            }
        } else {
            QuestionKind::ShortAnswer
        };
        Question {
            id: self.id,
            subject_id: self.subject_id,
            topic: self.topic,
            difficulty: self.difficulty,
            prompt: self.question,
            kind,
            correct_answer: self.correct_answer,
            explanation: self.explanation.filter(|e| !e.trim().is_empty()),
        }
    }
}

fn parse_options(value: &serde_json::Value) -> Vec<String> {
    let as_list = |v: &serde_json::Value| -> Option<Vec<String>> {
        v.as_array().map(|items| {
            items
                .iter()
                .filter_map(|o| o.as_str().map(str::to_owned))
                .collect()
        })
    };

    match value {
        serde_json::Value::Array(_) => as_list(value).unwrap_or_default(),
        serde_json::Value::String(raw) => serde_json::from_str::<serde_json::Value>(raw)
            .ok()
            .as_ref()
            .and_then(as_list)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Classroom {
    pub id: String,
    pub teacher_id: String,
    pub name: String,
    #[serde(default)]
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub year_group: Option<String>,
    #[serde(default)]
    pub invite_code: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub subjects: Option<SubjectRef>,
}

/// A recorded quiz attempt, as read back for the recent-activity list.
#[derive(Debug, Clone, Deserialize)]
pub struct AttemptRow {
    pub score: i64,
    pub total_questions: i64,
    #[serde(default)]
    pub xp_earned: i64,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub subjects: Option<SubjectRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ranges_cover_xp_without_gaps() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2); // boundary belongs to the higher level
        assert_eq!(level_for_xp(399), 2);
        assert_eq!(level_for_xp(400), 3);
        assert_eq!(level_for_xp(2499), 5);
        assert_eq!(level_for_xp(2500), 6);
    }

    #[test]
    fn level_is_consistent_with_its_range() {
        for xp in [0, 1, 99, 100, 250, 400, 899, 900, 10_000] {
            let level = level_for_xp(xp);
            let (lo, hi) = xp_range_for_level(level);
            assert!(lo <= xp && xp < hi, "xp {xp} outside range of level {level}");
        }
    }

    #[test]
    fn multiple_choice_options_decode_from_array_and_string() {
        let row = |options: serde_json::Value| QuestionRow {
            id: 1,
            subject_id: 2,
            topic: "Fractions".into(),
            difficulty: "easy".into(),
            question: "Pick one".into(),
            question_type: "multiple_choice".into(),
            options,
            correct_answer: "b".into(),
            explanation: None,
            subjects: None,
        };

        let from_array = row(serde_json::json!(["a", "b", "c"])).into_question();
        let from_string = row(serde_json::json!(r#"["a","b","c"]"#)).into_question();
        let expected = QuestionKind::MultipleChoice {
            options: vec!["a".into(), "b".into(), "c".into()],
        };
        assert_eq!(from_array.kind, expected);
        assert_eq!(from_string.kind, expected);

        let malformed = row(serde_json::json!("not json")).into_question();
        assert_eq!(
            malformed.kind,
            QuestionKind::MultipleChoice { options: vec![] }
        );
    }

    #[test]
    fn unknown_question_type_falls_back_to_short_answer() {
        let row = QuestionRow {
            id: 1,
            subject_id: 2,
            topic: "Capitals".into(),
            difficulty: "easy".into(),
            question: "Capital of France?".into(),
            question_type: "essay".into(),
            options: serde_json::Value::Null,
            correct_answer: "Paris".into(),
            explanation: Some("  ".into()),
            subjects: None,
        };
        let q = row.into_question();
        assert_eq!(q.kind, QuestionKind::ShortAnswer);
        assert_eq!(q.explanation, None); // blank explanations are dropped
    }

    #[test]
    fn wrong_option_indices_exclude_the_correct_answer() {
        let q = Question {
            id: 1,
            subject_id: 1,
            topic: "t".into(),
            difficulty: "easy".into(),
            prompt: "p".into(),
            kind: QuestionKind::MultipleChoice {
                options: vec!["w1".into(), "right".into(), "w2".into(), "w3".into()],
            },
            correct_answer: "right".into(),
            explanation: None,
        };
        assert_eq!(q.wrong_option_indices(), vec![0, 2, 3]);
    }

    #[test]
    fn profile_decodes_with_lenient_role_and_defaults() {
        let p: Profile = serde_json::from_str(
            r#"{"id":"u1","email":"a@b.c","username":"al","role":"admin","xp":150}"#,
        )
        .unwrap();
        assert_eq!(p.role, Role::Student);
        assert_eq!(p.level, 1);
        assert_eq!(p.hint_tokens, 0);
    }
}
