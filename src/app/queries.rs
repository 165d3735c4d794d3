use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::*;
use crate::backend::BackendError;
use crate::model::{Question, QuestionRow, SubjectRef};

const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Wire shape used when grouping the question bank into topic tiles.
#[derive(Deserialize)]
struct TopicRow {
    subject_id: i64,
    topic: String,
    #[serde(default)]
    subjects: Option<SubjectRef>,
}

impl RevisionApp {
    pub(crate) fn load_subjects(&mut self) {
        match self
            .backend
            .from("subjects")
            .select("id,name,slug")
            .order("name", true)
            .fetch()
        {
            Ok(subjects) => self.subjects = subjects,
            Err(err) => self.handle_backend_error("Could not load subjects", err),
        }
    }

    /// Group the question bank by (subject, topic) into dashboard tiles,
    /// sorted by subject name then topic.
    pub(crate) fn load_topic_cards(&mut self) {
        let rows: Vec<TopicRow> = match self
            .backend
            .from("quiz_questions")
            .select("subject_id,topic,subjects(name,slug)")
            .fetch()
        {
            Ok(rows) => rows,
            Err(err) => {
                self.handle_backend_error("Could not load quizzes", err);
                return;
            }
        };

        let mut groups: BTreeMap<(String, String), (i64, usize)> = BTreeMap::new();
        for row in rows {
            let subject_name = row
                .subjects
                .map(|s| s.name)
                .unwrap_or_else(|| format!("Subject {}", row.subject_id));
            let entry = groups
                .entry((subject_name, row.topic))
                .or_insert((row.subject_id, 0));
            entry.1 += 1;
        }

        self.topic_cards = groups
            .into_iter()
            .map(|((subject_name, topic), (subject_id, count))| {
                let completed = self.has_completed(&quiz::quiz_key(subject_id, &topic));
                TopicCard {
                    subject_id,
                    subject_name,
                    topic,
                    question_count: count,
                    completed,
                }
            })
            .collect();
    }

    /// The full question pool for one subject+topic pairing.
    pub(crate) fn fetch_questions(
        &self,
        subject_id: i64,
        topic: &str,
    ) -> Result<Vec<Question>, BackendError> {
        let rows: Vec<QuestionRow> = self
            .backend
            .from("quiz_questions")
            .select("*")
            .eq("subject_id", subject_id)
            .eq("topic", topic)
            .fetch()?;
        Ok(rows.into_iter().map(QuestionRow::into_question).collect())
    }

    pub(crate) fn load_recent_activity(&mut self) {
        let Some(user_id) = self.user_id() else { return };
        let rows: Vec<crate::model::AttemptRow> = match self
            .backend
            .from("quiz_attempts")
            .select("score,total_questions,xp_earned,completed_at,subjects(name,slug)")
            .eq("user_id", &user_id)
            .order("completed_at", false)
            .limit(RECENT_ACTIVITY_LIMIT)
            .fetch()
        {
            Ok(rows) => rows,
            Err(err) => {
                self.handle_backend_error("Could not load recent activity", err);
                return;
            }
        };

        self.recent_activity = rows
            .into_iter()
            .map(|row| ActivityRow {
                subject_name: row
                    .subjects
                    .map(|s| s.name)
                    .unwrap_or_else(|| "Quiz".to_owned()),
                score: row.score,
                total: row.total_questions,
                xp_earned: row.xp_earned,
                when: row
                    .completed_at
                    .as_deref()
                    .map(|ts| format_time_ago(ts, Utc::now()))
                    .unwrap_or_default(),
            })
            .collect();
    }
}

/// Render a stored timestamp as a coarse relative age. Unparseable input
/// renders as nothing rather than a wrong date.
pub fn format_time_ago(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) else {
        return String::new();
    };
    let elapsed = now.signed_duration_since(parsed.with_timezone(&Utc));
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        "just now".to_owned()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if minutes < 60 * 24 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (60 * 24))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(format_time_ago("2026-03-10T11:59:40Z", now), "just now");
        assert_eq!(format_time_ago("2026-03-10T11:15:00Z", now), "45m ago");
        assert_eq!(format_time_ago("2026-03-10T04:00:00Z", now), "8h ago");
        assert_eq!(format_time_ago("2026-03-07T12:00:00Z", now), "3d ago");
        assert_eq!(format_time_ago("2026-03-10T10:00:00+01:00", now), "3h ago");
    }

    #[test]
    fn time_ago_swallows_garbage() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(format_time_ago("yesterday-ish", now), "");
    }
}
