use crate::model::Classroom;

/// One topic tile on the quiz list: a subject+topic pairing with its pool
/// size and whether this identity has already banked its reward.
#[derive(Debug, Clone)]
pub struct TopicCard {
    pub subject_id: i64,
    pub subject_name: String,
    pub topic: String,
    pub question_count: usize,
    pub completed: bool,
}

/// One line of the dashboard's recent-activity feed, pre-formatted.
#[derive(Debug, Clone)]
pub struct ActivityRow {
    pub subject_name: String,
    pub score: i64,
    pub total: i64,
    pub xp_earned: i64,
    pub when: String,
}

/// A classroom plus the derived bits the list and detail screens show.
#[derive(Debug, Clone)]
pub struct ClassroomCard {
    pub classroom: Classroom,
    pub member_count: u64,
    pub subject_name: Option<String>,
}
