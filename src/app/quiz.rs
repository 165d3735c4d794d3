use std::time::Instant;

use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::model::{Question, QuestionKind};

/// Base XP for completing a quiz; perfect runs add a bonus, each hint
/// subtracts 2, floored at 10.
const BASE_XP: i64 = 20;
const PERFECT_XP_BONUS: i64 = 50;
const HINT_XP_PENALTY: i64 = 2;
const MIN_XP: i64 = 10;
const BASE_COINS: i64 = 10;
const PERFECT_COIN_BONUS: i64 = 25;

/// One answered question within a session.
#[derive(Debug, Clone)]
pub struct AnswerRecord {
    pub question_id: i64,
    pub given: String,
    pub correct_answer: String,
    pub correct: bool,
}

/// What `use_hint` revealed for the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintReveal {
    /// Option indices that were just disabled.
    OptionsRemoved(Vec<usize>),
    Text(String),
}

/// The in-memory state of one quiz run, owned by the app and discarded on
/// exit or completion. All multi-step bookkeeping lives here; the server
/// only sees the token decrement, the final attempt record and the reward
/// calls.
pub struct QuizSession {
    /// Composite reward-eligibility key, `<subject_id>-<topic>`.
    pub key: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub topic: String,
    pub questions: Vec<Question>,
    pub current: usize,
    pub answered: bool,
    pub selected: Option<usize>,
    pub input: String,
    pub answers: Vec<AnswerRecord>,
    pub hints_used: u32,
    /// Options disabled by a hint on the current question.
    pub removed_options: Vec<usize>,
    pub hint_text: Option<String>,
    pub is_retake: bool,
    pub started_at: Instant,
}

/// Stable reward-eligibility key for a subject+topic pairing.
pub fn quiz_key(subject_id: i64, topic: &str) -> String {
    format!("{subject_id}-{topic}")
}

impl QuizSession {
    /// Select `min(requested, available)` questions by uniform shuffle
    /// without replacement and reset every per-session counter. The retake
    /// flag is fixed for the lifetime of the session.
    pub fn start(
        subject_id: i64,
        subject_name: &str,
        topic: &str,
        pool: &[Question],
        requested: usize,
        is_retake: bool,
    ) -> Self {
        let mut questions = pool.to_vec();
        questions.shuffle(&mut thread_rng());
        questions.truncate(requested.min(questions.len()));

        Self {
            key: quiz_key(subject_id, topic),
            subject_id,
            subject_name: subject_name.to_owned(),
            topic: topic.to_owned(),
            questions,
            current: 0,
            answered: false,
            selected: None,
            input: String::new(),
            answers: Vec::new(),
            hints_used: 0,
            removed_options: Vec::new(),
            hint_text: None,
            is_retake,
            started_at: Instant::now(),
        }
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    /// Pick an option. Ignored once answered or for options a hint removed.
    pub fn select_option(&mut self, index: usize) {
        if self.answered || self.removed_options.contains(&index) {
            return;
        }
        self.selected = Some(index);
    }

    /// The answer the user currently has staged, if any.
    pub fn staged_answer(&self) -> Option<String> {
        match &self.current_question().kind {
            QuestionKind::MultipleChoice { options } => self
                .selected
                .and_then(|i| options.get(i))
                .cloned(),
            QuestionKind::ShortAnswer => {
                let trimmed = self.input.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
        }
    }

    /// Grade and lock the current question. Idempotent: a second call (or a
    /// call with nothing staged) returns `None` and changes nothing.
    /// Multiple-choice grades by exact match, free text case-insensitively.
    pub fn submit_answer(&mut self) -> Option<bool> {
        if self.answered {
            return None;
        }
        let given = self.staged_answer()?;

        let question = self.current_question();
        let correct = match question.kind {
            QuestionKind::MultipleChoice { .. } => given == question.correct_answer,
            QuestionKind::ShortAnswer => {
                given.to_lowercase() == question.correct_answer.to_lowercase()
            }
        };

        self.answers.push(AnswerRecord {
            question_id: question.id,
            given,
            correct_answer: question.correct_answer.clone(),
            correct,
        });
        self.answered = true;
        Some(correct)
    }

    /// Reveal a hint for the current question. Returns `None` once the
    /// question is answered; token accounting happens in the caller, which
    /// must have durably spent the token before invoking this.
    pub fn apply_hint(&mut self) -> Option<HintReveal> {
        if self.answered {
            return None;
        }
        self.hints_used += 1;

        let question = self.current_question().clone();
        let reveal = match &question.kind {
            QuestionKind::MultipleChoice { .. } => {
                let mut wrong: Vec<usize> = question
                    .wrong_option_indices()
                    .into_iter()
                    .filter(|i| !self.removed_options.contains(i))
                    .collect();
                wrong.shuffle(&mut thread_rng());
                wrong.truncate(2);
                self.removed_options.extend(wrong.iter().copied());
                if self.selected.is_some_and(|s| self.removed_options.contains(&s)) {
                    self.selected = None;
                }
                self.hint_text = Some("Two incorrect answers have been removed!".to_owned());
                HintReveal::OptionsRemoved(wrong)
            }
            QuestionKind::ShortAnswer => {
                let text = match &question.explanation {
                    Some(explanation) => format!("Hint: {explanation}"),
                    None => format!(
                        "Think about the key concepts for {}. The answer is related to the topic you're studying.",
                        question.topic
                    ),
                };
                self.hint_text = Some(text.clone());
                HintReveal::Text(text)
            }
        };
        Some(reveal)
    }

    /// Move to the next question, resetting per-question state. Returns
    /// `false` when the last question has been passed.
    pub fn advance(&mut self) -> bool {
        self.current += 1;
        if self.current >= self.questions.len() {
            return false;
        }
        self.answered = false;
        self.selected = None;
        self.input.clear();
        self.removed_options.clear();
        self.hint_text = None;
        true
    }

    pub fn score(&self) -> usize {
        self.answers.iter().filter(|a| a.correct).count()
    }

    pub fn percentage(&self) -> u32 {
        if self.questions.is_empty() {
            return 0;
        }
        (self.score() as f64 / self.questions.len() as f64 * 100.0).round() as u32
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Reward computation. Retakes earn nothing and must not reach the reward
/// RPCs; the caller enforces the latter.
pub fn compute_rewards(percentage: u32, hints_used: u32, is_retake: bool) -> (i64, i64) {
    if is_retake {
        return (0, 0);
    }
    let perfect = percentage == 100;
    let xp = (BASE_XP + if perfect { PERFECT_XP_BONUS } else { 0 }
        - HINT_XP_PENALTY * hints_used as i64)
        .max(MIN_XP);
    let coins = BASE_COINS + if perfect { PERFECT_COIN_BONUS } else { 0 };
    (xp, coins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn mc_question(id: i64, options: &[&str], correct: &str) -> Question {
        Question {
            id,
            subject_id: 1,
            topic: "Algebra".into(),
            difficulty: "medium".into(),
            prompt: format!("q{id}"),
            kind: QuestionKind::MultipleChoice {
                options: options.iter().map(|s| s.to_string()).collect(),
            },
            correct_answer: correct.into(),
            explanation: None,
        }
    }

    fn text_question(id: i64, correct: &str, explanation: Option<&str>) -> Question {
        Question {
            id,
            subject_id: 1,
            topic: "Capitals".into(),
            difficulty: "easy".into(),
            prompt: format!("q{id}"),
            kind: QuestionKind::ShortAnswer,
            correct_answer: correct.into(),
            explanation: explanation.map(str::to_owned),
        }
    }

    fn session(pool: Vec<Question>, requested: usize, retake: bool) -> QuizSession {
        QuizSession::start(1, "Maths", "Algebra", &pool, requested, retake)
    }

    #[test]
    fn start_caps_at_available_and_resets_counters() {
        let pool = vec![
            mc_question(1, &["a", "b"], "a"),
            mc_question(2, &["a", "b"], "b"),
        ];
        let s = session(pool, 10, false);
        assert_eq!(s.total(), 2);
        assert_eq!(s.hints_used, 0);
        assert!(s.answers.is_empty());
        assert!(!s.answered);
        assert_eq!(s.key, "1-Algebra");
    }

    #[test]
    fn submit_answer_is_idempotent() {
        let mut s = session(vec![mc_question(1, &["a", "b", "c"], "b")], 1, false);
        s.select_option(1);
        assert_eq!(s.submit_answer(), Some(true));
        assert_eq!(s.answers.len(), 1);

        // Second submission has no observable effect.
        s.select_option(0);
        assert_eq!(s.submit_answer(), None);
        assert_eq!(s.answers.len(), 1);
        assert!(s.answers[0].correct);
    }

    #[test]
    fn submit_without_a_staged_answer_is_a_no_op() {
        let mut s = session(vec![mc_question(1, &["a", "b"], "a")], 1, false);
        assert_eq!(s.submit_answer(), None);
        assert!(!s.answered);

        let mut s = session(vec![text_question(1, "Paris", None)], 1, false);
        s.input = "   ".into();
        assert_eq!(s.submit_answer(), None);
        assert!(s.answers.is_empty());
    }

    #[test]
    fn free_text_matches_case_insensitively() {
        let mut s = session(vec![text_question(1, "Paris", None)], 1, false);
        s.input = "paris".into();
        assert_eq!(s.submit_answer(), Some(true));
    }

    #[test]
    fn multiple_choice_requires_exact_match() {
        let mut s = session(vec![mc_question(1, &["Paris", "paris"], "Paris")], 1, false);
        let chosen = s
            .current_question()
            .wrong_option_indices()
            .into_iter()
            .next()
            .unwrap();
        s.select_option(chosen);
        assert_eq!(s.submit_answer(), Some(false));
    }

    #[test]
    fn hint_removes_two_wrong_options_and_never_the_correct_one() {
        let mut s = session(vec![mc_question(1, &["w1", "right", "w2", "w3"], "right")], 1, false);
        let reveal = s.apply_hint().unwrap();
        let HintReveal::OptionsRemoved(removed) = reveal else {
            panic!("expected removed options");
        };
        assert_eq!(removed.len(), 2);
        assert!(!removed.contains(&1), "correct option must stay enabled");
        assert_eq!(s.removed_options.len(), 2);
        assert_eq!(s.hints_used, 1);

        // Exactly one wrong option remains selectable.
        let selectable_wrong: Vec<usize> = s
            .current_question()
            .wrong_option_indices()
            .into_iter()
            .filter(|i| !s.removed_options.contains(i))
            .collect();
        assert_eq!(selectable_wrong.len(), 1);
    }

    #[test]
    fn hint_clears_a_selection_it_removed() {
        for _ in 0..20 {
            let mut s = session(vec![mc_question(1, &["w1", "right", "w2"], "right")], 1, false);
            s.select_option(0);
            s.apply_hint().unwrap();
            if s.removed_options.contains(&0) {
                assert_eq!(s.selected, None);
            }
        }
    }

    #[test]
    fn hint_after_answering_is_a_no_op() {
        let mut s = session(vec![mc_question(1, &["a", "b"], "a")], 1, false);
        s.select_option(0);
        s.submit_answer();
        assert_eq!(s.apply_hint(), None);
        assert_eq!(s.hints_used, 0);
        assert!(s.removed_options.is_empty());
    }

    #[test]
    fn text_hint_prefers_explanation_then_topic_fallback() {
        let mut s = session(vec![text_question(1, "Paris", Some("Capital of France"))], 1, false);
        assert_eq!(
            s.apply_hint(),
            Some(HintReveal::Text("Hint: Capital of France".into()))
        );

        let mut s = session(vec![text_question(1, "Paris", None)], 1, false);
        let Some(HintReveal::Text(text)) = s.apply_hint() else {
            panic!("expected text hint");
        };
        assert!(text.contains("Capitals"), "fallback should reference the topic");
    }

    #[test]
    fn advance_resets_per_question_state() {
        let mut s = session(
            vec![
                mc_question(1, &["a", "b", "c"], "a"),
                mc_question(2, &["a", "b", "c"], "b"),
            ],
            2,
            false,
        );
        s.apply_hint();
        s.select_option(s.current_question().wrong_option_indices()[0]);
        s.submit_answer();

        assert!(s.advance());
        assert!(!s.answered);
        assert_eq!(s.selected, None);
        assert!(s.removed_options.is_empty());
        assert_eq!(s.hint_text, None);
        assert!(!s.advance(), "past the last question");
    }

    #[test]
    fn score_and_percentage_round_like_the_results_screen() {
        let mut s = session(
            vec![
                text_question(1, "a", None),
                text_question(2, "b", None),
                text_question(3, "c", None),
            ],
            3,
            false,
        );
        for expected in ["a", "wrong", "c"] {
            s.input = expected.into();
            s.submit_answer();
            s.advance();
        }
        assert_eq!(s.score(), 2);
        assert_eq!(s.percentage(), 67);
    }

    #[test]
    fn reward_formula_matches_the_published_rules() {
        // 10 questions, 2 hints, perfect run.
        assert_eq!(compute_rewards(100, 2, false), (66, 35));
        // Imperfect run keeps the base coins.
        assert_eq!(compute_rewards(80, 0, false), (20, 10));
        // XP floor.
        assert_eq!(compute_rewards(50, 9, false), (10, 10));
    }

    #[test]
    fn retakes_earn_exactly_zero() {
        assert_eq!(compute_rewards(100, 0, true), (0, 0));
        assert_eq!(compute_rewards(40, 3, true), (0, 0));
    }

    #[test]
    fn quiz_key_is_stable() {
        assert_eq!(quiz_key(4, "Photosynthesis"), "4-Photosynthesis");
    }
}
