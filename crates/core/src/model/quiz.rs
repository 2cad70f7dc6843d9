use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::warn;
use thiserror::Error;

use crate::model::ids::{AttemptId, OptionId, QuestionId, QuizId};
use crate::model::payload::{
    OptionPayload, PreviousAnswer, QuestionPayload, QuizMetadata, QuizPayload,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    NoQuestions,

    #[error("quiz duration must be > 0 minutes")]
    InvalidDuration,

    #[error("duplicate question id {0}")]
    DuplicateQuestion(QuestionId),

    #[error("duplicate option id {option} in question {question}")]
    DuplicateOption {
        question: QuestionId,
        option: OptionId,
    },
}

//
// ─── OPTION / QUESTION ─────────────────────────────────────────────────────────
//

/// A selectable answer, identified by `id` rather than by its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOption {
    id: OptionId,
    text: String,
}

impl QuestionOption {
    #[must_use]
    pub fn new(id: OptionId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> OptionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    marks: u32,
    options: Vec<QuestionOption>,
}

impl Question {
    /// Creates a question. A zero mark value is normalized to 1.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::DuplicateOption` if two options share an id.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        marks: u32,
        options: Vec<QuestionOption>,
    ) -> Result<Self, QuizError> {
        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.id) {
                return Err(QuizError::DuplicateOption {
                    question: id,
                    option: option.id,
                });
            }
        }

        Ok(Self {
            id,
            text: text.into(),
            marks: marks.max(1),
            options,
        })
    }

    fn from_payload(raw: QuestionPayload) -> Result<Self, QuizError> {
        let options = raw
            .options
            .into_iter()
            .enumerate()
            .map(|(index, option)| match option {
                OptionPayload::Text(text) => QuestionOption::new(OptionId::from_index(index), text),
                OptionPayload::Object { id, text } => QuestionOption::new(
                    id.map_or_else(|| OptionId::from_index(index), OptionId::new),
                    text.unwrap_or_default(),
                ),
            })
            .collect();

        Self::new(
            QuestionId::new(raw.id),
            raw.text.unwrap_or_default(),
            raw.marks.unwrap_or(1),
            options,
        )
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn marks(&self) -> u32 {
        self.marks
    }

    #[must_use]
    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    #[must_use]
    pub fn has_option(&self, option_id: OptionId) -> bool {
        self.options.iter().any(|option| option.id == option_id)
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// An immutable quiz, loaded once per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    duration_minutes: u32,
    passing_marks: Option<u32>,
    total_marks: Option<u32>,
    questions: Vec<Question>,
}

impl Quiz {
    /// Creates a validated quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty question list,
    /// `QuizError::InvalidDuration` for a zero duration, and
    /// `QuizError::DuplicateQuestion` when two questions share an id.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        duration_minutes: u32,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if duration_minutes == 0 {
            return Err(QuizError::InvalidDuration);
        }
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(QuizError::DuplicateQuestion(question.id));
            }
        }

        Ok(Self {
            id,
            title: title.into(),
            duration_minutes,
            passing_marks: None,
            total_marks: None,
            questions,
        })
    }

    #[must_use]
    pub fn with_marks(mut self, passing_marks: Option<u32>, total_marks: Option<u32>) -> Self {
        self.passing_marks = passing_marks;
        self.total_marks = total_marks;
        self
    }

    /// Builds a quiz from page metadata merged with the inline questions list.
    ///
    /// # Errors
    ///
    /// Propagates validation failures as `QuizError`.
    pub fn from_inline(
        metadata: QuizMetadata,
        questions: Vec<QuestionPayload>,
    ) -> Result<Self, QuizError> {
        let questions = questions
            .into_iter()
            .map(Question::from_payload)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(
            QuizId::new(metadata.id),
            metadata.title,
            metadata.duration,
            questions,
        )?
        .with_marks(metadata.passing_marks, metadata.total_marks))
    }

    /// Builds a quiz from the API document, keeping attempt id and resume data.
    ///
    /// # Errors
    ///
    /// Propagates validation failures as `QuizError`.
    pub fn from_payload(payload: QuizPayload) -> Result<LoadedQuiz, QuizError> {
        let QuizPayload {
            metadata,
            questions,
            attempt_id,
            previous_answers,
        } = payload;

        let quiz = Self::from_inline(metadata, questions)?;
        let resume = previous_answers.map(|entries| ResumeState::from_entries(&entries));

        Ok(LoadedQuiz {
            quiz,
            attempt_id: attempt_id.map(AttemptId::new),
            resume,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Planned duration in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }

    #[must_use]
    pub fn passing_marks(&self) -> Option<u32> {
        self.passing_marks
    }

    /// Declared total, or the sum of question marks when the payload omits it.
    #[must_use]
    pub fn total_marks(&self) -> u32 {
        self.total_marks
            .unwrap_or_else(|| self.questions.iter().map(Question::marks).sum())
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_by_id(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    #[must_use]
    pub fn contains_question(&self, id: QuestionId) -> bool {
        self.question_by_id(id).is_some()
    }
}

//
// ─── RESUME ────────────────────────────────────────────────────────────────────
//

/// Answers and flags restored from a previous visit to the same attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeState {
    pub answers: BTreeMap<QuestionId, OptionId>,
    pub flagged: BTreeSet<QuestionId>,
}

impl ResumeState {
    fn from_entries(entries: &BTreeMap<String, PreviousAnswer>) -> Self {
        let mut state = Self::default();
        for (key, previous) in entries {
            let Ok(question_id) = key.parse::<QuestionId>() else {
                warn!("ignoring resume entry with non-numeric question id {key:?}");
                continue;
            };
            if let Some(option) = previous.selected_option {
                state.answers.insert(question_id, OptionId::new(option));
            }
            if previous.is_flagged {
                state.flagged.insert(question_id);
            }
        }
        state
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.flagged.is_empty()
    }
}

/// A quiz together with the attempt context the API supplied for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedQuiz {
    pub quiz: Quiz,
    pub attempt_id: Option<AttemptId>,
    pub resume: Option<ResumeState>,
}

impl LoadedQuiz {
    /// Wraps a quiz loaded without attempt context (inline page form).
    #[must_use]
    pub fn fresh(quiz: Quiz) -> Self {
        Self {
            quiz,
            attempt_id: None,
            resume: None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(duration: u32) -> QuizMetadata {
        QuizMetadata {
            id: 4,
            title: "Geography".into(),
            duration,
            passing_marks: Some(2),
            total_marks: None,
        }
    }

    fn question_payload(id: u64, options: Vec<OptionPayload>) -> QuestionPayload {
        QuestionPayload {
            id,
            text: Some(format!("Q{id}")),
            marks: None,
            options,
        }
    }

    #[test]
    fn string_options_are_identified_by_index() {
        let quiz = Quiz::from_inline(
            metadata(10),
            vec![question_payload(
                1,
                vec![OptionPayload::Text("a".into()), OptionPayload::Text("b".into())],
            )],
        )
        .unwrap();

        let ids: Vec<_> = quiz.questions()[0].options().iter().map(QuestionOption::id).collect();
        assert_eq!(ids, vec![OptionId::new(0), OptionId::new(1)]);
        assert_eq!(quiz.questions()[0].marks(), 1);
    }

    #[test]
    fn object_options_keep_explicit_ids_and_fall_back_to_index() {
        let quiz = Quiz::from_inline(
            metadata(10),
            vec![question_payload(
                1,
                vec![
                    OptionPayload::Object {
                        id: Some(40),
                        text: Some("x".into()),
                    },
                    OptionPayload::Object {
                        id: None,
                        text: None,
                    },
                ],
            )],
        )
        .unwrap();

        let options = quiz.questions()[0].options();
        assert_eq!(options[0].id(), OptionId::new(40));
        assert_eq!(options[0].text(), "x");
        assert_eq!(options[1].id(), OptionId::new(1));
        assert_eq!(options[1].text(), "");
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let err = Quiz::from_inline(metadata(10), Vec::new()).unwrap_err();
        assert_eq!(err, QuizError::NoQuestions);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = Quiz::from_inline(metadata(0), vec![question_payload(1, Vec::new())]).unwrap_err();
        assert_eq!(err, QuizError::InvalidDuration);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = Quiz::from_inline(
            metadata(5),
            vec![question_payload(1, Vec::new()), question_payload(1, Vec::new())],
        )
        .unwrap_err();
        assert_eq!(err, QuizError::DuplicateQuestion(QuestionId::new(1)));

        let err = Quiz::from_inline(
            metadata(5),
            vec![question_payload(
                2,
                vec![
                    OptionPayload::Object {
                        id: Some(1),
                        text: None,
                    },
                    OptionPayload::Text("second".into()),
                ],
            )],
        )
        .unwrap_err();
        assert!(matches!(err, QuizError::DuplicateOption { .. }));
    }

    #[test]
    fn total_marks_defaults_to_sum_of_question_marks() {
        let mut second = question_payload(2, Vec::new());
        second.marks = Some(3);
        let quiz = Quiz::from_inline(metadata(5), vec![question_payload(1, Vec::new()), second])
            .unwrap();
        assert_eq!(quiz.total_marks(), 4);
        assert_eq!(quiz.passing_marks(), Some(2));
        assert_eq!(quiz.duration_secs(), 300);
    }

    #[test]
    fn payload_resume_state_skips_non_numeric_keys() {
        let raw = r#"{
            "id": 1, "title": "T", "duration": 3,
            "questions": [{"id": 7, "text": "Q", "options": ["a", "b"]}],
            "previousAnswers": {
                "7": {"selected_option": 1, "is_flagged": true},
                "oops": {"selected_option": 0, "is_flagged": false}
            }
        }"#;
        let payload: QuizPayload = serde_json::from_str(raw).unwrap();
        let loaded = Quiz::from_payload(payload).unwrap();
        let resume = loaded.resume.unwrap();

        assert_eq!(resume.answers.len(), 1);
        assert_eq!(resume.answers.get(&QuestionId::new(7)), Some(&OptionId::new(1)));
        assert!(resume.flagged.contains(&QuestionId::new(7)));
        assert_eq!(loaded.attempt_id, None);
    }
}
