use std::collections::{BTreeMap, BTreeSet};

use log::warn;

use crate::model::ids::{OptionId, QuestionId};
use crate::model::quiz::{Quiz, ResumeState};

/// Counts shown before and at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionSummary {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub flagged: usize,
}

/// Recorded selections and review flags for one attempt.
///
/// A later selection for a question replaces the earlier one; there is no
/// entry until a selection is made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: BTreeMap<QuestionId, OptionId>,
    flagged: BTreeSet<QuestionId>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a sheet from resume data, keeping only entries that belong to `quiz`.
    #[must_use]
    pub fn resumed(quiz: &Quiz, resume: &ResumeState) -> Self {
        let mut sheet = Self::new();
        for (&question_id, &option_id) in &resume.answers {
            match quiz.question_by_id(question_id) {
                Some(question) if question.has_option(option_id) => {
                    sheet.answers.insert(question_id, option_id);
                }
                Some(_) => warn!(
                    "dropping resumed answer {option_id} for question {question_id}: unknown option"
                ),
                None => warn!("dropping resumed answer for unknown question {question_id}"),
            }
        }
        for &question_id in &resume.flagged {
            if quiz.contains_question(question_id) {
                sheet.flagged.insert(question_id);
            } else {
                warn!("dropping resumed flag for unknown question {question_id}");
            }
        }
        sheet
    }

    /// Records `option_id` for `question_id`, returning the replaced selection.
    pub fn select(&mut self, question_id: QuestionId, option_id: OptionId) -> Option<OptionId> {
        self.answers.insert(question_id, option_id)
    }

    #[must_use]
    pub fn answer_for(&self, question_id: QuestionId) -> Option<OptionId> {
        self.answers.get(&question_id).copied()
    }

    #[must_use]
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        self.answers.contains_key(&question_id)
    }

    #[must_use]
    pub fn is_flagged(&self, question_id: QuestionId) -> bool {
        self.flagged.contains(&question_id)
    }

    /// Flips the flag for `question_id`; returns whether it is now flagged.
    pub fn toggle_flag(&mut self, question_id: QuestionId) -> bool {
        if self.flagged.remove(&question_id) {
            false
        } else {
            self.flagged.insert(question_id);
            true
        }
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<QuestionId, OptionId> {
        &self.answers
    }

    #[must_use]
    pub fn flagged_ids(&self) -> Vec<QuestionId> {
        self.flagged.iter().copied().collect()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn flagged_count(&self) -> usize {
        self.flagged.len()
    }

    #[must_use]
    pub fn summary(&self, total: usize) -> SubmissionSummary {
        let answered = self.answered_count();
        SubmissionSummary {
            total,
            answered,
            unanswered: total.saturating_sub(answered),
            flagged: self.flagged_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, QuestionOption, QuizId};

    fn quiz_with(count: u64) -> Quiz {
        let questions = (1..=count)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    format!("Q{id}"),
                    1,
                    vec![
                        QuestionOption::new(OptionId::new(0), "a"),
                        QuestionOption::new(OptionId::new(1), "b"),
                    ],
                )
                .unwrap()
            })
            .collect();
        Quiz::new(QuizId::new(1), "Quiz", 10, questions).unwrap()
    }

    #[test]
    fn later_selection_overwrites_earlier_one() {
        let mut sheet = AnswerSheet::new();
        let q = QuestionId::new(1);
        assert_eq!(sheet.select(q, OptionId::new(0)), None);
        assert_eq!(sheet.select(q, OptionId::new(1)), Some(OptionId::new(0)));
        assert_eq!(sheet.answered_count(), 1);
        assert_eq!(sheet.answer_for(q), Some(OptionId::new(1)));
    }

    #[test]
    fn toggling_twice_restores_original_state() {
        let mut sheet = AnswerSheet::new();
        let q = QuestionId::new(3);
        assert!(sheet.toggle_flag(q));
        assert!(sheet.is_flagged(q));
        assert!(!sheet.toggle_flag(q));
        assert!(!sheet.is_flagged(q));
    }

    #[test]
    fn summary_counts_answered_unanswered_and_flagged() {
        let mut sheet = AnswerSheet::new();
        for id in 1..=6 {
            sheet.select(QuestionId::new(id), OptionId::new(0));
        }
        sheet.toggle_flag(QuestionId::new(8));
        sheet.toggle_flag(QuestionId::new(9));

        let summary = sheet.summary(10);
        assert_eq!(summary.answered, 6);
        assert_eq!(summary.unanswered, 4);
        assert_eq!(summary.flagged, 2);
    }

    #[test]
    fn resumed_sheet_drops_entries_outside_the_quiz() {
        let quiz = quiz_with(2);
        let mut resume = ResumeState::default();
        resume.answers.insert(QuestionId::new(1), OptionId::new(1));
        resume.answers.insert(QuestionId::new(2), OptionId::new(9));
        resume.answers.insert(QuestionId::new(50), OptionId::new(0));
        resume.flagged.insert(QuestionId::new(2));
        resume.flagged.insert(QuestionId::new(51));

        let sheet = AnswerSheet::resumed(&quiz, &resume);
        assert_eq!(sheet.answered_count(), 1);
        assert_eq!(sheet.answer_for(QuestionId::new(1)), Some(OptionId::new(1)));
        assert_eq!(sheet.flagged_ids(), vec![QuestionId::new(2)]);
    }
}
