//! Renderable snapshots of an attempt. Pure functions of quiz + answer sheet,
//! so rendering the same state twice yields equal values.

use quiz_core::countdown::format_clock;
use quiz_core::model::{AnswerSheet, OptionId, QuestionId, Quiz};
use quiz_core::{Countdown, WARNING_THRESHOLD_SECS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRow {
    pub id: OptionId,
    pub letter: String,
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextLabel {
    Next,
    Finish,
}

impl NextLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NextLabel::Next => "Next",
            NextLabel::Finish => "Finish",
        }
    }
}

/// Everything needed to paint the question currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionScreen {
    pub index: usize,
    pub question_id: QuestionId,
    pub heading: String,
    pub marks_label: String,
    pub text: String,
    pub progress_label: String,
    pub progress_percent: f64,
    pub options: Vec<OptionRow>,
    /// Shown in place of the option list when the question has none.
    pub options_placeholder: Option<String>,
    pub previous_disabled: bool,
    pub next_label: NextLabel,
    pub flagged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub index: usize,
    pub label: String,
    pub current: bool,
    pub answered: bool,
    pub flagged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerDisplay {
    pub text: String,
    pub warning: bool,
}

impl TimerDisplay {
    #[must_use]
    pub fn from_countdown(countdown: &Countdown) -> Self {
        Self {
            text: countdown.display(),
            warning: countdown.in_warning_zone(),
        }
    }

    #[must_use]
    pub fn from_secs(remaining_secs: u32) -> Self {
        Self {
            text: format_clock(remaining_secs),
            warning: remaining_secs <= WARNING_THRESHOLD_SECS,
        }
    }
}

/// Sequential option label: A..Z, then AA, AB, ...
#[must_use]
pub fn option_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn marks_label(marks: u32) -> String {
    if marks == 1 {
        "1 Mark".to_string()
    } else {
        format!("{marks} Marks")
    }
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn render_question(quiz: &Quiz, index: usize, sheet: &AnswerSheet) -> Option<QuestionScreen> {
    let question = quiz.question(index)?;
    let total = quiz.question_count();
    let selected = sheet.answer_for(question.id());

    let options = question
        .options()
        .iter()
        .enumerate()
        .map(|(position, option)| OptionRow {
            id: option.id(),
            letter: option_letter(position),
            text: option.text().to_string(),
            selected: selected == Some(option.id()),
        })
        .collect();

    let options_placeholder = question
        .options()
        .is_empty()
        .then(|| "No options available for this question".to_string());

    let text = if question.text().trim().is_empty() {
        "No question text".to_string()
    } else {
        question.text().to_string()
    };

    Some(QuestionScreen {
        index,
        question_id: question.id(),
        heading: format!("Question {}", index + 1),
        marks_label: marks_label(question.marks()),
        text,
        progress_label: format!("{} of {total}", index + 1),
        progress_percent: (index + 1) as f64 / total as f64 * 100.0,
        options,
        options_placeholder,
        previous_disabled: index == 0,
        next_label: if index + 1 == total {
            NextLabel::Finish
        } else {
            NextLabel::Next
        },
        flagged: sheet.is_flagged(question.id()),
    })
}

pub(crate) fn render_grid(quiz: &Quiz, current: usize, sheet: &AnswerSheet) -> Vec<GridCell> {
    quiz.questions()
        .iter()
        .enumerate()
        .map(|(index, question)| GridCell {
            index,
            label: (index + 1).to_string(),
            current: index == current,
            answered: sheet.is_answered(question.id()),
            flagged: sheet.is_flagged(question.id()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_continue_past_z() {
        assert_eq!(option_letter(0), "A");
        assert_eq!(option_letter(3), "D");
        assert_eq!(option_letter(25), "Z");
        assert_eq!(option_letter(26), "AA");
        assert_eq!(option_letter(27), "AB");
    }

    #[test]
    fn question_without_options_shows_placeholder() {
        use quiz_core::model::{Question, QuestionOption, QuizId};

        let empty = Question::new(QuestionId::new(1), "Explain", 1, Vec::new()).unwrap();
        let choice = Question::new(
            QuestionId::new(2),
            "Pick",
            1,
            vec![QuestionOption::new(OptionId::new(5), "only")],
        )
        .unwrap();
        let quiz = Quiz::new(QuizId::new(1), "Quiz", 5, vec![empty, choice]).unwrap();
        let sheet = AnswerSheet::new();

        let first = render_question(&quiz, 0, &sheet).unwrap();
        assert!(first.options.is_empty());
        assert_eq!(
            first.options_placeholder.as_deref(),
            Some("No options available for this question")
        );
        let second = render_question(&quiz, 1, &sheet).unwrap();
        assert_eq!(second.options_placeholder, None);
    }

    #[test]
    fn marks_label_pluralizes() {
        assert_eq!(marks_label(1), "1 Mark");
        assert_eq!(marks_label(3), "3 Marks");
    }

    #[test]
    fn timer_display_warns_at_and_below_threshold() {
        assert_eq!(
            TimerDisplay::from_secs(300),
            TimerDisplay {
                text: "05:00".into(),
                warning: true
            }
        );
        assert!(!TimerDisplay::from_secs(301).warning);
    }
}
