use log::error;

use quiz_core::model::SubmissionSummary;
use services::sessions::{GridCell, QuestionScreen, TimerDisplay};
use services::{AppServices, AttemptSession, Notice};

use crate::views::ViewError;

/// Everything the attempt page paints, as last pushed by the controller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttemptVm {
    pub title: String,
    pub question: Option<QuestionScreen>,
    pub grid: Vec<GridCell>,
    pub timer: Option<TimerDisplay>,
    pub confirmation: Option<ConfirmationVm>,
    pub submitting: bool,
    pub leave_guard: bool,
    pub notice: Option<NoticeVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationVm {
    pub answered: usize,
    pub unanswered: usize,
    pub flagged: usize,
    pub warning: Option<String>,
}

#[must_use]
pub fn map_confirmation(summary: &SubmissionSummary) -> ConfirmationVm {
    let warning = match summary.unanswered {
        0 => None,
        1 => Some("1 question is still unanswered.".to_string()),
        n => Some(format!("{n} questions are still unanswered.")),
    };
    ConfirmationVm {
        answered: summary.answered,
        unanswered: summary.unanswered,
        flagged: summary.flagged,
        warning,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeTone {
    Info,
    Warning,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoticeVm {
    pub tone: NoticeTone,
    pub lines: Vec<String>,
}

#[must_use]
pub fn map_notice(notice: &Notice) -> NoticeVm {
    let tone = match notice {
        Notice::TimeWarning => NoticeTone::Warning,
        Notice::TimeUp => NoticeTone::Info,
        Notice::Submitted { .. } => NoticeTone::Success,
        Notice::SubmitFailed(_) => NoticeTone::Error,
    };
    let lines = notice
        .message()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();
    NoticeVm { tone, lines }
}

/// # Errors
///
/// Returns the `ViewError` matching why the quiz could not be loaded.
pub async fn start_attempt(services: &AppServices) -> Result<AttemptSession, ViewError> {
    services.start_attempt().await.map_err(|err| {
        error!("failed to start quiz {}: {err}", services.quiz_id());
        ViewError::from(&err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_warns_about_unanswered_questions() {
        let summary = SubmissionSummary {
            total: 10,
            answered: 6,
            unanswered: 4,
            flagged: 2,
        };
        let vm = map_confirmation(&summary);
        assert_eq!(vm.answered, 6);
        assert_eq!(vm.flagged, 2);
        assert_eq!(
            vm.warning.as_deref(),
            Some("4 questions are still unanswered.")
        );

        let complete = SubmissionSummary {
            total: 2,
            answered: 2,
            unanswered: 0,
            flagged: 0,
        };
        assert!(map_confirmation(&complete).warning.is_none());
    }

    #[test]
    fn submitted_notice_splits_into_lines() {
        let vm = map_notice(&Notice::Submitted {
            score: 3.0,
            max_score: 4.0,
            percentage: 75.0,
        });
        assert_eq!(vm.tone, NoticeTone::Success);
        assert_eq!(
            vm.lines,
            vec![
                "Quiz submitted successfully!".to_string(),
                "Score: 3/4".to_string(),
                "Percentage: 75.00%".to_string(),
                "Redirecting to results...".to_string(),
            ]
        );
    }

    #[test]
    fn failure_notice_is_an_error() {
        let vm = map_notice(&Notice::SubmitFailed("HTTP 500".into()));
        assert_eq!(vm.tone, NoticeTone::Error);
        assert_eq!(vm.lines[1], "Error: HTTP 500");
    }
}
