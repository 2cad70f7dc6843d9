use quiz_core::model::SubmissionSummary;

use super::screen::{GridCell, QuestionScreen, TimerDisplay};

/// Blocking notices shown to the student.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    TimeWarning,
    TimeUp,
    Submitted {
        score: f64,
        max_score: f64,
        percentage: f64,
    },
    SubmitFailed(String),
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Notice::TimeWarning => "Warning: Only 5 minutes remaining!".to_string(),
            Notice::TimeUp => "Time is up! Auto-submitting your quiz...".to_string(),
            Notice::Submitted {
                score,
                max_score,
                percentage,
            } => format!(
                "Quiz submitted successfully!\n\nScore: {score}/{max_score}\nPercentage: {percentage:.2}%\n\nRedirecting to results..."
            ),
            Notice::SubmitFailed(reason) => format!(
                "Failed to submit quiz!\n\nError: {reason}\n\nPlease check your connection and try again."
            ),
        }
    }
}

/// Output side of an attempt: whatever paints questions, the grid and the
/// timer, and shows notices. Implemented by the desktop UI and by test doubles.
pub trait AttemptView {
    fn render_title(&mut self, _title: &str) {}

    fn render_question(&mut self, screen: &QuestionScreen);

    fn render_grid(&mut self, cells: &[GridCell]);

    fn render_timer(&mut self, timer: &TimerDisplay);

    fn show_confirmation(&mut self, summary: &SubmissionSummary);

    fn hide_confirmation(&mut self);

    /// Submit control busy state; `true` while a submission is in flight.
    fn set_submitting(&mut self, _submitting: bool) {}

    /// Whether leaving now should ask the student first.
    fn set_leave_guard(&mut self, _guarded: bool) {}

    fn notify(&mut self, notice: &Notice);

    fn redirect(&mut self, url: &str);
}
