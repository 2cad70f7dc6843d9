use log::{debug, error, info, warn};

use quiz_core::model::{
    AnswerSheet, AttemptId, LoadedQuiz, OptionId, QuestionId, Quiz, SubmissionSummary,
};
use quiz_core::{Countdown, TickOutcome};

use super::screen::{self, GridCell, QuestionScreen, TimerDisplay};
use crate::backend::{SubmissionReceipt, SubmissionRequest};
use crate::error::{BackendError, SessionError};

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Where the attempt is in the submit pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    ConfirmationOpen,
    /// A request is in flight; acts as the re-entry guard.
    Submitting,
    Succeeded,
    /// Last attempt failed; the student may submit again.
    Failed,
}

impl SubmissionPhase {
    #[must_use]
    pub fn is_locked(self) -> bool {
        matches!(self, SubmissionPhase::Submitting | SubmissionPhase::Succeeded)
    }
}

/// What started a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// Student confirmed in the summary dialog.
    Confirmed,
    /// Countdown reached zero; confirmation is skipped.
    TimeExpired,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NextOutcome {
    Moved,
    /// Already on the last question; the summary dialog should open.
    ConfirmationOpened(SubmissionSummary),
    /// Submitting or submitted; nothing happened.
    Ignored,
}

#[derive(Debug)]
pub enum SubmissionOutcome {
    Succeeded(SubmissionReceipt),
    Failed {
        error: BackendError,
        /// The countdown was restarted because time remains.
        timer_resumed: bool,
    },
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Owned state of one quiz attempt.
///
/// Holds the loaded quiz, the current question index, the answer sheet, the
/// countdown, and the submission phase. Pure and synchronous: scheduling and
/// network I/O live in `AttemptController`.
#[derive(Debug, Clone)]
pub struct AttemptSession {
    quiz: Quiz,
    attempt_id: Option<AttemptId>,
    current: usize,
    sheet: AnswerSheet,
    countdown: Countdown,
    phase: SubmissionPhase,
    receipt: Option<SubmissionReceipt>,
}

impl AttemptSession {
    /// Start an attempt: index 0, answers seeded from resume data when present,
    /// countdown running from the full duration.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the quiz has no questions.
    pub fn start(loaded: LoadedQuiz) -> Result<Self, SessionError> {
        let LoadedQuiz {
            quiz,
            attempt_id,
            resume,
        } = loaded;
        if quiz.question_count() == 0 {
            return Err(SessionError::Empty);
        }

        let sheet = match resume.as_ref() {
            Some(resume) if !resume.is_empty() => AnswerSheet::resumed(&quiz, resume),
            _ => AnswerSheet::new(),
        };
        let mut countdown = Countdown::from_minutes(quiz.duration_minutes());
        countdown.start();

        info!(
            "starting attempt on quiz {} ({} questions, {} answers restored, {}s)",
            quiz.id(),
            quiz.question_count(),
            sheet.answered_count(),
            countdown.remaining_secs()
        );

        Ok(Self {
            quiz,
            attempt_id,
            current: 0,
            sheet,
            countdown,
            phase: SubmissionPhase::Idle,
            receipt: None,
        })
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn attempt_id(&self) -> Option<AttemptId> {
        self.attempt_id
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn sheet(&self) -> &AnswerSheet {
        &self.sheet
    }

    #[must_use]
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    #[must_use]
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    #[must_use]
    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    fn current_question_id(&self) -> Option<QuestionId> {
        self.quiz.question(self.current).map(|question| question.id())
    }

    //
    // ─── RENDERING ─────────────────────────────────────────────────────────────
    //

    /// Screen for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidIndex` if the current index is out of range.
    pub fn screen(&self) -> Result<QuestionScreen, SessionError> {
        self.screen_at(self.current)
    }

    /// Screen for the question at `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidIndex` when `index` is out of range.
    pub fn screen_at(&self, index: usize) -> Result<QuestionScreen, SessionError> {
        screen::render_question(&self.quiz, index, &self.sheet).ok_or_else(|| {
            let len = self.quiz.question_count();
            error!("question index {index} out of range (0..{len})");
            SessionError::InvalidIndex { index, len }
        })
    }

    #[must_use]
    pub fn grid(&self) -> Vec<GridCell> {
        screen::render_grid(&self.quiz, self.current, &self.sheet)
    }

    #[must_use]
    pub fn timer_display(&self) -> TimerDisplay {
        TimerDisplay::from_countdown(&self.countdown)
    }

    #[must_use]
    pub fn summary(&self) -> SubmissionSummary {
        self.sheet.summary(self.quiz.question_count())
    }

    //
    // ─── ANSWERS ───────────────────────────────────────────────────────────────
    //

    /// Record `option_id` for `question_id`, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Locked` while submitting or after success,
    /// `SessionError::UnknownQuestion` / `SessionError::UnknownOption` for ids
    /// outside the quiz.
    pub fn select_option(
        &mut self,
        question_id: QuestionId,
        option_id: OptionId,
    ) -> Result<Option<OptionId>, SessionError> {
        if self.phase.is_locked() {
            return Err(SessionError::Locked);
        }
        let question = self
            .quiz
            .question_by_id(question_id)
            .ok_or(SessionError::UnknownQuestion(question_id))?;
        if !question.has_option(option_id) {
            return Err(SessionError::UnknownOption {
                question: question_id,
                option: option_id,
            });
        }
        debug!("question {question_id}: selected option {option_id}");
        Ok(self.sheet.select(question_id, option_id))
    }

    /// Flip the review flag on the current question. Returns the new state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Locked` while submitting or after success.
    pub fn toggle_flag(&mut self) -> Result<bool, SessionError> {
        if self.phase.is_locked() {
            return Err(SessionError::Locked);
        }
        let question_id = self.current_question_id().ok_or(SessionError::InvalidIndex {
            index: self.current,
            len: self.quiz.question_count(),
        })?;
        let flagged = self.sheet.toggle_flag(question_id);
        debug!("question {question_id}: flagged={flagged}");
        Ok(flagged)
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Step back one question. Returns false on the first question.
    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Step forward, or open the summary dialog from the last question.
    pub fn next(&mut self) -> NextOutcome {
        if self.current + 1 < self.quiz.question_count() {
            self.current += 1;
            return NextOutcome::Moved;
        }
        match self.open_confirmation() {
            Some(summary) => NextOutcome::ConfirmationOpened(summary),
            None => NextOutcome::Ignored,
        }
    }

    /// Jump to any question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidIndex` when `index` is out of range; the
    /// current question is left unchanged.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        let len = self.quiz.question_count();
        if index >= len {
            error!("cannot jump to question index {index} (0..{len})");
            return Err(SessionError::InvalidIndex { index, len });
        }
        self.current = index;
        Ok(())
    }

    //
    // ─── TIMER ─────────────────────────────────────────────────────────────────
    //

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.countdown.tick();
        match outcome {
            TickOutcome::Warning => info!("five minutes remaining"),
            TickOutcome::Expired => info!("time is up on quiz {}", self.quiz.id()),
            TickOutcome::Idle | TickOutcome::Running => {}
        }
        outcome
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────────
    //

    /// Open the summary dialog. Returns `None` while submitting or submitted.
    pub fn open_confirmation(&mut self) -> Option<SubmissionSummary> {
        match self.phase {
            SubmissionPhase::Submitting | SubmissionPhase::Succeeded => None,
            SubmissionPhase::Idle
            | SubmissionPhase::ConfirmationOpen
            | SubmissionPhase::Failed => {
                self.phase = SubmissionPhase::ConfirmationOpen;
                Some(self.summary())
            }
        }
    }

    /// Close the summary dialog without submitting.
    pub fn cancel_confirmation(&mut self) -> bool {
        if self.phase != SubmissionPhase::ConfirmationOpen {
            return false;
        }
        self.phase = SubmissionPhase::Idle;
        true
    }

    /// Enter `Submitting`, stop the countdown, and build the request.
    ///
    /// Returns `None` when a submission is already in flight or done, or when
    /// a confirmed submit arrives without the dialog open.
    pub fn begin_submission(&mut self, trigger: SubmitTrigger) -> Option<SubmissionRequest> {
        match (self.phase, trigger) {
            (SubmissionPhase::Submitting | SubmissionPhase::Succeeded, _) => {
                debug!("submit ignored: phase {:?}", self.phase);
                return None;
            }
            (SubmissionPhase::Idle | SubmissionPhase::Failed, SubmitTrigger::Confirmed) => {
                warn!("submit ignored: confirmation dialog is not open");
                return None;
            }
            _ => {}
        }

        self.countdown.stop();
        self.phase = SubmissionPhase::Submitting;

        let summary = self.summary();
        let elapsed = self.countdown.elapsed_secs();
        info!(
            "submitting quiz {} ({trigger:?}): {} answered, {} unanswered, {} flagged, {elapsed}s",
            self.quiz.id(),
            summary.answered,
            summary.unanswered,
            summary.flagged
        );

        Some(SubmissionRequest {
            answers: self.sheet.answers().clone(),
            time_spent_seconds: elapsed,
            time_spent: elapsed,
            flagged_question_ids: self.sheet.flagged_ids(),
            attempt_id: self.attempt_id,
        })
    }

    /// Apply the backend's answer to an in-flight submission.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSubmitting` if no submission is in flight.
    pub fn finish_submission(
        &mut self,
        result: Result<SubmissionReceipt, BackendError>,
    ) -> Result<SubmissionOutcome, SessionError> {
        if self.phase != SubmissionPhase::Submitting {
            return Err(SessionError::NotSubmitting);
        }
        match result {
            Ok(receipt) => {
                info!(
                    "attempt {} graded: {}/{} ({:.2}%)",
                    receipt.attempt_id, receipt.score, receipt.max_score, receipt.percentage
                );
                self.phase = SubmissionPhase::Succeeded;
                self.attempt_id = Some(receipt.attempt_id);
                self.receipt = Some(receipt.clone());
                Ok(SubmissionOutcome::Succeeded(receipt))
            }
            Err(error) => {
                error!("submitting quiz {} failed: {error}", self.quiz.id());
                self.phase = SubmissionPhase::Failed;
                let timer_resumed = self.countdown.has_time_left() && self.countdown.start();
                Ok(SubmissionOutcome::Failed {
                    error,
                    timer_resumed,
                })
            }
        }
    }

    /// Leaving now would lose an attempt that still has time on the clock.
    #[must_use]
    pub fn should_confirm_leave(&self) -> bool {
        self.countdown.has_time_left() && !self.phase.is_locked()
    }
}
