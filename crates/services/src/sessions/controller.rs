use std::sync::Arc;
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use log::{debug, error, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use quiz_core::TickOutcome;
use quiz_core::model::{OptionId, QuestionId};

use super::state::{AttemptSession, NextOutcome, SubmissionOutcome, SubmitTrigger};
use super::timer::{CountdownTimer, Tick};
use super::view::{AttemptView, Notice};
use crate::backend::{QuizBackend, SubmissionReceipt};

const TICK_PERIOD: Duration = Duration::from_secs(1);
const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Student actions delivered to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptCommand {
    SelectOption {
        question_id: QuestionId,
        option_id: OptionId,
    },
    ToggleFlag,
    Previous,
    Next,
    GoTo(usize),
    OpenConfirmation,
    CancelConfirmation,
    ConfirmSubmit,
    /// Student chose to leave (after any leave prompt).
    Leave,
}

/// How an attempt loop ended.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptExit {
    Submitted(SubmissionReceipt),
    Left,
    /// The command stream ended.
    Closed,
}

/// Drives one attempt: serializes student commands and countdown ticks
/// through the session, owns the tick task, and talks to the backend.
pub struct AttemptController<V> {
    session: AttemptSession,
    view: V,
    backend: Arc<dyn QuizBackend>,
    timer: Option<CountdownTimer>,
    timer_generation: u64,
    ticks_tx: UnboundedSender<Tick>,
    ticks_rx: UnboundedReceiver<Tick>,
    redirect_delay: Duration,
}

impl<V: AttemptView> AttemptController<V> {
    #[must_use]
    pub fn new(session: AttemptSession, view: V, backend: Arc<dyn QuizBackend>) -> Self {
        let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();
        Self {
            session,
            view,
            backend,
            timer: None,
            timer_generation: 0,
            ticks_tx,
            ticks_rx,
            redirect_delay: REDIRECT_DELAY,
        }
    }

    /// Pause between the success notice and the results redirect.
    #[must_use]
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    #[must_use]
    pub fn session(&self) -> &AttemptSession {
        &self.session
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[must_use]
    pub fn timer_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Paint the initial state and start ticking.
    pub fn start(&mut self) {
        self.view.render_title(self.session.quiz().title());
        self.render_current();
        self.view.render_timer(&self.session.timer_display());
        self.refresh_leave_guard();
        if self.session.countdown().is_running() {
            self.start_timer();
        }
    }

    /// Process commands and ticks until the attempt is submitted, left, or
    /// the command stream ends. Call `start` first.
    pub async fn run<S>(&mut self, mut commands: S) -> AttemptExit
    where
        S: Stream<Item = AttemptCommand> + Unpin,
    {
        loop {
            tokio::select! {
                command = commands.next() => {
                    let Some(command) = command else {
                        debug!("command stream closed");
                        self.stop_timer();
                        return AttemptExit::Closed;
                    };
                    if let Some(exit) = self.handle(command).await {
                        return exit;
                    }
                }
                Some(tick) = self.ticks_rx.recv() => {
                    if let Some(exit) = self.on_tick(tick).await {
                        return exit;
                    }
                }
            }
        }
    }

    /// Apply one student command.
    pub async fn handle(&mut self, command: AttemptCommand) -> Option<AttemptExit> {
        debug!("command: {command:?}");
        match command {
            AttemptCommand::SelectOption {
                question_id,
                option_id,
            } => match self.session.select_option(question_id, option_id) {
                Ok(_) => self.render_current(),
                Err(err) => warn!("selection ignored: {err}"),
            },
            AttemptCommand::ToggleFlag => match self.session.toggle_flag() {
                Ok(_) => self.render_current(),
                Err(err) => warn!("flag toggle ignored: {err}"),
            },
            AttemptCommand::Previous => {
                if self.session.previous() {
                    self.render_current();
                }
            }
            AttemptCommand::Next => match self.session.next() {
                NextOutcome::Moved => self.render_current(),
                NextOutcome::ConfirmationOpened(summary) => {
                    self.view.show_confirmation(&summary);
                }
                NextOutcome::Ignored => {}
            },
            AttemptCommand::GoTo(index) => {
                if self.session.go_to(index).is_ok() {
                    self.render_current();
                }
            }
            AttemptCommand::OpenConfirmation => {
                if let Some(summary) = self.session.open_confirmation() {
                    self.view.show_confirmation(&summary);
                }
            }
            AttemptCommand::CancelConfirmation => {
                if self.session.cancel_confirmation() {
                    self.view.hide_confirmation();
                }
            }
            AttemptCommand::ConfirmSubmit => {
                return self.submit(SubmitTrigger::Confirmed).await;
            }
            AttemptCommand::Leave => {
                info!("leaving quiz {}", self.session.quiz().id());
                self.stop_timer();
                return Some(AttemptExit::Left);
            }
        }
        None
    }

    async fn on_tick(&mut self, tick: Tick) -> Option<AttemptExit> {
        if self.timer.as_ref().map(CountdownTimer::generation) != Some(tick.generation) {
            debug!("ignoring stale tick from generation {}", tick.generation);
            return None;
        }

        let outcome = self.session.tick();
        self.view.render_timer(&self.session.timer_display());
        match outcome {
            TickOutcome::Idle | TickOutcome::Running => None,
            TickOutcome::Warning => {
                self.view.notify(&Notice::TimeWarning);
                None
            }
            TickOutcome::Expired => {
                self.stop_timer();
                self.view.notify(&Notice::TimeUp);
                self.submit(SubmitTrigger::TimeExpired).await
            }
        }
    }

    async fn submit(&mut self, trigger: SubmitTrigger) -> Option<AttemptExit> {
        let request = self.session.begin_submission(trigger)?;
        self.stop_timer();
        self.view.hide_confirmation();
        self.view.set_submitting(true);
        self.refresh_leave_guard();

        let quiz_id = self.session.quiz().id();
        let result = self.backend.submit(quiz_id, &request).await;

        let outcome = match self.session.finish_submission(result) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("submission result dropped: {err}");
                return None;
            }
        };

        match outcome {
            SubmissionOutcome::Succeeded(receipt) => {
                self.view.notify(&Notice::Submitted {
                    score: receipt.score,
                    max_score: receipt.max_score,
                    percentage: receipt.percentage,
                });
                self.refresh_leave_guard();
                if !self.redirect_delay.is_zero() {
                    tokio::time::sleep(self.redirect_delay).await;
                }
                let url = self.backend.result_url(receipt.attempt_id);
                info!("opening results at {url}");
                self.view.redirect(&url);
                Some(AttemptExit::Submitted(receipt))
            }
            SubmissionOutcome::Failed {
                error,
                timer_resumed,
            } => {
                self.view.notify(&Notice::SubmitFailed(error.to_string()));
                self.view.set_submitting(false);
                if timer_resumed {
                    self.start_timer();
                }
                self.refresh_leave_guard();
                None
            }
        }
    }

    fn render_current(&mut self) {
        match self.session.screen() {
            Ok(screen) => self.view.render_question(&screen),
            Err(err) => error!("cannot render current question: {err}"),
        }
        self.view.render_grid(&self.session.grid());
    }

    fn refresh_leave_guard(&mut self) {
        self.view
            .set_leave_guard(self.session.should_confirm_leave());
    }

    fn start_timer(&mut self) {
        self.timer_generation += 1;
        self.timer = Some(CountdownTimer::spawn(
            self.timer_generation,
            TICK_PERIOD,
            self.ticks_tx.clone(),
        ));
    }

    fn stop_timer(&mut self) {
        self.timer = None;
    }
}
