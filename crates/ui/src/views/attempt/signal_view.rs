use dioxus::prelude::*;

use quiz_core::model::SubmissionSummary;
use services::AttemptView;
use services::Notice;
use services::sessions::{GridCell, QuestionScreen, TimerDisplay};

use crate::platform::LinkOpenerRef;
use crate::vm::{AttemptVm, map_confirmation, map_notice};

/// `AttemptView` that paints by writing into the page's view-model signal.
pub(crate) struct SignalView {
    state: Signal<AttemptVm>,
    opener: LinkOpenerRef,
}

impl SignalView {
    pub(crate) fn new(state: Signal<AttemptVm>, opener: LinkOpenerRef) -> Self {
        Self { state, opener }
    }
}

impl AttemptView for SignalView {
    fn render_title(&mut self, title: &str) {
        self.state.write().title = title.to_string();
    }

    fn render_question(&mut self, screen: &QuestionScreen) {
        self.state.write().question = Some(screen.clone());
    }

    fn render_grid(&mut self, cells: &[GridCell]) {
        self.state.write().grid = cells.to_vec();
    }

    fn render_timer(&mut self, timer: &TimerDisplay) {
        let mut state = self.state.write();
        if state.timer.as_ref() != Some(timer) {
            state.timer = Some(timer.clone());
        }
    }

    fn show_confirmation(&mut self, summary: &SubmissionSummary) {
        self.state.write().confirmation = Some(map_confirmation(summary));
    }

    fn hide_confirmation(&mut self) {
        self.state.write().confirmation = None;
    }

    fn set_submitting(&mut self, submitting: bool) {
        self.state.write().submitting = submitting;
    }

    fn set_leave_guard(&mut self, guarded: bool) {
        self.state.write().leave_guard = guarded;
    }

    fn notify(&mut self, notice: &Notice) {
        self.state.write().notice = Some(map_notice(notice));
    }

    fn redirect(&mut self, url: &str) {
        self.opener.open_url(url);
    }
}
