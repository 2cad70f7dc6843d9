mod controller;
mod screen;
mod state;
mod timer;
mod view;

// Public API of the attempt subsystem.
pub use crate::error::SessionError;
pub use controller::{AttemptCommand, AttemptController, AttemptExit};
pub use screen::{GridCell, NextLabel, OptionRow, QuestionScreen, TimerDisplay, option_letter};
pub use state::{
    AttemptSession, NextOutcome, SubmissionOutcome, SubmissionPhase, SubmitTrigger,
};
pub use timer::{CountdownTimer, Tick};
pub use view::{AttemptView, Notice};
