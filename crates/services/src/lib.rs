#![forbid(unsafe_code)]

pub mod app_services;
pub mod backend;
pub mod error;
pub mod sessions;

pub use app_services::AppServices;
pub use backend::{
    BackendConfig, HttpQuizBackend, QuizBackend, QuizSource, SubmissionReceipt,
    SubmissionRequest,
};
pub use error::{BackendError, SessionError};

pub use sessions::{
    AttemptCommand, AttemptController, AttemptExit, AttemptSession, AttemptView, Notice,
    SubmissionPhase,
};
