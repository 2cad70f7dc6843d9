//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{OptionId, QuestionId, QuizError};

/// Errors emitted by quiz backends while loading or submitting.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("CSRF token missing; refresh the quiz page and try again")]
    MissingCsrfToken,
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("expected JSON but got: {0}")]
    UnexpectedContentType(String),
    #[error("{0}")]
    Rejected(String),
    #[error("quiz page is missing {0}")]
    MissingPageData(&'static str),
    #[error("response is missing {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidQuiz(#[from] QuizError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the attempt session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz has no questions")]
    Empty,
    #[error("question index {index} out of range (0..{len})")]
    InvalidIndex { index: usize, len: usize },
    #[error("question {0} is not part of this quiz")]
    UnknownQuestion(QuestionId),
    #[error("option {option} is not offered by question {question}")]
    UnknownOption {
        question: QuestionId,
        option: OptionId,
    },
    #[error("answers are locked while the attempt is submitting or submitted")]
    Locked,
    #[error("no submission is in flight")]
    NotSubmitting,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}
