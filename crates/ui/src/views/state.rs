use services::{BackendError, SessionError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// Quiz page or API response lacked questions or configuration.
    QuizData,
    EmptyQuiz,
    Network,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::QuizData => "Error loading quiz questions. Please refresh the page.",
            ViewError::EmptyQuiz => "This quiz has no questions yet.",
            ViewError::Network => {
                "Could not reach the quiz server. Check your connection and try again."
            }
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&SessionError> for ViewError {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::Empty => ViewError::EmptyQuiz,
            SessionError::Quiz(_) => ViewError::QuizData,
            SessionError::Backend(backend) => ViewError::from(backend),
            _ => ViewError::Unknown,
        }
    }
}

impl From<&BackendError> for ViewError {
    fn from(err: &BackendError) -> Self {
        match err {
            BackendError::MissingPageData(_)
            | BackendError::MissingField(_)
            | BackendError::Decode(_)
            | BackendError::InvalidQuiz(_) => ViewError::QuizData,
            BackendError::Http(_)
            | BackendError::HttpStatus { .. }
            | BackendError::UnexpectedContentType(_) => ViewError::Network,
            _ => ViewError::Unknown,
        }
    }
}
