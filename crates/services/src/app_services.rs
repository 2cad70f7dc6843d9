use std::sync::Arc;

use quiz_core::model::{LoadedQuiz, QuizId};

use crate::backend::{BackendConfig, HttpQuizBackend, QuizBackend, QuizSource};
use crate::error::{BackendError, SessionError};
use crate::sessions::AttemptSession;

/// Assembles the app-facing backend for one quiz.
#[derive(Clone)]
pub struct AppServices {
    quiz_id: QuizId,
    source: QuizSource,
    backend: Arc<dyn QuizBackend>,
}

impl AppServices {
    /// Build services backed by the HTTP quiz server.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the HTTP client cannot be built.
    pub fn new_http(
        config: BackendConfig,
        quiz_id: QuizId,
        source: QuizSource,
    ) -> Result<Self, BackendError> {
        let backend = HttpQuizBackend::new(config)?;
        Ok(Self::with_backend(Arc::new(backend), quiz_id, source))
    }

    #[must_use]
    pub fn with_backend(backend: Arc<dyn QuizBackend>, quiz_id: QuizId, source: QuizSource) -> Self {
        Self {
            quiz_id,
            source,
            backend,
        }
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn source(&self) -> QuizSource {
        self.source
    }

    #[must_use]
    pub fn backend(&self) -> Arc<dyn QuizBackend> {
        Arc::clone(&self.backend)
    }

    /// Fetch the quiz document.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` for network, decoding, or validation failures.
    pub async fn load_quiz(&self) -> Result<LoadedQuiz, BackendError> {
        self.backend.load_quiz(self.quiz_id, self.source).await
    }

    /// Load the quiz and start an attempt on it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Backend` when loading fails and
    /// `SessionError::Empty` for a quiz without questions.
    pub async fn start_attempt(&self) -> Result<AttemptSession, SessionError> {
        let loaded = self.load_quiz().await?;
        AttemptSession::start(loaded)
    }
}
