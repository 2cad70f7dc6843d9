mod config;
mod http;
pub mod page;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use quiz_core::model::{AttemptId, LoadedQuiz, OptionId, QuestionId, QuizId};

use crate::error::BackendError;

pub use config::BackendConfig;
pub use http::{HttpQuizBackend, parse_inline_page};

/// Where the quiz document comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizSource {
    /// `GET /api/quiz/<id>/`, may carry resume data.
    #[default]
    Api,
    /// JSON embedded in the server-rendered take-quiz page.
    InlinePage,
}

/// Body posted to the submit endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRequest {
    pub answers: BTreeMap<QuestionId, OptionId>,
    pub time_spent_seconds: u32,
    /// Same value as `time_spent_seconds`, under the name the grader reads.
    pub time_spent: u32,
    pub flagged_question_ids: Vec<QuestionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_id: Option<AttemptId>,
}

/// Graded result acknowledged by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub attempt_id: AttemptId,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub passed: Option<bool>,
    pub message: Option<String>,
}

/// Raw submit response. Accepts both field spellings the server has used.
///
/// Current responses always carry `success`; a missing flag is a failure. The
/// older camelCase grader omitted the flag, so a body using its `attemptId`
/// spelling counts as success on its own.
#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default, alias = "totalMarks")]
    max_score: Option<f64>,
    #[serde(default)]
    percentage: Option<f64>,
    #[serde(default)]
    passed: Option<bool>,
    #[serde(default)]
    attempt_id: Option<AttemptId>,
    #[serde(default, rename = "attemptId")]
    legacy_attempt_id: Option<AttemptId>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl SubmitResponse {
    pub(crate) fn into_receipt(self) -> Result<SubmissionReceipt, BackendError> {
        let accepted = match self.success {
            Some(success) => success,
            None => self.legacy_attempt_id.is_some(),
        };
        if !accepted {
            return Err(BackendError::Rejected(
                self.error
                    .unwrap_or_else(|| "Server returned error".to_string()),
            ));
        }
        let attempt_id = self
            .attempt_id
            .or(self.legacy_attempt_id)
            .ok_or(BackendError::MissingField("attempt_id"))?;
        let score = self.score.unwrap_or(0.0);
        let max_score = self.max_score.unwrap_or(0.0);
        let percentage = self.percentage.unwrap_or_else(|| {
            if max_score > 0.0 {
                score / max_score * 100.0
            } else {
                0.0
            }
        });

        Ok(SubmissionReceipt {
            attempt_id,
            score,
            max_score,
            percentage,
            passed: self.passed,
            message: self.message,
        })
    }
}

/// The quiz server as seen by an attempt.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    /// Load the quiz document for an attempt.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` for network, decoding, or validation failures.
    async fn load_quiz(&self, quiz_id: QuizId, source: QuizSource)
    -> Result<LoadedQuiz, BackendError>;

    /// Submit answers for grading.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` for network failures, non-success statuses,
    /// non-JSON bodies, or a response reporting failure.
    async fn submit(
        &self,
        quiz_id: QuizId,
        request: &SubmissionRequest,
    ) -> Result<SubmissionReceipt, BackendError>;

    /// Link to the results page for a graded attempt.
    fn result_url(&self, attempt_id: AttemptId) -> String;
}
