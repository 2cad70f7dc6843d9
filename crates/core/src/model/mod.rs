mod answers;
mod ids;
pub mod payload;
mod quiz;

pub use ids::{AttemptId, OptionId, ParseIdError, QuestionId, QuizId};
pub use payload::{OptionPayload, PreviousAnswer, QuestionPayload, QuizMetadata, QuizPayload};

pub use answers::{AnswerSheet, SubmissionSummary};
pub use quiz::{LoadedQuiz, Question, QuestionOption, Quiz, QuizError, ResumeState};
