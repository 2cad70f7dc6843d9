//! Wire shapes for quiz data, as embedded in the take-quiz page or returned by
//! the quiz API. Converted into validated domain types by `Quiz::from_inline`
//! and `Quiz::from_payload`.

use std::collections::BTreeMap;

use serde::Deserialize;

/// An option as it appears on the wire: either a bare string or an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OptionPayload {
    Text(String),
    Object {
        #[serde(default)]
        id: Option<u64>,
        #[serde(default)]
        text: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionPayload {
    pub id: u64,
    #[serde(default, alias = "question_text")]
    pub text: Option<String>,
    #[serde(default)]
    pub marks: Option<u32>,
    #[serde(default)]
    pub options: Vec<OptionPayload>,
}

/// Quiz metadata supplied next to the inline questions list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizMetadata {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// Planned duration in minutes.
    #[serde(alias = "durationMinutes", alias = "duration_minutes")]
    pub duration: u32,
    #[serde(default, alias = "passingMarks")]
    pub passing_marks: Option<u32>,
    #[serde(default, alias = "totalMarks")]
    pub total_marks: Option<u32>,
}

/// Prior progress for a question when resuming an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PreviousAnswer {
    #[serde(default)]
    pub selected_option: Option<u64>,
    #[serde(default)]
    pub is_flagged: bool,
}

/// Full quiz document returned by the quiz-by-id endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizPayload {
    #[serde(flatten)]
    pub metadata: QuizMetadata,
    pub questions: Vec<QuestionPayload>,
    #[serde(default, rename = "attemptId", alias = "attempt_id")]
    pub attempt_id: Option<u64>,
    /// Keyed by question id rendered as text (JSON object keys).
    #[serde(default, rename = "previousAnswers", alias = "previous_answers")]
    pub previous_answers: Option<BTreeMap<String, PreviousAnswer>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_accept_strings_and_objects() {
        let raw = r#"["Paris", {"id": 17, "text": "Rome"}, {"text": "Oslo"}, {}]"#;
        let options: Vec<OptionPayload> = serde_json::from_str(raw).unwrap();
        assert_eq!(options[0], OptionPayload::Text("Paris".into()));
        assert_eq!(
            options[1],
            OptionPayload::Object {
                id: Some(17),
                text: Some("Rome".into())
            }
        );
        assert_eq!(
            options[2],
            OptionPayload::Object {
                id: None,
                text: Some("Oslo".into())
            }
        );
        assert_eq!(options[3], OptionPayload::Object { id: None, text: None });
    }

    #[test]
    fn api_payload_reads_camel_case_resume_fields() {
        let raw = r#"{
            "id": 3,
            "title": "Capitals",
            "duration": 10,
            "attemptId": 99,
            "questions": [{"id": 1, "text": "Q", "options": ["a", "b"]}],
            "previousAnswers": {"1": {"selected_option": 1, "is_flagged": true}}
        }"#;
        let payload: QuizPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.metadata.id, 3);
        assert_eq!(payload.metadata.duration, 10);
        assert_eq!(payload.attempt_id, Some(99));
        let prev = payload.previous_answers.unwrap();
        assert_eq!(
            prev.get("1"),
            Some(&PreviousAnswer {
                selected_option: Some(1),
                is_flagged: true
            })
        );
    }

    #[test]
    fn metadata_accepts_alternate_duration_names() {
        let meta: QuizMetadata =
            serde_json::from_str(r#"{"id": 1, "title": "T", "durationMinutes": 5}"#).unwrap();
        assert_eq!(meta.duration, 5);
        assert_eq!(meta.passing_marks, None);
    }
}
