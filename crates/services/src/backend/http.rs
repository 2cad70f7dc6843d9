use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use log::{debug, error, info, warn};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use url::Url;

use quiz_core::model::{
    AttemptId, LoadedQuiz, QuestionPayload, Quiz, QuizId, QuizMetadata, QuizPayload,
};

use super::config::BackendConfig;
use super::page::{self, METADATA_SCRIPT_ID, QUESTIONS_SCRIPT_ID};
use super::{QuizBackend, QuizSource, SubmissionReceipt, SubmissionRequest, SubmitResponse};
use crate::error::BackendError;

const CSRF_HEADER: &str = "X-CSRFToken";

/// `QuizBackend` speaking to the quiz server over HTTP.
///
/// Cookies live in a jar shared by every request: the configured cookie
/// header seeds it and `Set-Cookie` responses (the take-quiz page sets
/// `csrftoken`) update it.
pub struct HttpQuizBackend {
    client: Client,
    config: BackendConfig,
    cookies: Arc<Jar>,
    /// CSRF token scraped from the last take-quiz page we loaded.
    page_csrf: Mutex<Option<String>>,
}

impl HttpQuizBackend {
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let cookies = Arc::new(Jar::default());
        if let Some(header) = config.cookie.as_deref() {
            seed_cookies(&cookies, header, &config.base_url);
        }

        let mut builder = Client::builder().cookie_provider(Arc::clone(&cookies));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
            cookies,
            page_csrf: Mutex::new(None),
        })
    }

    /// Cookie header the jar would send to `url`.
    fn cookie_header(&self, url: &Url) -> Option<String> {
        let value = self.cookies.cookies(url)?;
        value.to_str().ok().map(str::to_string)
    }

    fn csrf_token(&self, url: &Url) -> Option<String> {
        let page_meta = self
            .page_csrf
            .lock()
            .ok()
            .and_then(|guard| guard.clone());
        page::resolve_csrf_token(
            self.config.csrf_token.as_deref(),
            self.cookie_header(url).as_deref(),
            page_meta.as_deref(),
        )
    }

    fn remember_page_csrf(&self, html: &str) {
        let Some(token) = page::csrf_meta_content(html) else {
            return;
        };
        if let Ok(mut guard) = self.page_csrf.lock() {
            *guard = Some(token);
        }
    }

    async fn load_from_api(&self, quiz_id: QuizId) -> Result<LoadedQuiz, BackendError> {
        let url = self.config.endpoint(&format!("api/quiz/{quiz_id}/"))?;
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let payload: QuizPayload = response.json().await?;
        Ok(Quiz::from_payload(payload)?)
    }

    async fn load_from_page(&self, quiz_id: QuizId) -> Result<LoadedQuiz, BackendError> {
        let url = self
            .config
            .endpoint(&format!("quiz/student/quiz/{quiz_id}/take/"))?;
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        let html = ensure_success(response).await?.text().await?;
        self.remember_page_csrf(&html);
        parse_inline_page(&html)
    }
}

fn seed_cookies(jar: &Jar, header: &str, base_url: &Url) {
    for pair in header.split(';').map(str::trim).filter(|pair| pair.contains('=')) {
        jar.add_cookie_str(pair, base_url);
    }
}

/// Builds a quiz from the JSON scripts embedded in the take-quiz page.
///
/// # Errors
///
/// Returns `BackendError::MissingPageData` when either script is absent,
/// `BackendError::Decode` for malformed JSON, and `BackendError::InvalidQuiz`
/// when validation fails.
pub fn parse_inline_page(html: &str) -> Result<LoadedQuiz, BackendError> {
    let questions = page::json_script(html, QUESTIONS_SCRIPT_ID)
        .ok_or(BackendError::MissingPageData("quiz questions"))?;
    let metadata = page::json_script(html, METADATA_SCRIPT_ID)
        .ok_or(BackendError::MissingPageData("quiz configuration"))?;

    let questions: Vec<QuestionPayload> = serde_json::from_str(&questions)?;
    let metadata: QuizMetadata = serde_json::from_str(&metadata)?;
    Ok(LoadedQuiz::fresh(Quiz::from_inline(metadata, questions)?))
}

async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    error!("HTTP {status}: {body}");
    Err(BackendError::HttpStatus { status, body })
}

#[async_trait]
impl QuizBackend for HttpQuizBackend {
    async fn load_quiz(
        &self,
        quiz_id: QuizId,
        source: QuizSource,
    ) -> Result<LoadedQuiz, BackendError> {
        let loaded = match source {
            QuizSource::Api => self.load_from_api(quiz_id).await?,
            QuizSource::InlinePage => self.load_from_page(quiz_id).await?,
        };
        info!(
            "loaded quiz {} ({:?}): {} questions, {} minutes",
            loaded.quiz.id(),
            source,
            loaded.quiz.question_count(),
            loaded.quiz.duration_minutes()
        );
        Ok(loaded)
    }

    async fn submit(
        &self,
        quiz_id: QuizId,
        request: &SubmissionRequest,
    ) -> Result<SubmissionReceipt, BackendError> {
        let url = self
            .config
            .endpoint(&format!("quiz/student/quiz/{quiz_id}/submit/"))?;
        let Some(csrf) = self.csrf_token(&url) else {
            warn!("refusing to submit quiz {quiz_id}: no CSRF token available");
            return Err(BackendError::MissingCsrfToken);
        };
        info!(
            "POST {url}: {} answers, {} flagged, {}s spent",
            request.answers.len(),
            request.flagged_question_ids.len(),
            request.time_spent_seconds
        );

        let response = self
            .client
            .post(url)
            .header(CSRF_HEADER, csrf)
            .json(request)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains("application/json") {
            let body = response.text().await.unwrap_or_default();
            error!("non-JSON submit response ({content_type}): {body}");
            let shown = if content_type.is_empty() {
                "unknown".to_string()
            } else {
                content_type
            };
            return Err(BackendError::UnexpectedContentType(shown));
        }

        let body: SubmitResponse = response.json().await?;
        body.into_receipt()
    }

    fn result_url(&self, attempt_id: AttemptId) -> String {
        let path = format!("quiz/student/attempt/{attempt_id}/result/");
        self.config
            .endpoint(&path)
            .map_or_else(|_| format!("/{path}"), |url| url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <meta name="csrf-token" content="tok">
        <script id="questions-data" type="application/json">
            [{"id": 10, "text": "2+2?", "marks": 2, "options": [{"id": 100, "text": "4"}, {"id": 101, "text": "5"}]}]
        </script>
        <script id="quiz-metadata" type="application/json">{"id": 3, "title": "Math", "duration": 1}</script>
    "#;

    #[test]
    fn inline_page_merges_metadata_and_questions() {
        let loaded = parse_inline_page(PAGE).unwrap();
        assert_eq!(loaded.quiz.id(), QuizId::new(3));
        assert_eq!(loaded.quiz.title(), "Math");
        assert_eq!(loaded.quiz.question_count(), 1);
        assert_eq!(loaded.quiz.questions()[0].marks(), 2);
        assert!(loaded.resume.is_none());
    }

    #[test]
    fn inline_page_without_questions_is_missing_data() {
        let err = parse_inline_page("<html></html>").unwrap_err();
        assert!(matches!(err, BackendError::MissingPageData("quiz questions")));
    }

    fn submit_url(backend: &HttpQuizBackend) -> Url {
        backend.config.endpoint("quiz/student/quiz/3/submit/").unwrap()
    }

    #[test]
    fn page_csrf_is_used_when_config_has_none() {
        let backend = HttpQuizBackend::new(BackendConfig::new("http://localhost:8000").unwrap())
            .unwrap();
        let url = submit_url(&backend);
        assert_eq!(backend.csrf_token(&url), None);
        backend.remember_page_csrf(PAGE);
        assert_eq!(backend.csrf_token(&url).as_deref(), Some("tok"));
    }

    #[test]
    fn configured_cookie_seeds_the_jar_and_wins_over_page_meta() {
        let config = BackendConfig::new("http://localhost:8000/school")
            .unwrap()
            .with_cookie(Some("sessionid=s1; csrftoken=from%2Bcookie".to_string()));
        let backend = HttpQuizBackend::new(config).unwrap();
        backend.remember_page_csrf(PAGE);

        let url = submit_url(&backend);
        let header = backend.cookie_header(&url).unwrap();
        assert!(header.contains("sessionid=s1"));
        assert_eq!(backend.csrf_token(&url).as_deref(), Some("from+cookie"));
    }

    #[test]
    fn jar_cookies_from_responses_supply_the_token() {
        let backend = HttpQuizBackend::new(BackendConfig::new("http://localhost:8000").unwrap())
            .unwrap();
        let url = submit_url(&backend);
        let set_cookie = reqwest::header::HeaderValue::from_static("csrftoken=jar-token; Path=/");
        backend
            .cookies
            .set_cookies(&mut std::iter::once(&set_cookie), &backend.config.base_url);
        assert_eq!(backend.csrf_token(&url).as_deref(), Some("jar-token"));
    }

    #[test]
    fn result_url_points_at_attempt_results() {
        let backend = HttpQuizBackend::new(BackendConfig::new("http://localhost:8000").unwrap())
            .unwrap();
        assert_eq!(
            backend.result_url(AttemptId::new(55)),
            "http://localhost:8000/quiz/student/attempt/55/result/"
        );
    }

    #[tokio::test]
    async fn submit_without_csrf_token_sends_nothing() {
        // Unroutable base url: reaching the network would surface as an Http error.
        let backend =
            HttpQuizBackend::new(BackendConfig::new("http://127.0.0.1:9").unwrap()).unwrap();
        let request = SubmissionRequest {
            answers: std::collections::BTreeMap::new(),
            time_spent_seconds: 0,
            time_spent: 0,
            flagged_question_ids: Vec::new(),
            attempt_id: None,
        };
        let err = backend.submit(QuizId::new(1), &request).await.unwrap_err();
        assert!(matches!(err, BackendError::MissingCsrfToken));
    }
}
