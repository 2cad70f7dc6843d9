use std::env;
use std::time::Duration;

use url::Url;

use crate::error::BackendError;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: Url,
    pub csrf_token: Option<String>,
    /// Raw `Cookie:` header (session + csrftoken) seeding the client cookie jar.
    pub cookie: Option<String>,
    pub request_timeout: Option<Duration>,
}

impl BackendConfig {
    /// # Errors
    ///
    /// Returns `BackendError::InvalidUrl` when `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            csrf_token: None,
            cookie: None,
            request_timeout: None,
        })
    }

    /// Reads `QUIZ_BASE_URL`, `QUIZ_CSRF_TOKEN`, `QUIZ_COOKIE` and
    /// `QUIZ_REQUEST_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidUrl` when `QUIZ_BASE_URL` does not parse.
    pub fn from_env() -> Result<Self, BackendError> {
        let base_url = env::var("QUIZ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let request_timeout = env::var("QUIZ_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self::new(&base_url)?
            .with_csrf_token(non_empty_env("QUIZ_CSRF_TOKEN"))
            .with_cookie(non_empty_env("QUIZ_COOKIE"))
            .with_request_timeout(request_timeout))
    }

    #[must_use]
    pub fn with_csrf_token(mut self, token: Option<String>) -> Self {
        self.csrf_token = token;
        self
    }

    #[must_use]
    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Resolves `path` (no leading slash) against the base url.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidUrl` if the joined url is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

// `Url::join` replaces the last path segment unless the base ends with '/'.
fn normalize_base_url(raw: &str) -> Result<Url, BackendError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Ok(Url::parse(&with_slash)?)
}
