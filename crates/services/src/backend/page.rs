//! Helpers for reading data the server embeds in the take-quiz page and the
//! CSRF token the submit endpoint requires.

use std::sync::LazyLock;

use regex::Regex;

/// Cookie carrying the CSRF token.
pub const CSRF_COOKIE: &str = "csrftoken";
/// `<script type="application/json">` holding the questions list.
pub const QUESTIONS_SCRIPT_ID: &str = "questions-data";
/// `<script type="application/json">` holding id/title/duration.
pub const METADATA_SCRIPT_ID: &str = "quiz-metadata";

static CSRF_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*\bname\s*=\s*["']csrf-token["'][^>]*>"#)
        .expect("csrf meta pattern should compile")
});

static CONTENT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bcontent\s*=\s*["']([^"']*)["']"#)
        .expect("content attribute pattern should compile")
});

/// Value of cookie `name` in a `Cookie:` header string, percent-decoded.
#[must_use]
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().strip_prefix(name)?.strip_prefix('='))
        .find(|value| !value.is_empty())
        .map(|raw| {
            urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |value| value.into_owned())
        })
}

/// Content of `<meta name="csrf-token" content="...">`, if present.
#[must_use]
pub fn csrf_meta_content(html: &str) -> Option<String> {
    let tag = CSRF_META.find(html)?;
    let content = CONTENT_ATTR.captures(tag.as_str())?.get(1)?.as_str().trim();
    (!content.is_empty()).then(|| content.to_string())
}

/// Body of the `<script id="...">` element with the given id.
#[must_use]
pub fn json_script(html: &str, id: &str) -> Option<String> {
    let pattern = format!(
        r#"(?is)<script\b[^>]*\bid\s*=\s*["']{}["'][^>]*>(.*?)</script>"#,
        regex::escape(id)
    );
    let re = Regex::new(&pattern).ok()?;
    let body = re.captures(html)?.get(1)?.as_str().trim();
    (!body.is_empty()).then(|| body.to_string())
}

/// Picks the CSRF token: explicit value, then cookie, then page meta tag.
#[must_use]
pub fn resolve_csrf_token(
    explicit: Option<&str>,
    cookie_header: Option<&str>,
    page_meta: Option<&str>,
) -> Option<String> {
    explicit
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .or_else(|| cookie_header.and_then(|header| cookie_value(header, CSRF_COOKIE)))
        .or_else(|| {
            page_meta
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><head>
          <meta content="meta-token" name="csrf-token">
        </head><body>
          <script id="questions-data" type="application/json">[{"id": 1, "text": "Q", "options": ["a"]}]</script>
          <script type="application/json" id='quiz-metadata'>{"id": 5, "title": "T", "duration": 2}</script>
        </body></html>
    "#;

    #[test]
    fn cookie_value_decodes_and_skips_similar_names() {
        let header = "sessionid=abc; csrftokenx=nope; csrftoken=a%2Bb%3D";
        assert_eq!(cookie_value(header, CSRF_COOKIE).as_deref(), Some("a+b="));
        assert_eq!(cookie_value("sessionid=abc", CSRF_COOKIE), None);
    }

    #[test]
    fn meta_tag_is_found_regardless_of_attribute_order() {
        assert_eq!(csrf_meta_content(PAGE).as_deref(), Some("meta-token"));
        assert_eq!(csrf_meta_content("<html></html>"), None);
    }

    #[test]
    fn json_scripts_are_extracted_by_id() {
        let questions = json_script(PAGE, QUESTIONS_SCRIPT_ID).unwrap();
        assert!(questions.starts_with('['));
        let metadata = json_script(PAGE, METADATA_SCRIPT_ID).unwrap();
        assert!(metadata.contains("\"duration\": 2"));
        assert_eq!(json_script(PAGE, "missing"), None);
    }

    #[test]
    fn csrf_resolution_prefers_explicit_then_cookie_then_meta() {
        assert_eq!(
            resolve_csrf_token(Some("explicit"), Some("csrftoken=cookie"), Some("meta")).as_deref(),
            Some("explicit")
        );
        assert_eq!(
            resolve_csrf_token(Some("  "), Some("csrftoken=cookie"), Some("meta")).as_deref(),
            Some("cookie")
        );
        assert_eq!(
            resolve_csrf_token(None, Some("other=1"), Some("meta")).as_deref(),
            Some("meta")
        );
        assert_eq!(resolve_csrf_token(None, None, None), None);
    }
}
