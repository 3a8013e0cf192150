use anyhow::Context;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde_json::Value;

use crate::config::GithubConfig;
use crate::github::GithubError;
use crate::models::{RateLimit, RepositoryCandidate};

/// One page of search results with the rate-limit status that came with it.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// The `q` parameter that produced this page.
    pub query: String,
    pub items: Vec<RepositoryCandidate>,
    pub total_count: Option<u64>,
    pub rate_limit: RateLimit,
}

impl SearchPage {
    pub fn from_body(
        query: &str,
        body: &str,
        rate_limit: RateLimit,
    ) -> Result<Self, GithubError> {
        let (items, total_count) = parse_search_body(body)?;
        Ok(Self {
            query: query.to_string(),
            items,
            total_count,
            rate_limit,
        })
    }
}

/// Build a search query: keywords joined by spaces, plus a
/// `language:` qualifier when given. Empty when there is nothing to search.
pub fn build_query(keywords: &[String], language: Option<&str>) -> String {
    let mut query = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(lang) = language.map(str::trim).filter(|l| !l.is_empty()) {
        query.push_str(" language:");
        query.push_str(lang);
    }
    query.trim().to_string()
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Read `X-RateLimit-*` headers. Missing or unparsable headers leave the
/// corresponding field empty.
pub fn parse_rate_limit(headers: &HeaderMap) -> RateLimit {
    RateLimit {
        remaining: header_number(headers, "x-ratelimit-remaining"),
        limit: header_number(headers, "x-ratelimit-limit"),
        reset: header_number(headers, "x-ratelimit-reset"),
    }
}

/// Parse a search response body into candidates. A body without `items`
/// yields no candidates; individual malformed items are read with fallbacks.
pub fn parse_search_body(
    body: &str,
) -> Result<(Vec<RepositoryCandidate>, Option<u64>), GithubError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| GithubError::Decode(e.to_string()))?;
    if !json.is_object() {
        return Err(GithubError::Decode("expected a JSON object".to_string()));
    }

    let items = match json.get("items") {
        Some(Value::Array(items)) => items.iter().map(RepositoryCandidate::from_value).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(_) => return Err(GithubError::Decode("`items` is not an array".to_string())),
    };
    let total_count = json.get("total_count").and_then(Value::as_u64);

    Ok((items, total_count))
}

/// Client for the `/search/repositories` endpoint.
#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build GitHub HTTP client")?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: reqwest::Client, config: GithubConfig) -> Self {
        Self { http, config }
    }

    pub fn is_authenticated(&self) -> bool {
        self.config.token.is_some()
    }

    /// Search with keywords and an optional language qualifier.
    pub async fn fetch_combined(
        &self,
        keywords: &[String],
        language: Option<&str>,
    ) -> Result<SearchPage, GithubError> {
        let query = build_query(keywords, language);
        self.search_repositories(&query, self.config.per_page).await
    }

    pub async fn search_repositories(
        &self,
        query: &str,
        per_page: usize,
    ) -> Result<SearchPage, GithubError> {
        if query.trim().is_empty() {
            return Err(GithubError::EmptyQuery);
        }

        let url = format!("{}/search/repositories", self.config.api_url);
        let per_page = per_page.min(self.config.max_results).max(1);

        let mut req = self
            .http
            .get(&url)
            .header(ACCEPT, "application/vnd.github.v3+json")
            .header(USER_AGENT, concat!("repo-scout/", env!("CARGO_PKG_VERSION")))
            .query(&[("q", query.to_string()), ("per_page", per_page.to_string())]);
        if let Some(token) = &self.config.token {
            req = req.header(AUTHORIZATION, format!("token {token}"));
        }

        tracing::info!("Searching GitHub: q={query:?} per_page={per_page}");
        let resp = req.send().await?;

        let status = resp.status();
        let rate_limit = parse_rate_limit(resp.headers());
        let body = resp.text().await?;

        if status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!("GitHub returned 403, remaining={:?}", rate_limit.remaining);
            return Err(GithubError::RateLimited { rate_limit, body });
        }
        if !status.is_success() {
            tracing::warn!("GitHub search returned {status}");
            return Err(GithubError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let page = SearchPage::from_body(query, &body, rate_limit)?;
        tracing::info!(
            "GitHub returned {} items (total {:?}), rate limit remaining {:?}",
            page.items.len(),
            page.total_count,
            page.rate_limit.remaining
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_query_keywords_only() {
        assert_eq!(build_query(&words(&["react", "dashboard"]), None), "react dashboard");
    }

    #[test]
    fn test_build_query_with_language() {
        assert_eq!(
            build_query(&words(&["web", "app"]), Some("python")),
            "web app language:python"
        );
    }

    #[test]
    fn test_build_query_language_only() {
        assert_eq!(build_query(&[], Some("rust")), "language:rust");
    }

    #[test]
    fn test_build_query_empty() {
        assert_eq!(build_query(&[], None), "");
        assert_eq!(build_query(&words(&["  ", ""]), Some(" ")), "");
    }

    #[test]
    fn test_parse_rate_limit_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("9"));
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("10"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1700000000"));
        let limit = parse_rate_limit(&headers);
        assert_eq!(limit.remaining, Some(9));
        assert_eq!(limit.limit, Some(10));
        assert_eq!(limit.reset, Some(1_700_000_000));
        assert!(!limit.is_exhausted());
    }

    #[test]
    fn test_parse_rate_limit_missing_or_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("lots"));
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("60"));
        let limit = parse_rate_limit(&headers);
        assert_eq!(limit.remaining, None);
        assert_eq!(limit.limit, Some(60));
        assert_eq!(limit.reset, None);
        assert_eq!(parse_rate_limit(&HeaderMap::new()), RateLimit::default());
    }

    #[test]
    fn test_parse_search_body_items() {
        let body = r#"{
            "total_count": 2,
            "incomplete_results": false,
            "items": [
                {"name": "a", "stargazers_count": 3, "updated_at": "2024-01-01T00:00:00Z"},
                {"name": "b", "description": null, "stargazers_count": -1}
            ]
        }"#;
        let (items, total) = parse_search_body(body).unwrap();
        assert_eq!(total, Some(2));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].stargazer_count, 3);
        assert_eq!(items[1].stargazer_count, 0);
    }

    #[test]
    fn test_parse_search_body_without_items() {
        let (items, total) = parse_search_body(r#"{"message": "ok"}"#).unwrap();
        assert!(items.is_empty());
        assert_eq!(total, None);
    }

    #[test]
    fn test_parse_search_body_rejects_malformed() {
        assert!(matches!(parse_search_body("not json"), Err(GithubError::Decode(_))));
        assert!(matches!(parse_search_body("[1, 2]"), Err(GithubError::Decode(_))));
        assert!(matches!(
            parse_search_body(r#"{"items": "nope"}"#),
            Err(GithubError::Decode(_))
        ));
    }

    #[test]
    fn test_search_page_keeps_query_and_total() {
        let query = build_query(&words(&["flask", "web"]), Some("python"));
        let body = r#"{"total_count": 1234, "items": [{"name": "flask-starter"}]}"#;
        let rate_limit = RateLimit {
            remaining: Some(9),
            limit: Some(10),
            reset: None,
        };
        let page = SearchPage::from_body(&query, body, rate_limit).unwrap();
        assert_eq!(page.query, "flask web language:python");
        assert_eq!(page.total_count, Some(1234));
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.rate_limit, rate_limit);
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected_without_network() {
        let client = GithubClient::new(GithubConfig::default()).unwrap();
        assert!(!client.is_authenticated());
        let authed = GithubClient::new(GithubConfig {
            token: Some("ghp_test".to_string()),
            ..GithubConfig::default()
        })
        .unwrap();
        assert!(authed.is_authenticated());

        let err = client.search_repositories("   ", 10).await.unwrap_err();
        assert!(matches!(err, GithubError::EmptyQuery));

        let err = client.fetch_combined(&[], None).await.unwrap_err();
        assert!(matches!(err, GithubError::EmptyQuery));
    }

    #[test]
    fn test_error_messages() {
        let err = GithubError::Api {
            status: 422,
            body: "Validation Failed".to_string(),
        };
        assert_eq!(err.to_string(), "GitHub API error 422: Validation Failed");
        assert_eq!(GithubError::EmptyQuery.to_string(), "Empty search query");
    }
}
