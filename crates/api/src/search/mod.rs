//! Research engine client
//!
//! The search engine is an external collaborator reached over HTTP behind a
//! deliberately narrow interface: one call, query in, documents out. Retry,
//! pagination, and per-database fan-out live inside the engine, not here.

use serde::{Deserialize, Serialize};

/// A document returned by the research engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchDocument {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub publication_date: Option<String>,
    pub source: Option<String>,
    pub doi: Option<String>,
    #[serde(default)]
    pub citations: i64,
    pub quality_score: Option<f64>,
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<ResearchDocument>,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Research engine request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Research engine returned {status}: {body}")]
    Engine {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// HTTP client for the external research engine
#[derive(Clone)]
pub struct ResearchClient {
    http: reqwest::Client,
    base_url: String,
}

impl ResearchClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Run a comprehensive search. No retries; failures surface directly.
    pub async fn search(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<ResearchDocument>, SearchError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .json(&SearchRequest { query, max_results })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Engine { status, body });
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed.results)
    }
}

/// Truncate an abstract for API responses. The engine can return multi-page
/// abstracts; responses cap them at 500 characters with an ellipsis.
pub fn truncate_abstract(text: Option<String>) -> Option<String> {
    text.map(|t| {
        if t.chars().count() > 500 {
            let truncated: String = t.chars().take(500).collect();
            format!("{}...", truncated)
        } else {
            t
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_abstract_is_unchanged() {
        let text = Some("A short abstract.".to_string());
        assert_eq!(truncate_abstract(text).as_deref(), Some("A short abstract."));
    }

    #[test]
    fn long_abstract_is_truncated_with_ellipsis() {
        let text = Some("x".repeat(800));
        let result = truncate_abstract(text).unwrap();
        assert_eq!(result.chars().count(), 503);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn missing_abstract_stays_missing() {
        assert_eq!(truncate_abstract(None), None);
    }

    #[tokio::test]
    async fn search_parses_engine_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results":[{"title":"CRISPR off-target effects","authors":["A. Smith"],
                    "abstract":"We study...","publication_date":"2024-01-15","source":"pubmed",
                    "doi":"10.1000/xyz","citations":12,"quality_score":0.91,
                    "url":"https://example.org/paper"}]}"#,
            )
            .create_async()
            .await;

        let client = ResearchClient::new(server.url());
        let results = client.search("CRISPR", 50).await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "CRISPR off-target effects");
        assert_eq!(results[0].citations, 12);
    }

    #[tokio::test]
    async fn engine_error_surfaces_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/search")
            .with_status(502)
            .with_body("upstream database timeout")
            .create_async()
            .await;

        let client = ResearchClient::new(server.url());
        let err = client.search("CRISPR", 50).await.unwrap_err();

        match err {
            SearchError::Engine { status, body } => {
                assert_eq!(status.as_u16(), 502);
                assert_eq!(body, "upstream database timeout");
            }
            other => panic!("expected engine error, got {other:?}"),
        }
    }
}
