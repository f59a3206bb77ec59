//! Research search endpoint

use std::time::Instant;

use axum::extract::{Extension, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use scholarly_shared::ResearchQueryRecord;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    search::{truncate_abstract, ResearchDocument},
    state::AppState,
};

fn default_databases() -> Vec<String> {
    vec![
        "pubmed".to_string(),
        "arxiv".to_string(),
        "crossref".to_string(),
    ]
}

fn default_max_results() -> u32 {
    50
}

#[derive(Debug, Deserialize)]
pub struct ResearchSearchRequest {
    pub query: String,
    #[serde(default = "default_databases")]
    pub databases: Vec<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub publication_date: Option<String>,
    pub source: Option<String>,
    pub doi: Option<String>,
    pub citations: i64,
    pub quality_score: Option<f64>,
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResearchSearchResponse {
    pub query: String,
    pub results_count: usize,
    pub processing_time_ms: i64,
    pub databases_searched: Vec<String>,
    pub results: Vec<SearchResultItem>,
}

/// POST /research/search - proxy a query to the research engine and log it
pub async fn search(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<ResearchSearchRequest>,
) -> ApiResult<Json<ResearchSearchResponse>> {
    if payload.query.trim().is_empty() {
        return Err(ApiError::Validation("Query must not be empty".to_string()));
    }

    let start = Instant::now();

    let documents = state
        .research
        .search(&payload.query, payload.max_results)
        .await
        .map_err(|e| ApiError::SearchFailed(e.to_string()))?;

    let processing_time_ms = start.elapsed().as_millis() as i64;

    let record: ResearchQueryRecord = sqlx::query_as(
        r#"
        INSERT INTO research_queries (user_id, query_text, databases, results_count, processing_time_ms)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, query_text, databases, results_count, processing_time_ms, created_at
        "#,
    )
    .bind(auth_user.user_id)
    .bind(&payload.query)
    .bind(&payload.databases)
    .bind(documents.len() as i32)
    .bind(processing_time_ms as i32)
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(
        query_id = %record.id,
        user_id = %auth_user.user_id,
        results = record.results_count,
        processing_time_ms = record.processing_time_ms,
        "Research search completed"
    );

    let results: Vec<SearchResultItem> = documents.into_iter().map(format_result).collect();

    Ok(Json(ResearchSearchResponse {
        query: payload.query,
        results_count: results.len(),
        processing_time_ms,
        databases_searched: payload.databases,
        results,
    }))
}

fn format_result(doc: ResearchDocument) -> SearchResultItem {
    SearchResultItem {
        title: doc.title,
        authors: doc.authors,
        abstract_text: truncate_abstract(doc.abstract_text),
        publication_date: doc.publication_date,
        source: doc.source,
        doi: doc.doi,
        citations: doc.citations,
        quality_score: doc.quality_score,
        url: doc.url,
    }
}
