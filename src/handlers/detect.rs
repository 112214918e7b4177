//! Detection handlers
//!
//! Each request carries the CSV as its body and the scorer parameters in the
//! query string, and is processed in one pass.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::logic::{export, pipeline, presenter, AnomalyScorer, IsolationForest, ZScoreDetector};
use crate::models::{AnalysisReport, IsolationForestParams, ZScoreParams};
use crate::{AppResult, AppState};

/// Score with an isolation forest and return the report
pub async fn isolation_forest(
    State(state): State<AppState>,
    Query(params): Query<IsolationForestParams>,
    body: Bytes,
) -> AppResult<Json<AnalysisReport>> {
    params.validate()?;
    let scorer = IsolationForest::from_params(&params, state.config.default_seed);
    Ok(Json(report(scorer, body).await?))
}

/// Score with an isolation forest and return the processed CSV
pub async fn isolation_forest_export(
    State(state): State<AppState>,
    Query(params): Query<IsolationForestParams>,
    body: Bytes,
) -> AppResult<Response> {
    params.validate()?;
    let scorer = IsolationForest::from_params(&params, state.config.default_seed);
    download(scorer, body).await
}

/// Score with per-feature z-scores and return the report
pub async fn zscore(
    Query(params): Query<ZScoreParams>,
    body: Bytes,
) -> AppResult<Json<AnalysisReport>> {
    params.validate()?;
    Ok(Json(report(ZScoreDetector::from_params(&params), body).await?))
}

/// Score with per-feature z-scores and return the processed CSV
pub async fn zscore_export(
    Query(params): Query<ZScoreParams>,
    body: Bytes,
) -> AppResult<Response> {
    params.validate()?;
    download(ZScoreDetector::from_params(&params), body).await
}

async fn report<S>(scorer: S, body: Bytes) -> AppResult<AnalysisReport>
where
    S: AnomalyScorer + 'static,
{
    tracing::debug!("Analyzing upload ({} bytes) with {}", body.len(), scorer.name());

    let report = tokio::task::spawn_blocking(move || {
        let dataset = pipeline::run(&body, &scorer)?;
        Ok::<_, crate::logic::AnalysisError>(presenter::build_report(&dataset, &scorer, &body))
    })
    .await??;

    Ok(report)
}

async fn download<S>(scorer: S, body: Bytes) -> AppResult<Response>
where
    S: AnomalyScorer + 'static,
{
    tracing::debug!("Exporting upload ({} bytes) with {}", body.len(), scorer.name());

    let csv = tokio::task::spawn_blocking(move || {
        let dataset = pipeline::run(&body, &scorer)?;
        export::to_csv(&dataset)
    })
    .await??;

    let disposition = format!("attachment; filename=\"{}\"", export::EXPORT_FILENAME);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
