//! The sync orchestrator: token → catalog → per-item map + upsert.
//!
//! A token or catalog failure aborts the whole run with a 500 envelope;
//! no partial catalog is processed. Failures on individual items are
//! caught, logged, and counted — the loop continues, and a batch with
//! failed items still returns 200. Items are processed strictly
//! sequentially; total latency scales with catalog size.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use qsync_qikink::{map_product, QikinkError};
use qsync_store::SyncRunRecord;

use super::AppState;
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub ok: bool,
    pub message: String,
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct SyncFailure {
    pub ok: bool,
    pub error: String,
}

pub async fn sync_qikink(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Response {
    let started_at = Utc::now();
    tracing::info!(request_id = %req_id.0, "manual qikink sync triggered");

    match run_sync(&state).await {
        Ok(report) => {
            tracing::info!(
                request_id = %req_id.0,
                total = report.total,
                success = report.success,
                failed = report.failed,
                "sync finished"
            );
            record_run(&state, started_at, &report, None).await;
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(error) => {
            tracing::error!(request_id = %req_id.0, error = %error, "sync aborted");
            let aborted = SyncReport {
                ok: false,
                message: String::new(),
                total: 0,
                success: 0,
                failed: 0,
            };
            record_run(&state, started_at, &aborted, Some(error.to_string())).await;
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SyncFailure {
                    ok: false,
                    error: error.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Runs one full sync pass against the configured Qikink endpoints.
///
/// # Errors
///
/// Returns [`QikinkError`] if the token exchange or the catalog fetch
/// fails; per-item upsert errors are absorbed into the report instead.
async fn run_sync(state: &AppState) -> Result<SyncReport, QikinkError> {
    let token = state.qikink.fetch_token().await?;
    let items = state.qikink.fetch_products(&token).await?;

    let total = items.len();
    let mut success = 0usize;
    let mut failed = 0usize;

    for item in &items {
        let product = map_product(item, Utc::now());
        match state.store.upsert_product(&product).await {
            Ok(()) => success += 1,
            Err(error) => {
                failed += 1;
                tracing::error!(
                    product_id = %product.product_id,
                    error = %error,
                    "product upsert failed"
                );
            }
        }
    }

    Ok(SyncReport {
        ok: true,
        message: format!("synced {success} of {total} products"),
        total,
        success,
        failed,
    })
}

/// Appends the run to the audit trail. Best-effort: a failure here is
/// logged and never surfaces to the caller.
async fn record_run(
    state: &AppState,
    started_at: DateTime<Utc>,
    report: &SyncReport,
    error: Option<String>,
) {
    let record = SyncRunRecord {
        run_id: Uuid::new_v4(),
        trigger_source: "http".to_string(),
        started_at,
        completed_at: Utc::now(),
        total: i64::try_from(report.total).unwrap_or(i64::MAX),
        success: i64::try_from(report.success).unwrap_or(i64::MAX),
        failed: i64::try_from(report.failed).unwrap_or(i64::MAX),
        error,
    };

    if let Err(e) = state.store.record_sync_run(&record).await {
        tracing::warn!(error = %e, "failed to record sync run");
    }
}
