//! HR handlers
//!
//! Dashboard views, reports and payment runs. Open to Managers and HR.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::ClaimId;
use domain_identity::{authorize, Actor, Capability};
use domain_reporting::{
    file_name, to_xlsx, DashboardStatistics, DepartmentShare, LecturerTotal, ReportData,
    TrendPoint, DEFAULT_PERFORMANCE_LIMIT, DEFAULT_TREND_MONTHS, XLSX_CONTENT_TYPE,
};

use crate::dto::claims::{MarkProcessedResponse, PaymentRunResponse};
use crate::dto::hr::{PerformanceQuery, ReportQuery, TrendQuery};
use crate::{error::ApiError, AppState};

/// Longest trend window served
pub const MAX_TREND_MONTHS: u32 = 36;

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<DashboardStatistics>, ApiError> {
    authorize(&actor, Capability::ViewDashboard)?;
    let now = state.clock.utc();
    Ok(Json(state.reporting.dashboard_statistics(now).await))
}

/// Approved payouts per month, oldest first
pub async fn monthly_trend(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<Vec<TrendPoint>>, ApiError> {
    authorize(&actor, Capability::ViewDashboard)?;
    let months = query
        .months
        .unwrap_or(DEFAULT_TREND_MONTHS)
        .min(MAX_TREND_MONTHS);
    let now = state.clock.utc();
    Ok(Json(state.reporting.monthly_trend(now, months).await))
}

pub async fn lecturer_performance(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<PerformanceQuery>,
) -> Result<Json<Vec<LecturerTotal>>, ApiError> {
    authorize(&actor, Capability::ViewDashboard)?;
    let limit = query.limit.unwrap_or(DEFAULT_PERFORMANCE_LIMIT);
    Ok(Json(state.reporting.lecturer_performance(limit).await))
}

pub async fn department_breakdown(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<DepartmentShare>>, ApiError> {
    authorize(&actor, Capability::ViewDashboard)?;
    Ok(Json(state.reporting.department_breakdown()))
}

/// Report rows and summary as JSON
pub async fn report(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportData>, ApiError> {
    authorize(&actor, Capability::GenerateReports)?;
    let now = state.clock.utc();
    Ok(Json(state.reporting.report_data(query.report_type(), now).await))
}

/// The same report as an xlsx download
pub async fn export_report(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    authorize(&actor, Capability::GenerateReports)?;
    let now = state.clock.utc();
    let report = state.reporting.report_data(query.report_type(), now).await;

    let name = file_name(report.report_type.label(), now.date_naive());
    let bytes = tokio::task::spawn_blocking(move || to_xlsx(&report))
        .await
        .map_err(|e| ApiError::Internal(format!("Export task failed: {}", e)))??;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", name),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Pays every approved claim not yet paid
pub async fn run_payments(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<PaymentRunResponse>, ApiError> {
    let summary = state.lifecycle.process_payments(&actor).await?;
    Ok(Json(summary.into()))
}

/// Pays one approved claim
pub async fn mark_processed(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<MarkProcessedResponse>, ApiError> {
    let claim_id = ClaimId::from_uuid(id);
    let outcome = state.lifecycle.mark_processed(&actor, claim_id).await?;
    Ok(Json(MarkProcessedResponse::new(claim_id, outcome)))
}
