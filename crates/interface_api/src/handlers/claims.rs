//! Claims handlers
//!
//! Lecturer submission and history, the review queue, and the home counters.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::{ClaimId, UserId};
use domain_identity::{Actor, Capability, Role, UserQuery};
use domain_reporting::report::UNKNOWN_LECTURER;

use crate::dto::claims::*;
use crate::{error::ApiError, AppState};

/// Most recent claims shown when no limit is given
pub const DEFAULT_RECENT_LIMIT: u32 = 5;

/// Submits a claim for the calling lecturer
pub async fn submit_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<SubmitClaimRequest>,
) -> Result<(StatusCode, Json<ClaimResponse>), ApiError> {
    let claim = state.lifecycle.submit(&actor, request.into()).await?;
    Ok((StatusCode::CREATED, Json(claim.into())))
}

/// The calling lecturer's claims, newest first
pub async fn my_claims(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    let claims = state.lifecycle.history_for(&actor).await?;
    Ok(Json(claims.into_iter().map(ClaimResponse::from).collect()))
}

/// Submitted claims awaiting review, oldest first
pub async fn pending_claims(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<PendingClaimResponse>>, ApiError> {
    let claims = state.lifecycle.pending_queue(&actor).await?;

    let mut names: HashMap<UserId, String> = HashMap::new();
    for claim in &claims {
        if names.contains_key(&claim.lecturer_id) {
            continue;
        }
        let name = match state.users.get_user(claim.lecturer_id).await {
            Ok(user) => user.name,
            Err(e) if e.is_not_found() => UNKNOWN_LECTURER.to_string(),
            Err(e) => return Err(e.into()),
        };
        names.insert(claim.lecturer_id, name);
    }

    Ok(Json(
        claims
            .into_iter()
            .map(|claim| PendingClaimResponse {
                lecturer_name: names
                    .get(&claim.lecturer_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_LECTURER.to_string()),
                claim: claim.into(),
            })
            .collect(),
    ))
}

/// Most recently submitted claims, for reviewers
pub async fn recent_claims(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<ClaimResponse>>, ApiError> {
    domain_identity::authorize(&actor, Capability::ReviewClaims)?;
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);
    let claims = state.lifecycle.recent(limit).await?;
    Ok(Json(claims.into_iter().map(ClaimResponse::from).collect()))
}

/// One claim
///
/// Lecturers only see their own claims; another lecturer's claim reads as
/// not found.
pub async fn get_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim_id = ClaimId::from_uuid(id);
    let claim = state.lifecycle.claim(claim_id).await?;
    if actor.role == Role::Lecturer && claim.lecturer_id != actor.user_id {
        return Err(ApiError::NotFound(format!("Claim {} not found", claim_id)));
    }
    Ok(Json(claim.into()))
}

pub async fn approve_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state.lifecycle.approve(&actor, ClaimId::from_uuid(id)).await?;
    Ok(Json(claim.into()))
}

pub async fn reject_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let claim = state.lifecycle.reject(&actor, ClaimId::from_uuid(id)).await?;
    Ok(Json(claim.into()))
}

/// User and claim counters for the home view
pub async fn home_counts(
    State(state): State<AppState>,
) -> Result<Json<HomeCountsResponse>, ApiError> {
    let total_users = state.users.count_users(UserQuery::default()).await?;
    let counts = state.lifecycle.counts().await?;
    Ok(Json(HomeCountsResponse::new(total_users, counts)))
}
