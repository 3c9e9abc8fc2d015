//! HTTP API Layer
//!
//! REST API for the claim management system, built on Axum.
//!
//! # Architecture
//!
//! - **Handlers**: login, claims, HR dashboard/reports/payments, health
//! - **Middleware**: bearer-token authentication, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: domain errors mapped onto status codes with JSON bodies
//!
//! Handlers work against the `ClaimStore` and `UserDirectory` ports, so the
//! same router runs on PostgreSQL or on the in-memory stores.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(config, users, claims, clock)?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod seed;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::{Clock, CoreError};
use domain_claims::{ClaimStore, LifecycleEngine};
use domain_identity::UserDirectory;
use domain_reporting::AggregationEngine;

use crate::config::ApiConfig;
use crate::handlers::{auth as login, claims, health, hr};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub users: Arc<dyn UserDirectory>,
    pub claims: Arc<dyn ClaimStore>,
    pub lifecycle: LifecycleEngine,
    pub reporting: AggregationEngine,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wires both engines onto the given stores
    ///
    /// Fails if the configured currency is unknown.
    pub fn new(
        config: ApiConfig,
        users: Arc<dyn UserDirectory>,
        claims: Arc<dyn ClaimStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CoreError> {
        let currency = config.currency()?;
        let lifecycle = LifecycleEngine::new(claims.clone(), clock.clone()).with_currency(currency);
        let reporting = AggregationEngine::new(claims.clone(), users.clone()).with_currency(currency);
        Ok(Self {
            config,
            users,
            claims,
            lifecycle,
            reporting,
            clock,
        })
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/v1/auth/login", post(login::login));

    let claims_routes = Router::new()
        .route("/", post(claims::submit_claim))
        .route("/mine", get(claims::my_claims))
        .route("/pending", get(claims::pending_claims))
        .route("/recent", get(claims::recent_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/approve", post(claims::approve_claim))
        .route("/:id/reject", post(claims::reject_claim));

    let hr_routes = Router::new()
        .route("/dashboard", get(hr::dashboard))
        .route("/trend", get(hr::monthly_trend))
        .route("/performance", get(hr::lecturer_performance))
        .route("/departments", get(hr::department_breakdown))
        .route("/reports", get(hr::report))
        .route("/reports/export", get(hr::export_report))
        .route("/payments", post(hr::run_payments))
        .route("/claims/:id/process", post(hr::mark_processed));

    // Protected API routes; auth runs before audit so the caller is logged
    let api_routes = Router::new()
        .route("/home", get(claims::home_counts))
        .nest("/claims", claims_routes)
        .nest("/hr", hr_routes)
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware))
                .layer(axum_middleware::from_fn(audit_middleware)),
        );

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
