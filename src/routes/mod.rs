use axum::http::HeaderValue;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod extract;
pub mod forms;
pub mod health;
pub mod jobs;
pub mod submissions;

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router<()> {
    let cors = cors_layer(state.config.cors_allowed_origin.as_deref());

    let jobs_routes = Router::new()
        .route("/", get(jobs::list_jobs))
        .route("/:id", get(jobs::get_job));

    Router::new()
        .nest("/api/jobs", jobs_routes)
        .route("/api/referrals", post(submissions::submit_candidate_referral))
        .route(
            "/api/company-referrals",
            post(submissions::submit_company_referral),
        )
        .route(
            "/api/resume-pool",
            post(submissions::submit_resume_pool_entry),
        )
        .route(
            "/api/job-applications",
            post(submissions::submit_job_application),
        )
        .route(
            "/api/candidate-requests",
            post(submissions::submit_candidate_request),
        )
        .route("/api/forms", post(forms::relay_form))
        .route("/api/health", get(health::health_check))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

fn cors_layer(allowed: Option<&str>) -> CorsLayer {
    let allow_origin = match allowed {
        Some(origins) => {
            let headers: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .filter_map(|value| match value.parse::<HeaderValue>() {
                    Ok(header) => Some(header),
                    Err(_) => {
                        tracing::warn!(origin = value, "ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();
            AllowOrigin::list(headers)
        }
        None => AllowOrigin::mirror_request(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
