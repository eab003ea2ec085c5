use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::Job,
    services::jobs,
    state::AppState,
};

pub async fn list_jobs(State(state): State<AppState>) -> AppResult<Json<Vec<Job>>> {
    let jobs = jobs::get_all_jobs(&state.base)
        .await
        .map_err(|err| AppError::downstream("Failed to load jobs", err))?;
    Ok(Json(jobs))
}

pub async fn get_job(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> AppResult<Json<Job>> {
    let job = jobs::find_job_by_path_segment(&state.base, &segment)
        .await
        .map_err(|err| AppError::downstream("Failed to load job", err))?;
    job.map(Json)
        .ok_or_else(|| AppError::not_found("Job not found"))
}
