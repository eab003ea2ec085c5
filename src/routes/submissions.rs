use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{CandidateReferral, CandidateRequest, CompanyReferral, JobApplication, ResumePoolEntry},
    services::submissions,
    state::AppState,
    validation::Payload,
};

use super::extract::JsonBody;

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub id: String,
}

impl SubmissionResponse {
    fn created(id: String) -> Json<Self> {
        Json(Self { success: true, id })
    }
}

pub async fn submit_candidate_referral(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<SubmissionResponse>> {
    let referral = CandidateReferral::from_payload(&Payload::from_value(&body)?)?;
    let id = submissions::submit_candidate_referral(&state.base, &referral)
        .await
        .map_err(|err| AppError::downstream("Failed to submit referral", err))?;
    Ok(SubmissionResponse::created(id))
}

pub async fn submit_company_referral(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<SubmissionResponse>> {
    let referral = CompanyReferral::from_payload(&Payload::from_value(&body)?)?;
    let id = submissions::submit_company_referral(&state.base, &referral)
        .await
        .map_err(|err| AppError::downstream("Failed to submit company referral", err))?;
    Ok(SubmissionResponse::created(id))
}

pub async fn submit_resume_pool_entry(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<SubmissionResponse>> {
    let entry = ResumePoolEntry::from_payload(&Payload::from_value(&body)?, Utc::now())?;
    let id = submissions::submit_resume_pool_entry(&state.base, &entry)
        .await
        .map_err(|err| AppError::downstream("Failed to submit to resume pool", err))?;
    Ok(SubmissionResponse::created(id))
}

pub async fn submit_job_application(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<SubmissionResponse>> {
    let application = JobApplication::from_payload(&Payload::from_value(&body)?, Utc::now())?;
    let id = submissions::submit_job_application(&state.base, &application)
        .await
        .map_err(|err| AppError::downstream("Failed to submit application", err))?;
    Ok(SubmissionResponse::created(id))
}

pub async fn submit_candidate_request(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> AppResult<Json<SubmissionResponse>> {
    let request = CandidateRequest::from_payload(&Payload::from_value(&body)?, Utc::now())?;
    let id = submissions::submit_candidate_request(&state.base, &request)
        .await
        .map_err(|err| AppError::downstream("Failed to submit candidate request", err))?;
    Ok(SubmissionResponse::created(id))
}
