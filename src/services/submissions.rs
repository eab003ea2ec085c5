use tracing::info;

use crate::error::StoreError;
use crate::models::{
    CandidateReferral, CandidateRequest, CompanyReferral, JobApplication, ResumePoolEntry,
    Submission,
};
use crate::store::{Base, TableHandle};

/// Writes one record and returns its id. Retries are left to the caller, so a
/// resubmission after a failure can leave a duplicate upstream.
async fn submit<S: Submission>(table: TableHandle<'_>, entity: &S) -> Result<String, StoreError> {
    let record = table.create(entity.to_fields()).await?;
    info!(table = table.name(), record_id = %record.id, "created submission record");
    Ok(record.id)
}

pub async fn submit_candidate_referral(
    base: &Base,
    referral: &CandidateReferral,
) -> Result<String, StoreError> {
    submit(base.candidate_referrals(), referral).await
}

pub async fn submit_company_referral(
    base: &Base,
    referral: &CompanyReferral,
) -> Result<String, StoreError> {
    submit(base.company_referrals(), referral).await
}

pub async fn submit_resume_pool_entry(
    base: &Base,
    entry: &ResumePoolEntry,
) -> Result<String, StoreError> {
    submit(base.resume_pool(), entry).await
}

pub async fn submit_job_application(
    base: &Base,
    application: &JobApplication,
) -> Result<String, StoreError> {
    submit(base.job_applications(), application).await
}

pub async fn submit_candidate_request(
    base: &Base,
    request: &CandidateRequest,
) -> Result<String, StoreError> {
    submit(base.candidate_requests(), request).await
}
