use tracing::debug;

use crate::error::StoreError;
use crate::models::Job;
use crate::store::{formula_string, Base, SelectQuery};

pub async fn get_all_jobs(base: &Base) -> Result<Vec<Job>, StoreError> {
    let records = base.jobs().select_all().await?;
    debug!(count = records.len(), "loaded jobs");
    Ok(records.iter().map(Job::from_record).collect())
}

pub async fn get_job_by_id(base: &Base, id: &str) -> Result<Option<Job>, StoreError> {
    let id = id.trim();
    if id.is_empty() {
        return Ok(None);
    }
    let literal = formula_string(id);
    let formula = format!("OR({{{}}} = {literal}, RECORD_ID() = {literal})", Job::JOB_ID);
    let records = base
        .jobs()
        .select(&SelectQuery::filtered(formula).max_records(1))
        .await?;
    Ok(records.first().map(Job::from_record))
}

/// Resolves a job-detail path segment: exact id lookup first, then a title slug over all jobs.
pub async fn find_job_by_path_segment(
    base: &Base,
    segment: &str,
) -> Result<Option<Job>, StoreError> {
    if let Some(job) = get_job_by_id(base, segment).await? {
        return Ok(Some(job));
    }
    debug!(segment, "no job with that id; trying title slugs");
    let jobs = get_all_jobs(base).await?;
    Ok(jobs.into_iter().find(|job| job.matches_slug(segment)))
}
