mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{read_json, TestApp};
use serde_json::json;
use staffing_backend::services::jobs;
use staffing_backend::store::Base;

const JOBS: &str = "Jobs";

#[tokio::test]
async fn empty_jobs_table_lists_nothing() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = read_json(app.get("/api/jobs").await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn listed_jobs_default_missing_fields() -> Result<()> {
    let app = TestApp::new();
    let store = app.store();
    store
        .seed(
            JOBS,
            "rec1",
            json!({
                "Job ID": "ENG-001",
                "Job Title": "Backend Engineer",
                "Company": "Acme",
                "Skills": ["Rust", "SQL"]
            }),
        )
        .await;
    store.seed(JOBS, "rec2", json!({ "Company": "Untitled Co" })).await;

    let (status, body) = read_json(app.get("/api/jobs").await?).await?;
    assert_eq!(status, StatusCode::OK);
    let jobs = body.as_array().expect("job list");
    assert_eq!(jobs.len(), 2);

    assert_eq!(jobs[0]["id"], json!("rec1"));
    assert_eq!(jobs[0]["jobId"], json!("ENG-001"));
    assert_eq!(jobs[0]["skills"], json!(["Rust", "SQL"]));

    assert_eq!(jobs[1]["title"], json!(""));
    assert_eq!(jobs[1]["skills"], json!([]));
    assert_eq!(jobs[1]["description"], json!(""));

    let selects = store.selects().await;
    assert_eq!(selects.len(), 1);
    assert_eq!(selects[0].query.filter_by_formula, None);
    Ok(())
}

#[tokio::test]
async fn failing_store_yields_error_envelope() -> Result<()> {
    let app = TestApp::new();
    let store = app.store();
    store.seed(JOBS, "rec1", json!({ "Job Title": "Cached?" })).await;
    store.set_failing(true).await;

    let (status, body) = read_json(app.get("/api/jobs").await?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "error": "Failed to load jobs" }));
    Ok(())
}

#[tokio::test]
async fn get_job_by_id_matches_business_or_record_id() -> Result<()> {
    let app = TestApp::new();
    let store = app.store();
    store
        .seed(JOBS, "recA", json!({ "Job ID": "ENG-001", "Job Title": "First" }))
        .await;
    store
        .seed(JOBS, "recB", json!({ "Job ID": "ENG-002", "Job Title": "Second" }))
        .await;
    let base = Base::new(store.clone(), Default::default());

    let by_business_id = jobs::get_job_by_id(&base, "ENG-002").await?.expect("job");
    assert_eq!(by_business_id.id, "recB");

    let by_record_id = jobs::get_job_by_id(&base, "recA").await?.expect("job");
    assert_eq!(by_record_id.title, "First");

    assert!(jobs::get_job_by_id(&base, "ENG-404").await?.is_none());

    let selects = store.selects().await;
    assert!(selects.iter().all(|call| call.query.max_records == Some(1)));
    assert_eq!(
        selects[0].query.filter_by_formula.as_deref(),
        Some("OR({Job ID} = 'ENG-002', RECORD_ID() = 'ENG-002')")
    );
    Ok(())
}

#[tokio::test]
async fn duplicate_business_ids_return_a_single_job() -> Result<()> {
    let app = TestApp::new();
    let store = app.store();
    store
        .seed(JOBS, "recA", json!({ "Job ID": "DUP", "Job Title": "One" }))
        .await;
    store
        .seed(JOBS, "recB", json!({ "Job ID": "DUP", "Job Title": "Two" }))
        .await;
    let base = Base::new(store.clone(), Default::default());

    let job = jobs::get_job_by_id(&base, "DUP").await?.expect("job");
    assert!(job.id == "recA" || job.id == "recB");
    Ok(())
}

#[tokio::test]
async fn job_detail_falls_back_to_title_slug() -> Result<()> {
    let app = TestApp::new();
    let store = app.store();
    store
        .seed(
            JOBS,
            "recA",
            json!({ "Job ID": "ENG-001", "Job Title": "Senior Rust Engineer" }),
        )
        .await;

    let (status, body) = read_json(app.get("/api/jobs/ENG-001").await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], json!("Senior Rust Engineer"));

    let (status, body) = read_json(app.get("/api/jobs/senior-rust-engineer").await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], json!("recA"));

    let (status, body) =
        read_json(app.get("/api/jobs/senior-rust-engineer-eng-001").await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobId"], json!("ENG-001"));

    let (status, body) = read_json(app.get("/api/jobs/nothing-here").await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "Job not found" }));
    Ok(())
}
