use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use staffing_backend::{
    config::AppConfig,
    services::jobs,
    store::{AirtableStore, Base},
};

const USAGE: &str = "Usage: maintenance list-jobs | maintenance show-job <id>";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        Some("list-jobs") => list_jobs().await?,
        Some("show-job") => match args.next() {
            Some(id) => show_job(&id).await?,
            None => {
                eprintln!("{USAGE}");
                std::process::exit(1);
            }
        },
        Some(cmd) => {
            eprintln!("Unknown command: {cmd}\n{USAGE}");
            std::process::exit(1);
        }
        None => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    }

    Ok(())
}

fn connect() -> Result<Base> {
    let config = AppConfig::from_env()?;
    tracing::info!(
        component = "maintenance",
        airtable_base_id = %config.airtable_base_id,
        airtable_api_key = %config.redacted_api_key(),
        jobs_table = %config.tables.jobs,
        "loaded backend configuration"
    );
    let store = Arc::new(AirtableStore::from_config(&config)?);
    Ok(Base::new(store, config.tables))
}

async fn list_jobs() -> Result<()> {
    let base = connect()?;
    let jobs = jobs::get_all_jobs(&base)
        .await
        .context("failed to load jobs")?;

    if jobs.is_empty() {
        println!("No jobs found.");
        return Ok(());
    }

    for job in &jobs {
        println!(
            "{} | {} | {}",
            job.job_id.as_deref().unwrap_or(&job.id),
            job.title,
            job.company
        );
    }
    println!("{} jobs.", jobs.len());
    Ok(())
}

async fn show_job(id: &str) -> Result<()> {
    let base = connect()?;
    let job = jobs::find_job_by_path_segment(&base, id)
        .await
        .context("failed to load job")?;

    match job {
        Some(job) => println!("{}", serde_json::to_string_pretty(&job)?),
        None => {
            eprintln!("No job matches {id}");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}
