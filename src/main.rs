mod api;
mod config;
mod draft;
mod error;
mod logging;
mod models;
mod tracker;
mod tui;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use api::HttpJobApi;
use config::TrackerConfig;
use draft::FormDraft;
use models::{JobId, JobRecord, JobStats, JobStatus, JobType, Priority, SearchResult};
use tracker::Tracker;

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Track job applications against a job-record API")]
struct Cli {
    /// Base URL of the job-record API (overrides config file and JOBTRACK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tracked job applications
    List,

    /// Search external job postings
    Search {
        /// Job title to search for
        title: String,

        /// Location filter (defaults to United States)
        #[arg(short, long, default_value = "")]
        location: String,
    },

    /// Show application statistics
    Stats,

    /// Add a job application
    Add {
        #[command(flatten)]
        fields: JobFields,
    },

    /// Edit a job application; only the given fields change
    Edit {
        /// Job ID
        id: JobId,

        #[command(flatten)]
        fields: JobFields,
    },

    /// Delete a job application
    Delete {
        /// Job ID
        id: JobId,
    },

    /// Upload a resume for a job
    Upload {
        /// Job ID
        id: JobId,

        /// Path to resume file (PDF or DOCX)
        file: PathBuf,
    },

    /// Score the uploaded resume against a job's description
    Match {
        /// Job ID
        id: JobId,
    },

    /// Estimate average salary for a role
    Salary {
        /// Role to estimate
        query: String,

        /// Location filter (defaults to United States)
        #[arg(short, long, default_value = "")]
        location: String,
    },

    /// Interactive terminal UI
    Ui,
}

#[derive(Args, Default)]
struct JobFields {
    /// Job title
    #[arg(long)]
    title: Option<String>,

    /// Company name
    #[arg(long)]
    company: Option<String>,

    /// Applied, Interview, Rejected, Offer
    #[arg(long)]
    status: Option<JobStatus>,

    /// Full-time, Part-time, Internship
    #[arg(long)]
    job_type: Option<JobType>,

    /// High, Medium, Low
    #[arg(long)]
    priority: Option<Priority>,

    /// Application date (YYYY-MM-DD)
    #[arg(long)]
    applied: Option<String>,

    /// Deadline (YYYY-MM-DD, empty to clear)
    #[arg(long)]
    deadline: Option<String>,

    /// Interview date (YYYY-MM-DD, empty to clear)
    #[arg(long)]
    interview: Option<String>,

    /// Comma separated tags, e.g. "Remote, Hybrid"
    #[arg(long)]
    tags: Option<String>,

    /// Job description
    #[arg(short, long)]
    description: Option<String>,

    /// Posting URL
    #[arg(long)]
    link: Option<String>,
}

impl JobFields {
    fn apply(self, form: &mut FormDraft) {
        if let Some(v) = self.title {
            form.title = v;
        }
        if let Some(v) = self.company {
            form.company = v;
        }
        if let Some(v) = self.status {
            form.status = v;
        }
        if let Some(v) = self.job_type {
            form.job_type = v;
        }
        if let Some(v) = self.priority {
            form.priority = v;
        }
        if let Some(v) = self.applied {
            form.application_date = v;
        }
        if let Some(v) = self.deadline {
            form.deadline = v;
        }
        if let Some(v) = self.interview {
            form.interview_date = v;
        }
        if let Some(v) = self.tags {
            form.tags = v;
        }
        if let Some(v) = self.description {
            form.description = v;
        }
        if let Some(v) = self.link {
            form.job_link = v;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TrackerConfig::load(cli.api_url.as_deref())?;

    if matches!(cli.command, Commands::Ui) {
        logging::init_file(&config.log_level, &TrackerConfig::log_path())?;
    } else {
        logging::init_stderr(&config.log_level);
    }

    let api = HttpJobApi::new(&config.api_url);
    tracing::debug!(api_url = api.base_url(), "using record store");
    let mut tracker = Tracker::new(api);

    match cli.command {
        Commands::Ui => {
            tracing::info!(api_url = %config.api_url, "starting ui");
            return tui::run(HttpJobApi::new(&config.api_url)).await;
        }

        Commands::List => {
            tracker.list_jobs().await?;
            print_jobs(tracker.state().job_list());
        }

        Commands::Search { title, location } => {
            tracker.search_jobs(&title, &location).await?;
            print_results(tracker.state().job_results());
        }

        Commands::Stats => {
            tracker.load_stats().await?;
            print_stats(tracker.state().job_stats());
        }

        Commands::Add { fields } => {
            fields.apply(tracker.state_mut().form_mut()?);
            let ack = tracker.save_draft().await?;
            println!("{}", ack);
        }

        Commands::Edit { id, fields } => {
            tracker.list_jobs().await?;
            let job = tracker
                .state()
                .find_job(id)
                .cloned()
                .ok_or_else(|| anyhow!("Job #{} not found", id))?;
            tracker.begin_edit(&job)?;
            fields.apply(tracker.state_mut().form_mut()?);
            let ack = tracker.save_draft().await?;
            println!("{}", ack);
        }

        Commands::Delete { id } => {
            let ack = tracker.delete_job(id).await?;
            println!("{}", ack);
        }

        Commands::Upload { id, file } => {
            tracker.stage_resume(&file)?;
            let ack = tracker.upload_resume(id).await?;
            println!("{}", ack);
        }

        Commands::Match { id } => {
            let score = tracker.match_resume(id).await?;
            println!("Resume Match Score: {}%", score.match_score);
        }

        Commands::Salary { query, location } => {
            let estimate = tracker.estimate_salary(&query, &location).await?;
            println!("{}", estimate);
        }
    }

    Ok(())
}

fn print_jobs(jobs: &[JobRecord]) {
    if jobs.is_empty() {
        println!("No jobs added yet.");
        return;
    }
    println!(
        "{:<6} {:<10} {:<8} {:<28} {:<20} {:<11} {:<11}",
        "ID", "STATUS", "PRIORITY", "TITLE", "COMPANY", "APPLIED", "DEADLINE"
    );
    println!("{}", "-".repeat(100));
    for job in jobs {
        println!(
            "{:<6} {:<10} {:<8} {:<28} {:<20} {:<11} {:<11}",
            job.id,
            job.status,
            job.priority,
            truncate(&job.title, 26),
            truncate(&job.company, 18),
            job.application_date.to_string(),
            job.deadline.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
        );
        if let Some(date) = job.interview_date {
            println!("{:<6} Interview: {}", "", date);
        }
        let tags = job.display_tags();
        if !tags.is_empty() {
            println!("{:<6} Tags: {}", "", tags.join(", "));
        }
    }
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("No jobs found.");
        return;
    }
    for (i, job) in results.iter().enumerate() {
        println!("{:>3}. {} at {}", i + 1, job.title, job.company);
        println!("     {}", job.location_label());
        if let Some(link) = &job.job_link {
            println!("     Apply on {}: {}", job.source_label(), link);
        }
    }
}

fn print_stats(stats: &JobStats) {
    let bars = stats.bars();
    let max = bars.iter().map(|(_, n)| *n).max().unwrap_or(0).max(1);
    for (label, count) in bars {
        let width = (count * 40 / max) as usize;
        println!("{:<11} {:>4} {}", label, count, "#".repeat(width));
    }
    if let Some(total) = stats.total_jobs {
        println!("{:<11} {:>4}", "Total", total);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
