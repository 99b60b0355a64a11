use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::JobApi;
use crate::draft::{Draft, FormDraft};
use crate::error::{Result, TrackerError};
use crate::models::{
    DEFAULT_LOCATION, JobId, JobPayload, JobRecord, JobStats, MatchScore, ResumeFile,
    SalaryEstimate, SearchResult,
};

/// Position of a read request within its own operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Monotonic token source for one read kind. Responses older than the last
/// applied one are dropped.
#[derive(Debug, Default)]
struct Sequencer {
    issued: u64,
    applied: u64,
}

impl Sequencer {
    fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    fn accept(&mut self, ticket: Ticket) -> bool {
        if ticket.0 > self.applied {
            self.applied = ticket.0;
            true
        } else {
            false
        }
    }
}

/// An outbound call, fully resolved from state at the moment it was issued.
#[derive(Debug, Clone)]
pub enum Request {
    ListJobs(Ticket),
    SearchJobs {
        ticket: Ticket,
        query: String,
        location: String,
        location_defaulted: bool,
    },
    LoadStats(Ticket),
    Save {
        target: Option<JobId>,
        payload: JobPayload,
    },
    Delete(JobId),
    UploadResume {
        id: JobId,
        file: ResumeFile,
    },
    MatchResume(JobId),
    SalaryEstimate {
        query: String,
        location: String,
    },
}

/// A response paired with what is needed to reconcile it.
#[derive(Debug)]
pub enum Completion {
    Jobs(Ticket, Result<Vec<JobRecord>>),
    Search {
        ticket: Ticket,
        location_defaulted: bool,
        result: Result<Vec<SearchResult>>,
    },
    Stats(Ticket, Result<JobStats>),
    Saved {
        target: Option<JobId>,
        result: Result<String>,
    },
    Deleted {
        id: JobId,
        result: Result<String>,
    },
    Uploaded {
        id: JobId,
        result: Result<String>,
    },
    Matched {
        id: JobId,
        result: Result<MatchScore>,
    },
    Salary(Result<SalaryEstimate>),
}

/// What applying a successful completion did.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Replaced,
    /// A newer response of the same kind was already applied.
    Discarded,
    /// A write went through; the job list needs a resync.
    Written(String),
    Matched(JobId, MatchScore),
    Salary(SalaryEstimate),
}

/// Issues `request` against the store. Never touches tracker state, so it can
/// run on a spawned task.
pub async fn execute<A: JobApi + ?Sized>(api: &A, request: Request) -> Completion {
    match request {
        Request::ListJobs(ticket) => Completion::Jobs(ticket, api.list_jobs().await),
        Request::SearchJobs {
            ticket,
            query,
            location,
            location_defaulted,
        } => Completion::Search {
            ticket,
            location_defaulted,
            result: api.search_jobs(&query, &location).await,
        },
        Request::LoadStats(ticket) => Completion::Stats(ticket, api.job_stats().await),
        Request::Save { target, payload } => {
            let result = match target {
                Some(id) => api.update_job(id, &payload).await,
                None => api.create_job(&payload).await,
            };
            Completion::Saved { target, result }
        }
        Request::Delete(id) => Completion::Deleted {
            id,
            result: api.delete_job(id).await,
        },
        Request::UploadResume { id, file } => Completion::Uploaded {
            id,
            result: api.upload_resume(id, &file).await,
        },
        Request::MatchResume(id) => Completion::Matched {
            id,
            result: api.match_resume(id).await,
        },
        Request::SalaryEstimate { query, location } => {
            Completion::Salary(api.salary_estimate(&query, &location).await)
        }
    }
}

fn effective_location(location: &str) -> (String, bool) {
    if location.is_empty() {
        (DEFAULT_LOCATION.to_string(), true)
    } else {
        (location.to_string(), false)
    }
}

/// Logs a failure at the operation boundary and hands it back to the caller.
fn surface(err: TrackerError) -> TrackerError {
    match &err {
        TrackerError::RequestFailed {
            operation,
            status,
            detail,
        } => error!(operation, status = ?status, detail = %detail, "request failed"),
        local => warn!(error = %local, "operation rejected locally"),
    }
    err
}

/// All client-side state. Mutated only through the operations below.
#[derive(Debug, Default)]
pub struct TrackerState {
    job_list: Vec<JobRecord>,
    job_results: Vec<SearchResult>,
    job_stats: JobStats,
    draft: Draft,
    pending_upload: Option<ResumeFile>,
    save_in_flight: bool,
    list_seq: Sequencer,
    search_seq: Sequencer,
    stats_seq: Sequencer,
}

impl TrackerState {
    pub fn job_list(&self) -> &[JobRecord] {
        &self.job_list
    }

    pub fn job_results(&self) -> &[SearchResult] {
        &self.job_results
    }

    pub fn job_stats(&self) -> &JobStats {
        &self.job_stats
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn pending_upload(&self) -> Option<&ResumeFile> {
        self.pending_upload.as_ref()
    }

    pub fn is_saving(&self) -> bool {
        self.save_in_flight
    }

    pub fn find_job(&self, id: JobId) -> Option<&JobRecord> {
        self.job_list.iter().find(|j| j.id == id)
    }

    // --- Request construction ---

    pub fn begin_list(&mut self) -> Request {
        Request::ListJobs(self.list_seq.issue())
    }

    pub fn begin_search(&mut self, title: &str, location: &str) -> Request {
        let (location, location_defaulted) = effective_location(location);
        Request::SearchJobs {
            ticket: self.search_seq.issue(),
            query: title.to_string(),
            location,
            location_defaulted,
        }
    }

    pub fn begin_stats(&mut self) -> Request {
        Request::LoadStats(self.stats_seq.issue())
    }

    /// Freezes the draft into a create or update request. Only one save may be in flight.
    pub fn begin_save(&mut self) -> Result<Request> {
        if self.save_in_flight {
            return Err(surface(TrackerError::SaveInProgress));
        }
        let payload = self.draft.fields.to_payload().map_err(surface)?;
        self.save_in_flight = true;
        Ok(Request::Save {
            target: self.draft.target(),
            payload,
        })
    }

    pub fn begin_delete(&self, id: JobId) -> Request {
        Request::Delete(id)
    }

    pub fn begin_upload(&self, id: JobId) -> Result<Request> {
        let file = self
            .pending_upload
            .clone()
            .ok_or_else(|| surface(TrackerError::NoFileStaged))?;
        Ok(Request::UploadResume { id, file })
    }

    pub fn begin_match(&self, id: JobId) -> Request {
        Request::MatchResume(id)
    }

    pub fn begin_salary(&self, query: &str, location: &str) -> Request {
        let (location, _) = effective_location(location);
        Request::SalaryEstimate {
            query: query.to_string(),
            location,
        }
    }

    // --- Draft operations ---

    /// Binds the form to `record`, silently dropping any unsaved input.
    pub fn begin_edit(&mut self, record: &JobRecord) -> Result<()> {
        self.ensure_not_saving()?;
        self.draft = Draft::editing(record);
        Ok(())
    }

    pub fn begin_from_search(&mut self, result: &SearchResult) -> Result<()> {
        self.ensure_not_saving()?;
        self.draft = Draft {
            fields: FormDraft::from_search(result),
            ..Draft::default()
        };
        Ok(())
    }

    pub fn clear_form(&mut self) -> Result<()> {
        self.ensure_not_saving()?;
        self.reset_form();
        Ok(())
    }

    /// Field access for typing into the form. Locked while a save is in flight.
    pub fn form_mut(&mut self) -> Result<&mut FormDraft> {
        self.ensure_not_saving()?;
        Ok(&mut self.draft.fields)
    }

    pub fn stage_resume(&mut self, file: ResumeFile) {
        info!(file = %file.file_name, bytes = file.bytes.len(), "resume staged");
        self.pending_upload = Some(file);
    }

    fn ensure_not_saving(&self) -> Result<()> {
        if self.save_in_flight {
            Err(surface(TrackerError::SaveInProgress))
        } else {
            Ok(())
        }
    }

    fn reset_form(&mut self) {
        self.draft = Draft::default();
        self.pending_upload = None;
    }

    // --- Reconciliation ---

    /// Folds a response back into state. Failures leave state as it was.
    pub fn apply(&mut self, completion: Completion) -> Result<Applied> {
        match completion {
            Completion::Jobs(ticket, result) => {
                let jobs = result.map_err(surface)?;
                if !self.list_seq.accept(ticket) {
                    warn!(?ticket, "discarding stale job list");
                    return Ok(Applied::Discarded);
                }
                info!(count = jobs.len(), "job list replaced");
                self.job_list = jobs;
                Ok(Applied::Replaced)
            }
            Completion::Search {
                ticket,
                location_defaulted,
                result,
            } => {
                let mut results = result.map_err(surface)?;
                if !self.search_seq.accept(ticket) {
                    warn!(?ticket, "discarding stale search results");
                    return Ok(Applied::Discarded);
                }
                if location_defaulted {
                    for hit in results.iter_mut().filter(|r| r.location.is_none()) {
                        hit.location = Some(DEFAULT_LOCATION.to_string());
                    }
                }
                info!(count = results.len(), "search results replaced");
                self.job_results = results;
                Ok(Applied::Replaced)
            }
            Completion::Stats(ticket, result) => {
                let stats = result.map_err(surface)?;
                if !self.stats_seq.accept(ticket) {
                    warn!(?ticket, "discarding stale stats");
                    return Ok(Applied::Discarded);
                }
                self.job_stats = stats;
                Ok(Applied::Replaced)
            }
            Completion::Saved { target, result } => {
                self.save_in_flight = false;
                let ack = result.map_err(surface)?;
                info!(job = ?target, "job saved");
                self.reset_form();
                Ok(Applied::Written(ack))
            }
            Completion::Deleted { id, result } => {
                let ack = result.map_err(surface)?;
                info!(%id, "job deleted");
                Ok(Applied::Written(ack))
            }
            Completion::Uploaded { id, result } => {
                let ack = result.map_err(surface)?;
                info!(%id, "resume uploaded");
                Ok(Applied::Written(ack))
            }
            Completion::Matched { id, result } => {
                let score = result.map_err(surface)?;
                Ok(Applied::Matched(id, score))
            }
            Completion::Salary(result) => Ok(Applied::Salary(result.map_err(surface)?)),
        }
    }
}

/// Reads a resume from disk for staging.
pub fn load_resume(path: &Path) -> Result<ResumeFile> {
    let bytes = std::fs::read(path)
        .map_err(|source| TrackerError::ResumeRead {
            path: path.to_path_buf(),
            source,
        })
        .map_err(surface)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());
    Ok(ResumeFile { file_name, bytes })
}

/// State plus the store it synchronizes with. Each operation runs to
/// completion before returning.
pub struct Tracker<A: JobApi> {
    api: Arc<A>,
    state: TrackerState,
}

impl<A: JobApi> Tracker<A> {
    pub fn new(api: A) -> Self {
        Self {
            api: Arc::new(api),
            state: TrackerState::default(),
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut TrackerState {
        &mut self.state
    }

    async fn run(&mut self, request: Request) -> Result<Applied> {
        let completion = execute(self.api.as_ref(), request).await;
        self.state.apply(completion)
    }

    /// Runs a write and, once acknowledged, refetches the job list. The
    /// write's outcome is returned even if the refetch fails; that failure is
    /// logged and the cached list stays as it was.
    async fn run_write(&mut self, request: Request) -> Result<String> {
        let ack = match self.run(request).await? {
            Applied::Written(ack) => ack,
            _ => String::new(),
        };
        if let Err(err) = self.list_jobs().await {
            warn!(error = %err, "write accepted but job list refresh failed");
        }
        Ok(ack)
    }

    pub async fn list_jobs(&mut self) -> Result<()> {
        let request = self.state.begin_list();
        self.run(request).await.map(|_| ())
    }

    pub async fn search_jobs(&mut self, title: &str, location: &str) -> Result<()> {
        let request = self.state.begin_search(title, location);
        self.run(request).await.map(|_| ())
    }

    pub async fn load_stats(&mut self) -> Result<()> {
        let request = self.state.begin_stats();
        self.run(request).await.map(|_| ())
    }

    pub async fn save_draft(&mut self) -> Result<String> {
        let request = self.state.begin_save()?;
        self.run_write(request).await
    }

    pub async fn delete_job(&mut self, id: JobId) -> Result<String> {
        let request = self.state.begin_delete(id);
        self.run_write(request).await
    }

    pub async fn upload_resume(&mut self, id: JobId) -> Result<String> {
        let request = self.state.begin_upload(id)?;
        self.run_write(request).await
    }

    pub async fn match_resume(&mut self, id: JobId) -> Result<MatchScore> {
        let score = self.api.match_resume(id).await.map_err(surface)?;
        info!(%id, score = score.match_score, "resume matched");
        Ok(score)
    }

    pub async fn estimate_salary(&mut self, query: &str, location: &str) -> Result<SalaryEstimate> {
        let (location, _) = effective_location(location);
        self.api
            .salary_estimate(query, &location)
            .await
            .map_err(surface)
    }

    pub fn begin_edit(&mut self, record: &JobRecord) -> Result<()> {
        self.state.begin_edit(record)
    }

    pub fn stage_resume(&mut self, path: &Path) -> Result<()> {
        let file = load_resume(path)?;
        self.state.stage_resume(file);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftMode;
    use crate::models::{JobStatus, JobType, Priority};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use std::io::Write;
    use std::sync::Mutex;

    /// In-memory record store that logs every call it receives.
    #[derive(Default)]
    struct MemoryApi {
        jobs: Mutex<Vec<JobRecord>>,
        next_id: Mutex<i64>,
        calls: Mutex<Vec<String>>,
        failing: Mutex<HashSet<&'static str>>,
        stats: JobStats,
    }

    impl MemoryApi {
        fn with_jobs(jobs: Vec<JobRecord>) -> Self {
            let next = jobs.iter().map(|j| j.id.0).max().unwrap_or(0);
            Self {
                jobs: Mutex::new(jobs),
                next_id: Mutex::new(next),
                ..Self::default()
            }
        }

        fn fail(&self, operation: &'static str) {
            self.failing.lock().unwrap().insert(operation);
        }

        fn record(&self, operation: &'static str, call: String) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if self.failing.lock().unwrap().contains(operation) {
                return Err(TrackerError::request(operation, Some(500), "boom"));
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn to_record(id: JobId, payload: &JobPayload, resume_ref: Option<String>) -> JobRecord {
            JobRecord {
                id,
                title: payload.title.clone(),
                company: payload.company.clone(),
                status: payload.status,
                job_type: payload.job_type,
                priority: payload.priority,
                application_date: payload.application_date,
                deadline: payload.deadline,
                description: Some(payload.description.clone()),
                tags: payload.tags.clone(),
                interview_date: payload.interview_date,
                resume_ref,
                job_link: payload.job_link.clone(),
            }
        }
    }

    #[async_trait]
    impl JobApi for MemoryApi {
        async fn list_jobs(&self) -> Result<Vec<JobRecord>> {
            self.record("List jobs", "list".to_string())?;
            Ok(self.jobs.lock().unwrap().clone())
        }

        async fn search_jobs(&self, query: &str, location: &str) -> Result<Vec<SearchResult>> {
            self.record("Search jobs", format!("search {}|{}", query, location))?;
            Ok(vec![SearchResult {
                title: query.to_string(),
                company: "Initech".to_string(),
                ..SearchResult::default()
            }])
        }

        async fn job_stats(&self) -> Result<JobStats> {
            self.record("Job stats", "stats".to_string())?;
            Ok(self.stats)
        }

        async fn create_job(&self, payload: &JobPayload) -> Result<String> {
            self.record("Create job", "create".to_string())?;
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            let record = Self::to_record(JobId(*next), payload, None);
            self.jobs.lock().unwrap().push(record);
            Ok("Job added successfully!".to_string())
        }

        async fn update_job(&self, id: JobId, payload: &JobPayload) -> Result<String> {
            self.record("Update job", format!("update {}", id))?;
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs
                .iter_mut()
                .find(|j| j.id == id)
                .ok_or_else(|| TrackerError::request("Update job", Some(404), "Job not found"))?;
            *job = Self::to_record(id, payload, job.resume_ref.clone());
            Ok("Job updated successfully!".to_string())
        }

        async fn delete_job(&self, id: JobId) -> Result<String> {
            self.record("Delete job", format!("delete {}", id))?;
            self.jobs.lock().unwrap().retain(|j| j.id != id);
            Ok("Job deleted successfully!".to_string())
        }

        async fn upload_resume(&self, id: JobId, file: &ResumeFile) -> Result<String> {
            self.record("Upload resume", format!("upload {} {}", id, file.file_name))?;
            if let Some(job) = self.jobs.lock().unwrap().iter_mut().find(|j| j.id == id) {
                job.resume_ref = Some(format!("uploads/resume_{}.pdf", id));
            }
            Ok("Resume uploaded successfully!".to_string())
        }

        async fn match_resume(&self, id: JobId) -> Result<MatchScore> {
            self.record("Match resume", format!("match {}", id))?;
            let jobs = self.jobs.lock().unwrap();
            match jobs.iter().find(|j| j.id == id) {
                Some(job) if job.resume_ref.is_some() => Ok(MatchScore { match_score: 62.5 }),
                _ => Err(TrackerError::request("Match resume", Some(404), "Job or Resume not found")),
            }
        }

        async fn salary_estimate(&self, query: &str, location: &str) -> Result<SalaryEstimate> {
            self.record("Salary estimate", format!("salary {}|{}", query, location))?;
            Ok(SalaryEstimate::Average { average_salary: 100000.0 })
        }
    }

    fn record(id: i64, title: &str) -> JobRecord {
        JobRecord {
            id: JobId(id),
            title: title.to_string(),
            company: "Acme".to_string(),
            status: JobStatus::Interview,
            job_type: JobType::PartTime,
            priority: Priority::High,
            application_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            deadline: NaiveDate::from_ymd_opt(2024, 4, 30),
            description: Some("Build things".to_string()),
            tags: vec!["Remote".to_string(), "Hybrid".to_string()],
            interview_date: None,
            resume_ref: None,
            job_link: None,
        }
    }

    fn fill_new(tracker: &mut Tracker<MemoryApi>) {
        let form = tracker.state_mut().form_mut().unwrap();
        form.title = "Platform Engineer".to_string();
        form.company = "Hooli".to_string();
        form.application_date = "2024-06-10".to_string();
        form.tags = "Remote, Hybrid,  On-site".to_string();
    }

    #[tokio::test]
    async fn test_create_then_list_adds_one_record() {
        let mut tracker = Tracker::new(MemoryApi::with_jobs(vec![record(1, "Existing")]));
        tracker.list_jobs().await.unwrap();
        assert_eq!(tracker.state().job_list().len(), 1);

        fill_new(&mut tracker);
        let ack = tracker.save_draft().await.unwrap();
        assert_eq!(ack, "Job added successfully!");

        let jobs = tracker.state().job_list();
        assert_eq!(jobs.len(), 2);
        let added = jobs.iter().find(|j| j.title == "Platform Engineer").unwrap();
        assert_eq!(added.company, "Hooli");
        assert_eq!(added.tags, vec!["Remote", "Hybrid", "On-site"]);
        assert_eq!(added.deadline, None);
        assert_eq!(added.status, JobStatus::Applied);

        assert_eq!(tracker.state().draft(), &Draft::default());
        assert_eq!(tracker.api.calls(), vec!["list", "create", "list"]);
    }

    #[tokio::test]
    async fn test_unchanged_edit_leaves_record_unchanged() {
        let original = record(3, "Data Engineer");
        let mut tracker = Tracker::new(MemoryApi::with_jobs(vec![original.clone()]));
        tracker.list_jobs().await.unwrap();

        let target = tracker.state().job_list()[0].clone();
        tracker.begin_edit(&target).unwrap();
        assert_eq!(tracker.state().draft().mode, DraftMode::Editing(JobId(3)));

        tracker.save_draft().await.unwrap();
        assert_eq!(tracker.state().find_job(JobId(3)), Some(&original));
        assert_eq!(tracker.api.calls(), vec!["list", "update 3", "list"]);
        assert_eq!(tracker.state().draft().mode, DraftMode::Create);
    }

    #[tokio::test]
    async fn test_search_location_defaulting() {
        let mut tracker = Tracker::new(MemoryApi::default());
        tracker.search_jobs("rust", "").await.unwrap();
        tracker.search_jobs("rust", "Remote").await.unwrap();
        assert_eq!(
            tracker.api.calls(),
            vec!["search rust|United States", "search rust|Remote"]
        );
        assert!(tracker.state().job_list().is_empty());
    }

    #[tokio::test]
    async fn test_defaulted_search_fills_missing_location() {
        let mut tracker = Tracker::new(MemoryApi::default());
        tracker.search_jobs("rust", "").await.unwrap();
        assert_eq!(
            tracker.state().job_results()[0].location.as_deref(),
            Some("United States")
        );

        tracker.search_jobs("rust", "Berlin").await.unwrap();
        assert_eq!(tracker.state().job_results()[0].location, None);
    }

    #[tokio::test]
    async fn test_failed_search_keeps_previous_results() {
        let mut tracker = Tracker::new(MemoryApi::default());
        tracker.search_jobs("rust", "").await.unwrap();
        let before = tracker.state().job_results().to_vec();

        tracker.api.fail("Search jobs");
        assert!(tracker.search_jobs("go", "").await.is_err());
        assert_eq!(tracker.state().job_results(), before.as_slice());
    }

    #[tokio::test]
    async fn test_upload_without_staged_file_sends_nothing() {
        let mut tracker = Tracker::new(MemoryApi::with_jobs(vec![record(1, "A")]));
        let err = tracker.upload_resume(JobId(1)).await.unwrap_err();
        assert!(matches!(err, TrackerError::NoFileStaged));
        assert!(tracker.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_staged_file_then_match() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4 resume").unwrap();

        let mut tracker = Tracker::new(MemoryApi::with_jobs(vec![record(1, "A")]));
        tracker.stage_resume(file.path()).unwrap();
        let staged = tracker.state().pending_upload().unwrap().clone();
        assert_eq!(staged.bytes, b"%PDF-1.4 resume");

        tracker.upload_resume(JobId(1)).await.unwrap();
        assert_eq!(
            tracker.state().find_job(JobId(1)).unwrap().resume_ref.as_deref(),
            Some("uploads/resume_1.pdf")
        );
        assert_eq!(tracker.state().pending_upload(), Some(&staged));

        let before = tracker.state().job_list().to_vec();
        let score = tracker.match_resume(JobId(1)).await.unwrap();
        assert_eq!(score.match_score, 62.5);
        assert_eq!(tracker.state().job_list(), before.as_slice());
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_staged_file() {
        let mut tracker = Tracker::new(MemoryApi::with_jobs(vec![record(1, "A")]));
        tracker.state_mut().stage_resume(ResumeFile {
            file_name: "cv.pdf".to_string(),
            bytes: vec![1, 2, 3],
        });
        tracker.api.fail("Upload resume");

        assert!(tracker.upload_resume(JobId(1)).await.is_err());
        assert_eq!(tracker.state().pending_upload().unwrap().file_name, "cv.pdf");
        assert_eq!(tracker.api.calls(), vec!["upload 1 cv.pdf"]);
    }

    #[tokio::test]
    async fn test_match_without_resume_is_surfaced() {
        let mut tracker = Tracker::new(MemoryApi::with_jobs(vec![record(1, "A")]));
        let err = tracker.match_resume(JobId(1)).await.unwrap_err();
        assert!(matches!(err, TrackerError::RequestFailed { status: Some(404), .. }));
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_list_identical() {
        let mut tracker = Tracker::new(MemoryApi::with_jobs(vec![record(1, "A"), record(2, "B")]));
        tracker.list_jobs().await.unwrap();
        let before = tracker.state().job_list().to_vec();

        tracker.api.fail("Delete job");
        let err = tracker.delete_job(JobId(1)).await.unwrap_err();
        assert!(matches!(err, TrackerError::RequestFailed { .. }));
        assert_eq!(tracker.state().job_list(), before.as_slice());
        assert_eq!(tracker.api.calls(), vec!["list", "delete 1"]);
    }

    #[tokio::test]
    async fn test_delete_under_edit_keeps_draft() {
        let mut tracker = Tracker::new(MemoryApi::with_jobs(vec![record(1, "A")]));
        tracker.list_jobs().await.unwrap();
        let target = tracker.state().job_list()[0].clone();
        tracker.begin_edit(&target).unwrap();

        tracker.delete_job(JobId(1)).await.unwrap();
        assert!(tracker.state().job_list().is_empty());
        assert_eq!(tracker.state().draft().mode, DraftMode::Editing(JobId(1)));
    }

    #[tokio::test]
    async fn test_accepted_write_survives_failed_refresh() {
        let mut tracker = Tracker::new(MemoryApi::with_jobs(vec![record(1, "Existing")]));
        tracker.list_jobs().await.unwrap();
        let before = tracker.state().job_list().to_vec();

        tracker.api.fail("List jobs");
        fill_new(&mut tracker);
        let ack = tracker.save_draft().await.unwrap();
        assert_eq!(ack, "Job added successfully!");
        assert_eq!(tracker.api.calls(), vec!["list", "create", "list"]);
        assert_eq!(tracker.api.jobs.lock().unwrap().len(), 2);
        assert_eq!(tracker.state().job_list(), before.as_slice());
        assert_eq!(tracker.state().draft(), &Draft::default());

        let ack = tracker.delete_job(JobId(1)).await.unwrap();
        assert_eq!(ack, "Job deleted successfully!");
        assert_eq!(tracker.api.jobs.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_list_keeps_previous_jobs() {
        let mut tracker = Tracker::new(MemoryApi::with_jobs(vec![record(1, "A"), record(2, "B")]));
        tracker.list_jobs().await.unwrap();
        let before = tracker.state().job_list().to_vec();

        tracker.api.fail("List jobs");
        let err = tracker.list_jobs().await.unwrap_err();
        assert!(matches!(err, TrackerError::RequestFailed { status: Some(500), .. }));
        assert_eq!(tracker.state().job_list(), before.as_slice());
    }

    #[tokio::test]
    async fn test_failed_stats_keeps_previous_stats() {
        let stats = JobStats {
            applied: 3,
            interviews: 1,
            rejected: 1,
            offers: 0,
            total_jobs: Some(5),
        };
        let api = MemoryApi {
            stats,
            ..MemoryApi::default()
        };
        let mut tracker = Tracker::new(api);
        tracker.load_stats().await.unwrap();

        tracker.api.fail("Job stats");
        assert!(tracker.load_stats().await.is_err());
        assert_eq!(tracker.state().job_stats(), &stats);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_draft() {
        let mut tracker = Tracker::new(MemoryApi::default());
        fill_new(&mut tracker);
        let before = tracker.state().draft().clone();

        tracker.api.fail("Create job");
        assert!(tracker.save_draft().await.is_err());
        assert_eq!(tracker.state().draft(), &before);
        assert!(!tracker.state().is_saving());
        assert_eq!(tracker.api.calls(), vec!["create"]);
    }

    #[tokio::test]
    async fn test_invalid_draft_sends_nothing() {
        let mut tracker = Tracker::new(MemoryApi::default());
        tracker.state_mut().form_mut().unwrap().title = "No company".to_string();
        let err = tracker.save_draft().await.unwrap_err();
        assert!(matches!(err, TrackerError::MissingField("Company")));
        assert!(!tracker.state().is_saving());
        assert!(tracker.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_stats_come_from_server_only() {
        let api = MemoryApi {
            stats: JobStats {
                applied: 9,
                interviews: 4,
                rejected: 2,
                offers: 1,
                total_jobs: Some(16),
            },
            ..MemoryApi::with_jobs(vec![record(1, "A")])
        };
        let mut tracker = Tracker::new(api);
        tracker.list_jobs().await.unwrap();
        tracker.load_stats().await.unwrap();
        assert_eq!(tracker.state().job_stats().applied, 9);
        assert_eq!(tracker.state().job_stats().total_jobs, Some(16));
    }

    #[tokio::test]
    async fn test_salary_estimate_defaults_location() {
        let mut tracker = Tracker::new(MemoryApi::default());
        let estimate = tracker.estimate_salary("Rust Engineer", "").await.unwrap();
        assert_eq!(estimate, SalaryEstimate::Average { average_salary: 100000.0 });
        assert_eq!(tracker.api.calls(), vec!["salary Rust Engineer|United States"]);
    }

    #[test]
    fn test_stale_list_response_is_discarded() {
        let mut state = TrackerState::default();
        let first = state.begin_list();
        let second = state.begin_list();
        let (Request::ListJobs(t1), Request::ListJobs(t2)) = (first, second) else {
            panic!("expected list requests");
        };

        let fresh = vec![record(1, "Fresh")];
        assert_eq!(
            state.apply(Completion::Jobs(t2, Ok(fresh.clone()))).unwrap(),
            Applied::Replaced
        );
        assert_eq!(
            state.apply(Completion::Jobs(t1, Ok(vec![record(1, "Stale")]))).unwrap(),
            Applied::Discarded
        );
        assert_eq!(state.job_list(), fresh.as_slice());
    }

    #[test]
    fn test_stale_search_response_is_discarded() {
        let mut state = TrackerState::default();
        let first = state.begin_search("rust", "");
        let second = state.begin_search("go", "Berlin");
        let (
            Request::SearchJobs { ticket: t1, .. },
            Request::SearchJobs { ticket: t2, .. },
        ) = (first, second)
        else {
            panic!("expected search requests");
        };

        let fresh = vec![SearchResult {
            title: "Go Dev".to_string(),
            ..SearchResult::default()
        }];
        let newer = Completion::Search {
            ticket: t2,
            location_defaulted: false,
            result: Ok(fresh.clone()),
        };
        assert_eq!(state.apply(newer).unwrap(), Applied::Replaced);

        let older = Completion::Search {
            ticket: t1,
            location_defaulted: true,
            result: Ok(vec![SearchResult::default()]),
        };
        assert_eq!(state.apply(older).unwrap(), Applied::Discarded);
        assert_eq!(state.job_results(), fresh.as_slice());
    }

    #[test]
    fn test_stale_stats_response_is_discarded() {
        let mut state = TrackerState::default();
        let (Request::LoadStats(t1), Request::LoadStats(t2)) = (state.begin_stats(), state.begin_stats())
        else {
            panic!("expected stats requests");
        };

        let fresh = JobStats {
            applied: 4,
            ..JobStats::default()
        };
        assert_eq!(state.apply(Completion::Stats(t2, Ok(fresh))).unwrap(), Applied::Replaced);
        let stale = JobStats {
            applied: 1,
            ..JobStats::default()
        };
        assert_eq!(state.apply(Completion::Stats(t1, Ok(stale))).unwrap(), Applied::Discarded);
        assert_eq!(state.job_stats(), &fresh);
    }

    #[test]
    fn test_save_in_flight_locks_draft() {
        let mut state = TrackerState::default();
        state.begin_edit(&record(5, "Locked")).unwrap();

        let request = state.begin_save().unwrap();
        assert!(matches!(request, Request::Save { target: Some(JobId(5)), .. }));
        assert!(state.is_saving());

        assert!(matches!(state.begin_save(), Err(TrackerError::SaveInProgress)));
        assert!(matches!(state.begin_edit(&record(6, "Other")), Err(TrackerError::SaveInProgress)));
        assert!(matches!(state.clear_form(), Err(TrackerError::SaveInProgress)));
        assert!(state.form_mut().is_err());
        assert_eq!(state.draft().target(), Some(JobId(5)));

        let applied = state
            .apply(Completion::Saved {
                target: Some(JobId(5)),
                result: Ok("ok".to_string()),
            })
            .unwrap();
        assert_eq!(applied, Applied::Written("ok".to_string()));
        assert!(!state.is_saving());
        assert_eq!(state.draft().mode, DraftMode::Create);
    }

    #[test]
    fn test_begin_edit_discards_unsaved_input() {
        let mut state = TrackerState::default();
        state.form_mut().unwrap().title = "half typed".to_string();
        state.begin_edit(&record(2, "Target")).unwrap();
        assert_eq!(state.draft().fields.title, "Target");
        assert_eq!(state.draft().fields.tags, "Remote, Hybrid");
    }

    #[test]
    fn test_begin_from_search_is_create_mode() {
        let mut state = TrackerState::default();
        state.begin_edit(&record(2, "Target")).unwrap();
        let hit = SearchResult {
            title: "Compiler Engineer".to_string(),
            company: "Oxide".to_string(),
            job_link: Some("https://jobs.example/42".to_string()),
            ..SearchResult::default()
        };
        state.begin_from_search(&hit).unwrap();
        assert_eq!(state.draft().mode, DraftMode::Create);
        assert_eq!(state.draft().fields.company, "Oxide");
        assert_eq!(state.draft().fields.job_link, "https://jobs.example/42");
    }

    #[test]
    fn test_clear_form_drops_staged_resume() {
        let mut state = TrackerState::default();
        state.stage_resume(ResumeFile {
            file_name: "cv.pdf".to_string(),
            bytes: vec![],
        });
        state.clear_form().unwrap();
        assert!(state.pending_upload().is_none());
    }

    #[test]
    fn test_load_resume_missing_file() {
        let err = load_resume(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, TrackerError::ResumeRead { .. }));
    }
}
