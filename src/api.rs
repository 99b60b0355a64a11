use async_trait::async_trait;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::models::{
    JobId, JobPayload, JobRecord, JobStats, MatchScore, ResumeFile, SalaryEstimate, SearchResponse,
    SearchResult,
};

// --- Record store trait ---

/// The remote job-record store, as consumed by the tracker.
#[async_trait]
pub trait JobApi: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<JobRecord>>;
    async fn search_jobs(&self, query: &str, location: &str) -> Result<Vec<SearchResult>>;
    async fn job_stats(&self) -> Result<JobStats>;
    async fn create_job(&self, payload: &JobPayload) -> Result<String>;
    async fn update_job(&self, id: JobId, payload: &JobPayload) -> Result<String>;
    async fn delete_job(&self, id: JobId) -> Result<String>;
    async fn upload_resume(&self, id: JobId, file: &ResumeFile) -> Result<String>;
    async fn match_resume(&self, id: JobId) -> Result<MatchScore>;
    async fn salary_estimate(&self, query: &str, location: &str) -> Result<SalaryEstimate>;
}

// --- HTTP implementation ---

/// `{"message": ...}` / `{"error": ...}` bodies the store answers with.
#[derive(Debug, Default, Deserialize)]
struct StatusBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpJobApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpJobApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| TrackerError::request(operation, None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::request(
                operation,
                Some(status.as_u16()),
                error_detail(&body, status.canonical_reason().unwrap_or("request failed")),
            ));
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = self.send(operation, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| TrackerError::request(operation, None, format!("invalid response: {}", e)))
    }

    /// Sends a write and returns the store's acknowledgement text.
    async fn ack(&self, operation: &'static str, request: reqwest::RequestBuilder) -> Result<String> {
        let response = self.send(operation, request).await?;
        let body = response.text().await.unwrap_or_default();
        let parsed: StatusBody = serde_json::from_str(&body).unwrap_or_default();
        Ok(parsed.message.unwrap_or(body))
    }
}

/// Picks the most useful failure text: the JSON error payload, then the raw body, then `fallback`.
fn error_detail(body: &str, fallback: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<StatusBody>(body) {
        if let Some(msg) = parsed.error.or(parsed.message) {
            return msg;
        }
    }
    let body = body.trim();
    if body.is_empty() {
        fallback.to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl JobApi for HttpJobApi {
    async fn list_jobs(&self) -> Result<Vec<JobRecord>> {
        debug!("GET /jobs");
        self.get_json("List jobs", self.client.get(self.url("/jobs")))
            .await
    }

    async fn search_jobs(&self, query: &str, location: &str) -> Result<Vec<SearchResult>> {
        debug!(query, location, "GET /search-jobs");
        let request = self
            .client
            .get(self.url("/search-jobs"))
            .query(&[("query", query), ("location", location)]);
        let response: SearchResponse = self.get_json("Search jobs", request).await?;
        Ok(response.jobs)
    }

    async fn job_stats(&self) -> Result<JobStats> {
        debug!("GET /job-stats");
        self.get_json("Job stats", self.client.get(self.url("/job-stats")))
            .await
    }

    async fn create_job(&self, payload: &JobPayload) -> Result<String> {
        debug!(title = %payload.title, "POST /add-job");
        self.ack("Create job", self.client.post(self.url("/add-job")).json(payload))
            .await
    }

    async fn update_job(&self, id: JobId, payload: &JobPayload) -> Result<String> {
        debug!(%id, "PUT /edit-job");
        let request = self
            .client
            .put(self.url(&format!("/edit-job/{}", id)))
            .json(payload);
        self.ack("Update job", request).await
    }

    async fn delete_job(&self, id: JobId) -> Result<String> {
        debug!(%id, "DELETE /delete-job");
        let request = self.client.delete(self.url(&format!("/delete-job/{}", id)));
        self.ack("Delete job", request).await
    }

    async fn upload_resume(&self, id: JobId, file: &ResumeFile) -> Result<String> {
        debug!(%id, file = %file.file_name, bytes = file.bytes.len(), "POST /upload-resume");
        let part = multipart::Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        let form = multipart::Form::new().part("file", part);
        let request = self
            .client
            .post(self.url(&format!("/upload-resume/{}", id)))
            .multipart(form);
        self.ack("Upload resume", request).await
    }

    async fn match_resume(&self, id: JobId) -> Result<MatchScore> {
        debug!(%id, "GET /match-resume");
        let request = self.client.get(self.url(&format!("/match-resume/{}", id)));
        self.get_json("Match resume", request).await
    }

    async fn salary_estimate(&self, query: &str, location: &str) -> Result<SalaryEstimate> {
        debug!(query, location, "GET /salary-estimate");
        let request = self
            .client
            .get(self.url("/salary-estimate"))
            .query(&[("query", query), ("location", location)]);
        self.get_json("Salary estimate", request).await
    }
}
