use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Location sent with a search (and shown on results) when the filter is left empty.
pub const DEFAULT_LOCATION: &str = "United States";

/// Store-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0.to_string())
    }
}

impl FromStr for JobId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_start_matches('#')
            .parse::<i64>()
            .map(JobId)
            .map_err(|_| format!("'{}' is not a job id", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    Applied,
    Interview,
    Rejected,
    Offer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// Closed set of wire labels shared by the three form enums.
pub trait Choice: Copy + PartialEq + Sized + 'static {
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    /// Next value in form order, wrapping around. Used by the form's select fields.
    fn cycle(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn parse_label(s: &str) -> Result<Self, String> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let options: Vec<&str> = Self::ALL.iter().map(|c| c.label()).collect();
                format!("'{}' is not one of: {}", s, options.join(", "))
            })
    }
}

impl Choice for JobStatus {
    const ALL: &'static [Self] = &[Self::Applied, Self::Interview, Self::Rejected, Self::Offer];

    fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interview => "Interview",
            Self::Rejected => "Rejected",
            Self::Offer => "Offer",
        }
    }
}

impl Choice for JobType {
    const ALL: &'static [Self] = &[Self::FullTime, Self::PartTime, Self::Internship];

    fn label(self) -> &'static str {
        match self {
            Self::FullTime => "Full-time",
            Self::PartTime => "Part-time",
            Self::Internship => "Internship",
        }
    }
}

impl Choice for Priority {
    const ALL: &'static [Self] = &[Self::High, Self::Medium, Self::Low];

    fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

macro_rules! choice_impls {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_label(s)
            }
        }
    )*};
}

choice_impls!(JobStatus, JobType, Priority);

/// A job application as held by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub status: JobStatus,
    pub job_type: JobType,
    pub priority: Priority,
    pub application_date: NaiveDate,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub interview_date: Option<NaiveDate>,
    #[serde(default, rename = "resume")]
    pub resume_ref: Option<String>,
    #[serde(default)]
    pub job_link: Option<String>,
}

impl JobRecord {
    /// Tags worth showing: blank tokens left by stray commas are hidden.
    pub fn display_tags(&self) -> Vec<&str> {
        self.tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Body of the create and update requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPayload {
    pub title: String,
    pub company: String,
    pub status: JobStatus,
    pub job_type: JobType,
    pub priority: Priority,
    pub application_date: NaiveDate,
    pub deadline: Option<NaiveDate>,
    pub description: String,
    pub tags: Vec<String>,
    pub interview_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_link: Option<String>,
}

/// One hit from the external job search, never stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, alias = "link")]
    pub job_link: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

impl SearchResult {
    pub fn location_label(&self) -> &str {
        self.location
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or("Location not specified")
    }

    pub fn source_label(&self) -> &str {
        self.source
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("Website")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub jobs: Vec<SearchResult>,
}

/// Server-computed counters. Never derived from the cached job list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobStats {
    pub applied: u64,
    pub interviews: u64,
    pub rejected: u64,
    pub offers: u64,
    #[serde(default)]
    pub total_jobs: Option<u64>,
}

impl JobStats {
    /// Chart bars in display order.
    pub fn bars(&self) -> [(&'static str, u64); 4] {
        [
            ("Applied", self.applied),
            ("Interviews", self.interviews),
            ("Rejected", self.rejected),
            ("Offers", self.offers),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MatchScore {
    pub match_score: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SalaryEstimate {
    Average { average_salary: f64 },
    NoData { message: String },
}

impl fmt::Display for SalaryEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Average { average_salary } => write!(f, "Average salary: ${:.2}", average_salary),
            Self::NoData { message } => f.write_str(message),
        }
    }
}

/// Resume staged for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
