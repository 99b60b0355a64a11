use chrono::NaiveDate;

use crate::error::{Result, TrackerError};
use crate::models::{Choice, JobId, JobPayload, JobRecord, JobStatus, JobType, Priority, SearchResult};

/// Which record, if any, the form is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftMode {
    #[default]
    Create,
    Editing(JobId),
}

/// Editable form fields. Dates, tags and free text are kept exactly as typed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormDraft {
    pub title: String,
    pub company: String,
    pub status: JobStatus,
    pub job_type: JobType,
    pub priority: Priority,
    pub application_date: String,
    pub deadline: String,
    pub description: String,
    pub tags: String,
    pub interview_date: String,
    pub job_link: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Draft {
    pub mode: DraftMode,
    pub fields: FormDraft,
}

impl Draft {
    pub fn editing(record: &JobRecord) -> Self {
        Self {
            mode: DraftMode::Editing(record.id),
            fields: FormDraft::from_record(record),
        }
    }

    pub fn target(&self) -> Option<JobId> {
        match self.mode {
            DraftMode::Create => None,
            DraftMode::Editing(id) => Some(id),
        }
    }
}

impl FormDraft {
    pub fn from_record(record: &JobRecord) -> Self {
        Self {
            title: record.title.clone(),
            company: record.company.clone(),
            status: record.status,
            job_type: record.job_type,
            priority: record.priority,
            application_date: format_date(Some(record.application_date)),
            deadline: format_date(record.deadline),
            description: record.description.clone().unwrap_or_default(),
            tags: join_tags(&record.tags),
            interview_date: format_date(record.interview_date),
            job_link: record.job_link.clone().unwrap_or_default(),
        }
    }

    /// Create-mode draft prefilled from a search hit.
    pub fn from_search(result: &SearchResult) -> Self {
        Self {
            title: result.title.clone(),
            company: result.company.clone(),
            job_link: result.job_link.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Builds the request body. Empty optional dates become `None` and go out as null.
    pub fn to_payload(&self) -> Result<JobPayload> {
        if self.title.trim().is_empty() {
            return Err(TrackerError::MissingField("Job title"));
        }
        if self.company.trim().is_empty() {
            return Err(TrackerError::MissingField("Company"));
        }
        let application_date = parse_date("Application date", &self.application_date)?
            .ok_or(TrackerError::MissingField("Application date"))?;

        Ok(JobPayload {
            title: self.title.clone(),
            company: self.company.clone(),
            status: self.status,
            job_type: self.job_type,
            priority: self.priority,
            application_date,
            deadline: parse_date("Deadline", &self.deadline)?,
            description: self.description.clone(),
            tags: split_tags(&self.tags),
            interview_date: parse_date("Interview date", &self.interview_date)?,
            job_link: Some(self.job_link.trim())
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        })
    }
}

/// Splits the comma-delimited tag text, trimming each token. Empty tokens are kept.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',').map(|t| t.trim().to_string()).collect()
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn parse_date(field: &'static str, text: &str) -> Result<Option<NaiveDate>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| TrackerError::InvalidDate {
            field,
            value: text.to_string(),
        })
}

/// Form fields in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Company,
    Status,
    JobType,
    Priority,
    ApplicationDate,
    Deadline,
    Tags,
    InterviewDate,
    Description,
    JobLink,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Title,
        Field::Company,
        Field::Status,
        Field::JobType,
        Field::Priority,
        Field::ApplicationDate,
        Field::Deadline,
        Field::Tags,
        Field::InterviewDate,
        Field::Description,
        Field::JobLink,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Job Title",
            Field::Company => "Company",
            Field::Status => "Status",
            Field::JobType => "Job Type",
            Field::Priority => "Priority",
            Field::ApplicationDate => "Applied (YYYY-MM-DD)",
            Field::Deadline => "Deadline",
            Field::Tags => "Tags (comma separated)",
            Field::InterviewDate => "Interview Date",
            Field::Description => "Description",
            Field::JobLink => "Link",
        }
    }

    pub fn is_choice(self) -> bool {
        matches!(self, Field::Status | Field::JobType | Field::Priority)
    }

    pub fn next(self) -> Field {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Field {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn value(self, form: &FormDraft) -> String {
        match self {
            Field::Status => form.status.label().to_string(),
            Field::JobType => form.job_type.label().to_string(),
            Field::Priority => form.priority.label().to_string(),
            _ => self.text(form).map(String::clone).unwrap_or_default(),
        }
    }

    fn text(self, form: &FormDraft) -> Option<&String> {
        match self {
            Field::Title => Some(&form.title),
            Field::Company => Some(&form.company),
            Field::ApplicationDate => Some(&form.application_date),
            Field::Deadline => Some(&form.deadline),
            Field::Tags => Some(&form.tags),
            Field::InterviewDate => Some(&form.interview_date),
            Field::Description => Some(&form.description),
            Field::JobLink => Some(&form.job_link),
            Field::Status | Field::JobType | Field::Priority => None,
        }
    }

    fn text_mut(self, form: &mut FormDraft) -> Option<&mut String> {
        match self {
            Field::Title => Some(&mut form.title),
            Field::Company => Some(&mut form.company),
            Field::ApplicationDate => Some(&mut form.application_date),
            Field::Deadline => Some(&mut form.deadline),
            Field::Tags => Some(&mut form.tags),
            Field::InterviewDate => Some(&mut form.interview_date),
            Field::Description => Some(&mut form.description),
            Field::JobLink => Some(&mut form.job_link),
            Field::Status | Field::JobType | Field::Priority => None,
        }
    }

    /// Typing into a select field steps to its next option instead.
    pub fn input(self, form: &mut FormDraft, c: char) {
        match self.text_mut(form) {
            Some(text) => text.push(c),
            None => self.cycle(form),
        }
    }

    pub fn backspace(self, form: &mut FormDraft) {
        if let Some(text) = self.text_mut(form) {
            text.pop();
        }
    }

    pub fn cycle(self, form: &mut FormDraft) {
        match self {
            Field::Status => form.status = form.status.cycle(),
            Field::JobType => form.job_type = form.job_type.cycle(),
            Field::Priority => form.priority = form.priority.cycle(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormDraft {
        FormDraft {
            title: "Rust Developer".to_string(),
            company: "Ferris Inc".to_string(),
            application_date: "2024-05-02".to_string(),
            ..FormDraft::default()
        }
    }

    #[test]
    fn test_create_defaults() {
        let draft = Draft::default();
        assert_eq!(draft.mode, DraftMode::Create);
        assert_eq!(draft.fields.status, JobStatus::Applied);
        assert_eq!(draft.fields.job_type, JobType::FullTime);
        assert_eq!(draft.fields.priority, Priority::Medium);
        assert!(draft.fields.application_date.is_empty());
        assert!(draft.fields.deadline.is_empty());
        assert!(draft.fields.interview_date.is_empty());
    }

    #[test]
    fn test_split_tags_trims_each_token() {
        assert_eq!(
            split_tags("Remote, Hybrid,  On-site"),
            vec!["Remote", "Hybrid", "On-site"]
        );
    }

    #[test]
    fn test_split_tags_keeps_empty_tokens() {
        assert_eq!(split_tags("Remote,"), vec!["Remote", ""]);
        assert_eq!(split_tags(""), vec![""]);
    }

    #[test]
    fn test_tags_survive_join_and_split() {
        let tags = vec!["Remote".to_string(), "Hybrid".to_string()];
        assert_eq!(join_tags(&tags), "Remote, Hybrid");
        assert_eq!(split_tags(&join_tags(&tags)), tags);
    }

    #[test]
    fn test_empty_dates_serialize_as_null() {
        let payload = filled().to_payload().unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["deadline"].is_null());
        assert!(json["interview_date"].is_null());
        assert_eq!(json["application_date"], "2024-05-02");
        assert_eq!(json["job_type"], "Full-time");
        assert!(json.get("job_link").is_none());
    }

    #[test]
    fn test_required_fields() {
        let mut form = filled();
        form.company = "  ".to_string();
        assert!(matches!(form.to_payload(), Err(TrackerError::MissingField("Company"))));

        let mut form = filled();
        form.application_date.clear();
        assert!(matches!(
            form.to_payload(),
            Err(TrackerError::MissingField("Application date"))
        ));
    }

    #[test]
    fn test_bad_date_is_reported() {
        let mut form = filled();
        form.deadline = "next week".to_string();
        match form.to_payload() {
            Err(TrackerError::InvalidDate { field, value }) => {
                assert_eq!(field, "Deadline");
                assert_eq!(value, "next week");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_from_record_flattens_tags_and_dates() {
        let record = JobRecord {
            id: JobId(4),
            title: "SRE".to_string(),
            company: "Globex".to_string(),
            status: JobStatus::Offer,
            job_type: JobType::Internship,
            priority: Priority::Low,
            application_date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            deadline: None,
            description: None,
            tags: vec!["Remote".to_string(), "On-site".to_string()],
            interview_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            resume_ref: None,
            job_link: None,
        };

        let draft = Draft::editing(&record);
        assert_eq!(draft.target(), Some(JobId(4)));
        assert_eq!(draft.fields.tags, "Remote, On-site");
        assert_eq!(draft.fields.deadline, "");
        assert_eq!(draft.fields.interview_date, "2024-02-01");
        assert_eq!(draft.fields.status, JobStatus::Offer);
    }

    #[test]
    fn test_field_editing() {
        let mut form = FormDraft::default();
        Field::Title.input(&mut form, 'R');
        Field::Title.input(&mut form, 'x');
        Field::Title.backspace(&mut form);
        assert_eq!(form.title, "R");

        Field::Priority.input(&mut form, ' ');
        assert_eq!(form.priority, Priority::Low);
        assert_eq!(Field::Priority.value(&form), "Low");

        assert_eq!(Field::JobLink.next(), Field::Title);
        assert_eq!(Field::Title.prev(), Field::JobLink);
    }
}
