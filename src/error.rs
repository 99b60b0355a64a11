use std::borrow::Borrow;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    /// Transport failure or non-success response from the record store.
    #[error("{operation} failed{}: {detail}", http_suffix(.status))]
    RequestFailed {
        operation: &'static str,
        status: Option<u16>,
        detail: String,
    },

    #[error("Please select a file first.")]
    NoFileStaged,

    #[error("A save is already in progress; wait for it to finish.")]
    SaveInProgress,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} '{value}' is not a date (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("Failed to read resume file {}: {source}", .path.display())]
    ResumeRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrackerError {
    pub fn request(operation: &'static str, status: Option<u16>, detail: impl Into<String>) -> Self {
        Self::RequestFailed {
            operation,
            status,
            detail: detail.into(),
        }
    }
}

fn http_suffix<S: Borrow<Option<u16>>>(status: S) -> String {
    status
        .borrow()
        .map(|s| format!(" (HTTP {})", s))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_message() {
        let err = TrackerError::request("Delete job", Some(404), "Job not found");
        assert_eq!(err.to_string(), "Delete job failed (HTTP 404): Job not found");

        let err = TrackerError::request("List jobs", None, "connection refused");
        assert_eq!(err.to_string(), "List jobs failed: connection refused");
    }

    #[test]
    fn test_local_errors() {
        assert_eq!(TrackerError::NoFileStaged.to_string(), "Please select a file first.");
        assert_eq!(TrackerError::MissingField("Company").to_string(), "Company is required");
    }
}
