//! Job and status types for the generation queue.
//!
//! A [`Job`] is created on submission and is immutable once enqueued; it is
//! owned by the queue until the worker dequeues it, then by the worker for
//! the duration of generation. The [`Token`] is the sole correlation key
//! across the queue, the processing registry, and the result store.

use serde::{Deserialize, Serialize};

/// Opaque client-supplied identifier correlating a submission with its
/// eventual result. No format constraints are enforced here.
pub type Token = String;

/// Vacancy parameters supplied with a submission.
///
/// Field aliases mirror the public API (camelCase); only the vacancy
/// title is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyParams {
    /// Position title, e.g. "Rust developer".
    #[serde(rename = "vacancyName")]
    pub vacancy_name: String,

    /// Hiring company name.
    #[serde(rename = "companyName", default)]
    pub company_name: String,

    /// Company location.
    #[serde(rename = "companyPlace", default)]
    pub company_place: String,

    /// Work schedule, free-form.
    #[serde(default)]
    pub schedule: String,

    /// Required experience, free-form.
    #[serde(default)]
    pub experience: String,

    /// Key skills for the position.
    #[serde(rename = "keySkills", default)]
    pub key_skills: Vec<String>,
}

/// A pending unit of generation work.
#[derive(Debug, Clone)]
pub struct Job {
    /// Correlation token.
    pub token: Token,
    /// Generation parameters.
    pub params: VacancyParams,
}

impl Job {
    /// Create a new job for the given token and parameters.
    pub fn new(token: impl Into<Token>, params: VacancyParams) -> Self {
        Self { token: token.into(), params }
    }
}

/// Resolved status of a token, as reported to clients.
///
/// Exactly one of these holds for a given token at any instant. `Unknown`
/// deliberately conflates never-seen, cancelled, evicted, and
/// already-collected; callers cannot distinguish them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobStatus {
    /// Waiting in the queue at the given 1-based position. The position
    /// does not count a job currently being processed.
    Queued { position: usize },
    /// Actively generating.
    Processing,
    /// Generation finished; the answer is attached.
    Completed { answer: String },
    /// Generation failed; the reason is attached.
    Failed { reason: String },
    /// Token never seen, cancelled, evicted, or already collected.
    Unknown,
}

impl JobStatus {
    /// Returns true if the status is terminal (completed or failed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed { .. } | JobStatus::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_deserialize_aliases() {
        let json = r#"{
            "vacancyName": "Rust developer",
            "companyName": "Acme",
            "companyPlace": "Berlin",
            "schedule": "remote",
            "experience": "3+ years",
            "keySkills": ["rust", "tokio"]
        }"#;

        let params: VacancyParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.vacancy_name, "Rust developer");
        assert_eq!(params.company_name, "Acme");
        assert_eq!(params.key_skills, vec!["rust", "tokio"]);
    }

    #[test]
    fn test_params_optional_fields_default() {
        let json = r#"{"vacancyName": "QA engineer"}"#;
        let params: VacancyParams = serde_json::from_str(json).unwrap();
        assert!(params.company_name.is_empty());
        assert!(params.key_skills.is_empty());
    }

    #[test]
    fn test_status_serialization() {
        let queued = serde_json::to_value(JobStatus::Queued { position: 2 }).unwrap();
        assert_eq!(queued["status"], "queued");
        assert_eq!(queued["position"], 2);

        let completed = serde_json::to_value(JobStatus::Completed {
            answer: "text".to_string(),
        })
        .unwrap();
        assert_eq!(completed["status"], "completed");
        assert_eq!(completed["answer"], "text");

        let unknown = serde_json::to_value(JobStatus::Unknown).unwrap();
        assert_eq!(unknown["status"], "unknown");
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobStatus::Completed { answer: String::new() }.is_terminal());
        assert!(JobStatus::Failed { reason: String::new() }.is_terminal());
        assert!(!JobStatus::Queued { position: 1 }.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(!JobStatus::Unknown.is_terminal());
    }
}
