//! Core domain and wire types.
//!
//! - `job`: Job, VacancyParams, JobStatus
//! - `api`: request/response bodies for the HTTP surface

pub mod api;
pub mod job;

pub use api::{CancelResponse, SubmitRequest, SubmitResponse, SubscribeRequest, TokenRequest};
pub use job::{Job, JobStatus, Token, VacancyParams};
