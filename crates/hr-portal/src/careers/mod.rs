//! Public careers page: the static job catalog and the application intake flow.

pub mod application;
pub mod catalog;
pub mod submission;

pub use application::{
    ApplicationFields, ApplicationPayload, ApplicationType, ValidationError, MAX_COURSE,
    MIN_COURSE,
};
pub use catalog::{
    filter_by_department, list_departments, JobBoard, JobPosting, ALL_DEPARTMENTS, JOB_POSTINGS,
};
pub use submission::{
    ApplicationDesk, Confirmation, HttpSubmissionGateway, SubmissionError, SubmissionGateway,
    SubmissionReceipt,
};
