// ABOUTME: Wire records, page envelope and resource traits for the ITMS client
// ABOUTME: Foundational package shared by the client, controllers and CLI packages

pub mod constants;
pub mod error;
pub mod models;
pub mod pagination;
pub mod resource;

// Re-export main types
pub use error::{ApiError, FieldErrorDetail, UNKNOWN_ERROR_CODE};
pub use models::ParseEnumError;
pub use pagination::{ListQuery, Page, Sort, SortOrder};
pub use resource::{Resource, StatusResource};

// Re-export entity records
pub use models::{
    approval::Approval, asset::Asset, incident::Incident, issue::Issue, partner::Partner,
    project::Project, release::Release, specification::Specification, sr::ServiceRequest,
    user::User,
};

// Re-export constants
pub use constants::{config_file, itms_dir, token_file};
