// ABOUTME: Specification records, the estimated deliverables derived from an SR
// ABOUTME: Estimates are carried as function points and man-days

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::resource::{Resource, StatusResource};

wire_enum! {
    pub enum SpecType {
        Development => ("DEVELOPMENT", "Development"),
        Operation => ("OPERATION", "Operation"),
    }
}

wire_enum! {
    pub enum SpecCategory {
        Accepted => ("ACCEPTED", "Accepted"),
        Cancelled => ("CANCELLED", "Cancelled"),
    }
}

wire_enum! {
    pub enum SpecStatus {
        Pending => ("PENDING", "Pending"),
        InProgress => ("IN_PROGRESS", "In progress"),
        ApprovalPending => ("APPROVAL_PENDING", "Approval pending"),
        Approved => ("APPROVED", "Approved"),
        Rejected => ("REJECTED", "Rejected"),
        Completed => ("COMPLETED", "Completed"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specification {
    pub id: i64,
    pub spec_number: String,
    pub spec_type: SpecType,
    pub spec_category: SpecCategory,
    pub status: SpecStatus,
    #[serde(default)]
    pub function_point: Option<f64>,
    #[serde(default)]
    pub man_day: Option<f64>,
    pub sr_id: i64,
    #[serde(default)]
    pub sr_number: Option<String>,
    #[serde(default)]
    pub sr_title: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<i64>,
    #[serde(default)]
    pub assignee_name: Option<String>,
    #[serde(default)]
    pub reviewer_id: Option<i64>,
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpecCreateRequest {
    pub sr_id: i64,
    pub spec_type: SpecType,
    pub spec_category: SpecCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_point: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub man_day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<i64>,
}

/// Status is not part of the update record; it changes through the status endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpecUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_point: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub man_day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpecFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SpecStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sr_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Resource for Specification {
    const PATH: &'static str = "/specs";
    const NAME: &'static str = "specification";

    type Create = SpecCreateRequest;
    type Update = SpecUpdateRequest;
    type Filter = SpecFilter;

    fn id(&self) -> i64 {
        self.id
    }
}

impl StatusResource for Specification {
    type Status = SpecStatus;

    fn status(&self) -> SpecStatus {
        self.status
    }
}
