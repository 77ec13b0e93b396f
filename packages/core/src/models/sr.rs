// ABOUTME: Service request records, the unit of requested work against a project
// ABOUTME: An SR moves through an approval workflow before specifications are written

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::resource::{Resource, StatusResource};

wire_enum! {
    pub enum SrType {
        Development => ("DEVELOPMENT", "Development"),
        Operation => ("OPERATION", "Operation"),
    }
}

wire_enum! {
    pub enum Priority {
        Low => ("LOW", "Low"),
        Medium => ("MEDIUM", "Medium"),
        High => ("HIGH", "High"),
        Urgent => ("URGENT", "Urgent"),
    }
}

wire_enum! {
    pub enum SrStatus {
        ApprovalRequested => ("APPROVAL_REQUESTED", "Approval requested"),
        ApprovalPending => ("APPROVAL_PENDING", "Approval pending"),
        Approved => ("APPROVED", "Approved"),
        Rejected => ("REJECTED", "Rejected"),
        Cancelled => ("CANCELLED", "Cancelled"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub id: i64,
    pub sr_number: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub sr_type: SrType,
    pub status: SrStatus,
    pub priority: Priority,
    #[serde(default)]
    pub requestor_id: Option<i64>,
    #[serde(default)]
    pub requestor_name: Option<String>,
    pub project_id: i64,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub expected_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_manday: Option<f64>,
    #[serde(default)]
    pub actual_manday: Option<f64>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SrCreateRequest {
    pub title: String,
    pub description: String,
    pub sr_type: SrType,
    pub priority: Priority,
    pub project_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_manday: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SrUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_manday: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SrFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sr_type: Option<SrType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SrStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requestor_id: Option<i64>,
}

impl Resource for ServiceRequest {
    const PATH: &'static str = "/srs";
    const NAME: &'static str = "service request";

    type Create = SrCreateRequest;
    type Update = SrUpdateRequest;
    type Filter = SrFilter;

    fn id(&self) -> i64 {
        self.id
    }
}

impl StatusResource for ServiceRequest {
    type Status = SrStatus;

    fn status(&self) -> SrStatus {
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_service_request() {
        let json = r#"{
            "id": 12,
            "srNumber": "SR-2024-0012",
            "title": "Add export",
            "description": "CSV export on the report page",
            "srType": "DEVELOPMENT",
            "status": "APPROVAL_PENDING",
            "priority": "HIGH",
            "requestorId": 5,
            "requestorName": "Lee",
            "projectId": 7,
            "projectName": "Portal renewal",
            "estimatedManday": 3.5,
            "createdAt": "2024-02-01T09:00:00"
        }"#;

        let sr: ServiceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(sr.status(), SrStatus::ApprovalPending);
        assert_eq!(sr.priority, Priority::High);
        assert_eq!(sr.estimated_manday, Some(3.5));
        assert_eq!(sr.updated_at, None);
    }

    #[test]
    fn test_filter_skips_absent_keys() {
        let filter = SrFilter {
            status: Some(SrStatus::Approved),
            project_id: Some(7),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            serde_json::json!({ "status": "APPROVED", "projectId": 7 })
        );
    }
}
