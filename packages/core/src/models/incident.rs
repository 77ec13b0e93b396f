// ABOUTME: Incident records for outages and failures of operated systems

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::resource::Resource;

wire_enum! {
    pub enum Severity {
        Low => ("LOW", "Low"),
        Medium => ("MEDIUM", "Medium"),
        High => ("HIGH", "High"),
        Critical => ("CRITICAL", "Critical"),
    }
}

wire_enum! {
    pub enum IncidentStatus {
        Open => ("OPEN", "Open"),
        Investigating => ("INVESTIGATING", "Investigating"),
        Resolved => ("RESOLVED", "Resolved"),
        Closed => ("CLOSED", "Closed"),
    }
}

wire_enum! {
    pub enum IncidentType {
        Incident => ("INCIDENT", "Incident"),
        Failure => ("FAILURE", "Failure"),
    }
}

wire_enum! {
    /// Layer of the operated system where an incident occurred
    pub enum SystemType {
        Program => ("PROGRAM", "Program"),
        Data => ("DATA", "Data"),
        Server => ("SERVER", "Server"),
        Network => ("NETWORK", "Network"),
        Pc => ("PC", "PC"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub severity: Severity,
    pub status: IncidentStatus,
    #[serde(default)]
    pub incident_type: Option<IncidentType>,
    #[serde(default)]
    pub system_type: Option<SystemType>,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub reporter_id: Option<i64>,
    #[serde(default)]
    pub reporter_name: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<i64>,
    #[serde(default)]
    pub assignee_name: Option<String>,
    #[serde(default)]
    pub occurred_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub resolved_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub root_cause: Option<String>,
    #[serde(default)]
    pub solution: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IncidentCreateRequest {
    pub title: String,
    pub incident_type: IncidentType,
    pub system_type: SystemType,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IncidentUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IncidentFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Resource for Incident {
    const PATH: &'static str = "/incidents";
    const NAME: &'static str = "incident";

    type Create = IncidentCreateRequest;
    type Update = IncidentUpdateRequest;
    type Filter = IncidentFilter;

    fn id(&self) -> i64 {
        self.id
    }
}
