// ABOUTME: Approval records gating SR, SPEC, release and data extraction progression
// ABOUTME: An approval is a multi-step line of approvers processed in order

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::resource::Resource;

wire_enum! {
    /// What kind of record an approval gates
    pub enum ApprovalType {
        Sr => ("SR", "SR approval"),
        Spec => ("SPEC", "SPEC approval"),
        Release => ("RELEASE", "Release approval"),
        DataExtraction => ("DATA_EXTRACTION", "Data extraction approval"),
    }
}

wire_enum! {
    pub enum ApprovalStatus {
        Pending => ("PENDING", "Pending"),
        Approved => ("APPROVED", "Approved"),
        Rejected => ("REJECTED", "Rejected"),
        Cancelled => ("CANCELLED", "Cancelled"),
    }
}

wire_enum! {
    /// Verdict an approver may record on their step
    pub enum ApprovalDecision {
        Approved => ("APPROVED", "Approve"),
        Rejected => ("REJECTED", "Reject"),
    }
}

/// One approver's step in an approval line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalLine {
    pub id: i64,
    pub step_order: u32,
    #[serde(default)]
    pub approver_name: Option<String>,
    pub status: ApprovalStatus,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub approved_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub id: i64,
    #[serde(default)]
    pub approval_number: Option<String>,
    pub approval_type: ApprovalType,
    pub target_id: i64,
    pub status: ApprovalStatus,
    #[serde(default)]
    pub current_step: Option<u32>,
    #[serde(default)]
    pub total_steps: Option<u32>,
    #[serde(default)]
    pub requester_name: Option<String>,
    #[serde(default)]
    pub requested_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub approval_lines: Vec<ApprovalLine>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApprovalCreateRequest {
    pub approval_type: ApprovalType,
    pub target_id: i64,
    /// Approvers in step order
    pub approver_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApprovalUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Body of `PUT /approvals/{id}/process`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApprovalProcessRequest {
    pub status: ApprovalDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApprovalFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApprovalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<ApprovalType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Resource for Approval {
    const PATH: &'static str = "/approvals";
    const NAME: &'static str = "approval";

    type Create = ApprovalCreateRequest;
    type Update = ApprovalUpdateRequest;
    type Filter = ApprovalFilter;

    fn id(&self) -> i64 {
        self.id
    }
}
