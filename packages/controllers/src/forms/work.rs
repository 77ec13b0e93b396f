use itms_core::models::approval::{ApprovalCreateRequest, ApprovalType};
use itms_core::models::incident::{IncidentCreateRequest, IncidentType, Severity, SystemType};
use itms_core::models::issue::IssueCreateRequest;
use itms_core::models::project::{ProjectCreateRequest, ProjectType};
use itms_core::models::release::{ReleaseCreateRequest, ReleaseType};
use itms_core::models::specification::{SpecCategory, SpecCreateRequest, SpecType};
use itms_core::models::sr::{Priority, SrCreateRequest, SrType};
use itms_core::{
    Approval, Incident, Issue, Project, Release, Resource, ServiceRequest, Specification,
};

use super::{detail_route, id_field, NAME_MAX, TITLE_MAX};
use crate::form::{
    optional_date_time, optional_parse, optional_text, parse, text, FieldKind, FieldSpec,
    FormSchema, FormValues,
};
use crate::validation::{Rule, ValidationError};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectForm;

impl FormSchema for ProjectForm {
    type Request = ProjectCreateRequest;
    type Response = Project;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("code", "Code", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(20)),
            FieldSpec::new("name", "Name", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(NAME_MAX)),
            FieldSpec::new("projectType", "Type", FieldKind::Select(ProjectType::WIRE))
                .required()
                .default_value("SI"),
            FieldSpec::new("startDate", "Start date", FieldKind::Date).required(),
            FieldSpec::new("endDate", "End date", FieldKind::Date),
            id_field("companyId", "Company id"),
            FieldSpec::new("description", "Description", FieldKind::Multiline),
            FieldSpec::new("budget", "Budget", FieldKind::Number)
                .rule(Rule::Integer)
                .rule(Rule::Range {
                    min: 0.0,
                    max: i64::MAX as f64,
                }),
            id_field("pmId", "PM id"),
        ]
    }

    fn project(&self, values: &FormValues) -> Result<ProjectCreateRequest, ValidationError> {
        Ok(ProjectCreateRequest {
            code: text(values, "code"),
            name: text(values, "name"),
            project_type: parse(values, "projectType")?,
            start_date: parse(values, "startDate")?,
            end_date: optional_parse(values, "endDate")?,
            company_id: optional_parse(values, "companyId")?,
            description: optional_text(values, "description"),
            budget: optional_parse(values, "budget")?,
            pm_id: optional_parse(values, "pmId")?,
        })
    }

    fn success_message(&self) -> String {
        "Project created".to_string()
    }

    fn navigation_target(&self, response: &Project) -> String {
        detail_route(Project::PATH, response.id())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceRequestForm;

impl FormSchema for ServiceRequestForm {
    type Request = SrCreateRequest;
    type Response = ServiceRequest;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("title", "Title", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(TITLE_MAX)),
            FieldSpec::new("description", "Description", FieldKind::Multiline).required(),
            FieldSpec::new("srType", "Type", FieldKind::Select(SrType::WIRE))
                .required()
                .default_value("DEVELOPMENT"),
            FieldSpec::new("priority", "Priority", FieldKind::Select(Priority::WIRE))
                .required()
                .default_value("MEDIUM"),
            id_field("projectId", "Project id").required(),
            FieldSpec::new("expectedDate", "Expected date", FieldKind::Date),
            FieldSpec::new("estimatedManday", "Estimated man-days", FieldKind::Number).rule(
                Rule::Range {
                    min: 0.0,
                    max: 9_999.0,
                },
            ),
        ]
    }

    fn project(&self, values: &FormValues) -> Result<SrCreateRequest, ValidationError> {
        Ok(SrCreateRequest {
            title: text(values, "title"),
            description: text(values, "description"),
            sr_type: parse(values, "srType")?,
            priority: parse(values, "priority")?,
            project_id: parse(values, "projectId")?,
            expected_date: optional_parse(values, "expectedDate")?,
            estimated_manday: optional_parse(values, "estimatedManday")?,
        })
    }

    fn success_message(&self) -> String {
        "Service request created".to_string()
    }

    fn navigation_target(&self, response: &ServiceRequest) -> String {
        detail_route(ServiceRequest::PATH, response.id())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpecificationForm;

impl FormSchema for SpecificationForm {
    type Request = SpecCreateRequest;
    type Response = Specification;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            id_field("srId", "SR id").required(),
            FieldSpec::new("specType", "Type", FieldKind::Select(SpecType::WIRE))
                .required()
                .default_value("DEVELOPMENT"),
            FieldSpec::new("specCategory", "Category", FieldKind::Select(SpecCategory::WIRE))
                .required()
                .default_value("ACCEPTED"),
            FieldSpec::new("functionPoint", "Function points", FieldKind::Number).rule(
                Rule::Range {
                    min: 0.0,
                    max: 99_999.0,
                },
            ),
            FieldSpec::new("manDay", "Man-days", FieldKind::Number).rule(Rule::Range {
                min: 0.0,
                max: 9_999.0,
            }),
            id_field("assigneeId", "Assignee id"),
            id_field("reviewerId", "Reviewer id"),
        ]
    }

    fn project(&self, values: &FormValues) -> Result<SpecCreateRequest, ValidationError> {
        Ok(SpecCreateRequest {
            sr_id: parse(values, "srId")?,
            spec_type: parse(values, "specType")?,
            spec_category: parse(values, "specCategory")?,
            function_point: optional_parse(values, "functionPoint")?,
            man_day: optional_parse(values, "manDay")?,
            assignee_id: optional_parse(values, "assigneeId")?,
            reviewer_id: optional_parse(values, "reviewerId")?,
        })
    }

    fn success_message(&self) -> String {
        "Specification created".to_string()
    }

    fn navigation_target(&self, response: &Specification) -> String {
        detail_route(Specification::PATH, response.id())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ApprovalForm;

impl FormSchema for ApprovalForm {
    type Request = ApprovalCreateRequest;
    type Response = Approval;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("approvalType", "Type", FieldKind::Select(ApprovalType::WIRE))
                .required(),
            id_field("targetId", "Target id").required(),
            // Comma separated, in approval order
            FieldSpec::new("approverIds", "Approver ids", FieldKind::Text).required(),
        ]
    }

    fn project(&self, values: &FormValues) -> Result<ApprovalCreateRequest, ValidationError> {
        let approver_ids = text(values, "approverIds")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<i64>().map_err(|_| ValidationError::Rule {
                    field: "approverIds".to_string(),
                    message: format!("Approver id {} is not a number", s),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ApprovalCreateRequest {
            approval_type: parse(values, "approvalType")?,
            target_id: parse(values, "targetId")?,
            approver_ids,
        })
    }

    fn success_message(&self) -> String {
        "Approval requested".to_string()
    }

    fn navigation_target(&self, response: &Approval) -> String {
        detail_route(Approval::PATH, response.id())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IssueForm;

impl FormSchema for IssueForm {
    type Request = IssueCreateRequest;
    type Response = Issue;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("title", "Title", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(TITLE_MAX)),
            FieldSpec::new("content", "Content", FieldKind::Multiline).required(),
            id_field("srId", "SR id"),
            id_field("specId", "Specification id"),
            id_field("assigneeId", "Assignee id"),
            id_field("reporterId", "Reporter id"),
            id_field("parentIssueId", "Parent issue id"),
        ]
    }

    fn project(&self, values: &FormValues) -> Result<IssueCreateRequest, ValidationError> {
        Ok(IssueCreateRequest {
            title: text(values, "title"),
            content: text(values, "content"),
            sr_id: optional_parse(values, "srId")?,
            spec_id: optional_parse(values, "specId")?,
            assignee_id: optional_parse(values, "assigneeId")?,
            reporter_id: optional_parse(values, "reporterId")?,
            parent_issue_id: optional_parse(values, "parentIssueId")?,
        })
    }

    fn success_message(&self) -> String {
        "Issue created".to_string()
    }

    fn navigation_target(&self, response: &Issue) -> String {
        detail_route(Issue::PATH, response.id())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseForm;

impl FormSchema for ReleaseForm {
    type Request = ReleaseCreateRequest;
    type Response = Release;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("title", "Title", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(TITLE_MAX)),
            FieldSpec::new("releaseType", "Type", FieldKind::Select(ReleaseType::WIRE))
                .required()
                .default_value("REGULAR"),
            FieldSpec::new("content", "Content", FieldKind::Multiline),
            id_field("requesterId", "Requester id"),
            id_field("requesterDeptId", "Requester department id"),
            FieldSpec::new("scheduledAt", "Scheduled at", FieldKind::DateTime),
        ]
    }

    fn project(&self, values: &FormValues) -> Result<ReleaseCreateRequest, ValidationError> {
        Ok(ReleaseCreateRequest {
            title: text(values, "title"),
            release_type: parse(values, "releaseType")?,
            content: optional_text(values, "content"),
            requester_id: optional_parse(values, "requesterId")?,
            requester_dept_id: optional_parse(values, "requesterDeptId")?,
            scheduled_at: optional_date_time(values, "scheduledAt")?,
        })
    }

    fn success_message(&self) -> String {
        "Release created".to_string()
    }

    fn navigation_target(&self, response: &Release) -> String {
        detail_route(Release::PATH, response.id())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IncidentForm;

impl FormSchema for IncidentForm {
    type Request = IncidentCreateRequest;
    type Response = Incident;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("title", "Title", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(TITLE_MAX)),
            FieldSpec::new("incidentType", "Type", FieldKind::Select(IncidentType::WIRE))
                .required()
                .default_value("INCIDENT"),
            FieldSpec::new("systemType", "System", FieldKind::Select(SystemType::WIRE))
                .required(),
            FieldSpec::new("severity", "Severity", FieldKind::Select(Severity::WIRE))
                .required()
                .default_value("MEDIUM"),
            FieldSpec::new("businessArea", "Business area", FieldKind::Text),
            FieldSpec::new("occurredAt", "Occurred at", FieldKind::DateTime),
            id_field("assigneeId", "Assignee id"),
        ]
    }

    fn project(&self, values: &FormValues) -> Result<IncidentCreateRequest, ValidationError> {
        Ok(IncidentCreateRequest {
            title: text(values, "title"),
            incident_type: parse(values, "incidentType")?,
            system_type: parse(values, "systemType")?,
            severity: parse(values, "severity")?,
            business_area: optional_text(values, "businessArea"),
            occurred_at: optional_date_time(values, "occurredAt")?,
            assignee_id: optional_parse(values, "assigneeId")?,
        })
    }

    fn success_message(&self) -> String {
        "Incident reported".to_string()
    }

    fn navigation_target(&self, response: &Incident) -> String {
        detail_route(Incident::PATH, response.id())
    }
}
