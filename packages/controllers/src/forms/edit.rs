use itms_core::models::approval::ApprovalUpdateRequest;
use itms_core::models::asset::{AssetType, AssetUpdateRequest};
use itms_core::models::incident::{IncidentStatus, IncidentUpdateRequest, Severity};
use itms_core::models::issue::{IssuePriority, IssueStatus, IssueType, IssueUpdateRequest};
use itms_core::models::partner::PartnerUpdateRequest;
use itms_core::models::project::{ProjectType, ProjectUpdateRequest};
use itms_core::models::release::{ReleaseStatus, ReleaseUpdateRequest};
use itms_core::models::specification::SpecUpdateRequest;
use itms_core::models::sr::{Priority, SrUpdateRequest};
use itms_core::models::user::UserUpdateRequest;
use itms_core::{
    Approval, Asset, Incident, Issue, Partner, Project, Release, Resource, ServiceRequest,
    Specification, User,
};

use super::{detail_route, id_field, NAME_MAX, PHONE_MAX, TITLE_MAX};
use crate::form::{Baseline, FieldKind, FieldSpec, FormSchema, FormValues};
use crate::validation::{Rule, ValidationError};

const COMMENT_MAX: usize = 500;
const BOOLEAN: &[&str] = &["true", "false"];

/// A record edited through a form prefilled with its stored values.
///
/// The form's request is the record's partial update and carries only the
/// fields that were changed.
pub trait Editable: Resource {
    type EditForm: FormSchema<Request = Self::Update, Response = Self>;

    fn edit_form(&self) -> Self::EditForm;
}

fn shown<T: ToString>(value: &Option<T>) -> Option<String> {
    value.as_ref().map(T::to_string)
}

#[derive(Debug, Clone)]
pub struct ProjectEditForm {
    baseline: Baseline,
}

impl Editable for Project {
    type EditForm = ProjectEditForm;

    fn edit_form(&self) -> ProjectEditForm {
        ProjectEditForm {
            baseline: Baseline::from_pairs([
                ("code", Some(self.code.clone())),
                ("name", Some(self.name.clone())),
                ("projectType", Some(self.project_type.to_string())),
                ("startDate", Some(self.start_date.to_string())),
                ("endDate", shown(&self.end_date)),
                ("companyId", shown(&self.company_id)),
                ("description", self.description.clone()),
                ("budget", shown(&self.budget)),
                ("pmId", shown(&self.pm_id)),
            ]),
        }
    }
}

impl FormSchema for ProjectEditForm {
    type Request = ProjectUpdateRequest;
    type Response = Project;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("code", "Code", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(20)),
            FieldSpec::new("name", "Name", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(NAME_MAX)),
            FieldSpec::new("projectType", "Type", FieldKind::Select(ProjectType::WIRE)).required(),
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

    fn initial_values(&self) -> FormValues {
        self.baseline.values().clone()
    }

    fn project(&self, values: &FormValues) -> Result<ProjectUpdateRequest, ValidationError> {
        let b = &self.baseline;
        Ok(ProjectUpdateRequest {
            code: b.changed(values, "code"),
            name: b.changed(values, "name"),
            project_type: b.changed_parse(values, "projectType")?,
            start_date: b.changed_parse(values, "startDate")?,
            end_date: b.changed_parse(values, "endDate")?,
            company_id: b.changed_parse(values, "companyId")?,
            description: b.changed(values, "description"),
            budget: b.changed_parse(values, "budget")?,
            pm_id: b.changed_parse(values, "pmId")?,
        })
    }

    fn success_message(&self) -> String {
        "Project updated".to_string()
    }

    fn navigation_target(&self, _response: &Project) -> String {
        Project::PATH.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct ServiceRequestEditForm {
    baseline: Baseline,
}

impl Editable for ServiceRequest {
    type EditForm = ServiceRequestEditForm;

    fn edit_form(&self) -> ServiceRequestEditForm {
        ServiceRequestEditForm {
            baseline: Baseline::from_pairs([
                ("title", Some(self.title.clone())),
                ("description", Some(self.description.clone())),
                ("priority", Some(self.priority.to_string())),
                ("expectedDate", shown(&self.expected_date)),
                ("estimatedManday", shown(&self.estimated_manday)),
            ]),
        }
    }
}

impl FormSchema for ServiceRequestEditForm {
    type Request = SrUpdateRequest;
    type Response = ServiceRequest;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("title", "Title", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(TITLE_MAX)),
            FieldSpec::new("description", "Description", FieldKind::Multiline).required(),
            FieldSpec::new("priority", "Priority", FieldKind::Select(Priority::WIRE)).required(),
            FieldSpec::new("expectedDate", "Expected date", FieldKind::Date),
            FieldSpec::new("estimatedManday", "Estimated man-days", FieldKind::Number).rule(
                Rule::Range {
                    min: 0.0,
                    max: 9_999.0,
                },
            ),
        ]
    }

    fn initial_values(&self) -> FormValues {
        self.baseline.values().clone()
    }

    fn project(&self, values: &FormValues) -> Result<SrUpdateRequest, ValidationError> {
        let b = &self.baseline;
        Ok(SrUpdateRequest {
            title: b.changed(values, "title"),
            description: b.changed(values, "description"),
            priority: b.changed_parse(values, "priority")?,
            expected_date: b.changed_parse(values, "expectedDate")?,
            estimated_manday: b.changed_parse(values, "estimatedManday")?,
        })
    }

    fn success_message(&self) -> String {
        "Service request updated".to_string()
    }

    fn navigation_target(&self, response: &ServiceRequest) -> String {
        detail_route(ServiceRequest::PATH, response.id())
    }
}

#[derive(Debug, Clone)]
pub struct SpecificationEditForm {
    baseline: Baseline,
}

impl Editable for Specification {
    type EditForm = SpecificationEditForm;

    fn edit_form(&self) -> SpecificationEditForm {
        SpecificationEditForm {
            baseline: Baseline::from_pairs([
                ("functionPoint", shown(&self.function_point)),
                ("manDay", shown(&self.man_day)),
                ("assigneeId", shown(&self.assignee_id)),
                ("reviewerId", shown(&self.reviewer_id)),
            ]),
        }
    }
}

impl FormSchema for SpecificationEditForm {
    type Request = SpecUpdateRequest;
    type Response = Specification;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
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

    fn initial_values(&self) -> FormValues {
        self.baseline.values().clone()
    }

    fn project(&self, values: &FormValues) -> Result<SpecUpdateRequest, ValidationError> {
        let b = &self.baseline;
        Ok(SpecUpdateRequest {
            function_point: b.changed_parse(values, "functionPoint")?,
            man_day: b.changed_parse(values, "manDay")?,
            reviewer_id: b.changed_parse(values, "reviewerId")?,
            assignee_id: b.changed_parse(values, "assigneeId")?,
        })
    }

    fn success_message(&self) -> String {
        "Specification updated".to_string()
    }

    fn navigation_target(&self, response: &Specification) -> String {
        detail_route(Specification::PATH, response.id())
    }
}

/// Approvals only take a comment; decisions go through `process`
#[derive(Debug, Clone, Default)]
pub struct ApprovalEditForm {
    baseline: Baseline,
}

impl Editable for Approval {
    type EditForm = ApprovalEditForm;

    fn edit_form(&self) -> ApprovalEditForm {
        ApprovalEditForm::default()
    }
}

impl FormSchema for ApprovalEditForm {
    type Request = ApprovalUpdateRequest;
    type Response = Approval;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![FieldSpec::new("comment", "Comment", FieldKind::Multiline)
            .rule(Rule::MaxLength(COMMENT_MAX))]
    }

    fn project(&self, values: &FormValues) -> Result<ApprovalUpdateRequest, ValidationError> {
        Ok(ApprovalUpdateRequest {
            comment: self.baseline.changed(values, "comment"),
        })
    }

    fn success_message(&self) -> String {
        "Approval updated".to_string()
    }

    fn navigation_target(&self, response: &Approval) -> String {
        detail_route(Approval::PATH, response.id())
    }
}

#[derive(Debug, Clone)]
pub struct IssueEditForm {
    baseline: Baseline,
}

impl Editable for Issue {
    type EditForm = IssueEditForm;

    fn edit_form(&self) -> IssueEditForm {
        IssueEditForm {
            baseline: Baseline::from_pairs([
                ("title", Some(self.title.clone())),
                ("description", self.description.clone()),
                ("issueType", shown(&self.issue_type)),
                ("priority", shown(&self.priority)),
                ("status", Some(self.status.to_string())),
                ("assigneeId", shown(&self.assignee_id)),
                ("releaseId", shown(&self.release_id)),
                ("dueDate", shown(&self.due_date)),
            ]),
        }
    }
}

impl FormSchema for IssueEditForm {
    type Request = IssueUpdateRequest;
    type Response = Issue;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("title", "Title", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(TITLE_MAX)),
            FieldSpec::new("description", "Description", FieldKind::Multiline),
            FieldSpec::new("issueType", "Type", FieldKind::Select(IssueType::WIRE)),
            FieldSpec::new("priority", "Priority", FieldKind::Select(IssuePriority::WIRE)),
            FieldSpec::new("status", "Status", FieldKind::Select(IssueStatus::WIRE)).required(),
            id_field("assigneeId", "Assignee id"),
            id_field("releaseId", "Release id"),
            FieldSpec::new("dueDate", "Due date", FieldKind::Date),
        ]
    }

    fn initial_values(&self) -> FormValues {
        self.baseline.values().clone()
    }

    fn project(&self, values: &FormValues) -> Result<IssueUpdateRequest, ValidationError> {
        let b = &self.baseline;
        Ok(IssueUpdateRequest {
            title: b.changed(values, "title"),
            description: b.changed(values, "description"),
            issue_type: b.changed_parse(values, "issueType")?,
            priority: b.changed_parse(values, "priority")?,
            status: b.changed_parse(values, "status")?,
            assignee_id: b.changed_parse(values, "assigneeId")?,
            release_id: b.changed_parse(values, "releaseId")?,
            due_date: b.changed_parse(values, "dueDate")?,
        })
    }

    fn success_message(&self) -> String {
        "Issue updated".to_string()
    }

    fn navigation_target(&self, response: &Issue) -> String {
        detail_route(Issue::PATH, response.id())
    }
}

#[derive(Debug, Clone)]
pub struct ReleaseEditForm {
    baseline: Baseline,
}

impl Editable for Release {
    type EditForm = ReleaseEditForm;

    fn edit_form(&self) -> ReleaseEditForm {
        ReleaseEditForm {
            baseline: Baseline::from_pairs([
                ("version", self.version.clone()),
                ("name", Some(self.name.clone())),
                ("description", self.description.clone()),
                ("status", Some(self.status.to_string())),
                ("releaseDate", shown(&self.release_date)),
                ("actualReleaseDate", shown(&self.actual_release_date)),
            ]),
        }
    }
}

impl FormSchema for ReleaseEditForm {
    type Request = ReleaseUpdateRequest;
    type Response = Release;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("version", "Version", FieldKind::Text).rule(Rule::MaxLength(20)),
            FieldSpec::new("name", "Name", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(TITLE_MAX)),
            FieldSpec::new("description", "Description", FieldKind::Multiline),
            FieldSpec::new("status", "Status", FieldKind::Select(ReleaseStatus::WIRE)).required(),
            FieldSpec::new("releaseDate", "Release date", FieldKind::Date),
            FieldSpec::new("actualReleaseDate", "Released on", FieldKind::Date),
        ]
    }

    fn initial_values(&self) -> FormValues {
        self.baseline.values().clone()
    }

    fn project(&self, values: &FormValues) -> Result<ReleaseUpdateRequest, ValidationError> {
        let b = &self.baseline;
        Ok(ReleaseUpdateRequest {
            version: b.changed(values, "version"),
            name: b.changed(values, "name"),
            description: b.changed(values, "description"),
            status: b.changed_parse(values, "status")?,
            release_date: b.changed_parse(values, "releaseDate")?,
            actual_release_date: b.changed_parse(values, "actualReleaseDate")?,
        })
    }

    fn success_message(&self) -> String {
        "Release updated".to_string()
    }

    fn navigation_target(&self, response: &Release) -> String {
        detail_route(Release::PATH, response.id())
    }
}

#[derive(Debug, Clone)]
pub struct IncidentEditForm {
    baseline: Baseline,
}

impl Editable for Incident {
    type EditForm = IncidentEditForm;

    fn edit_form(&self) -> IncidentEditForm {
        IncidentEditForm {
            baseline: Baseline::from_pairs([
                ("title", Some(self.title.clone())),
                ("description", self.description.clone()),
                ("severity", Some(self.severity.to_string())),
                ("status", Some(self.status.to_string())),
                ("assigneeId", shown(&self.assignee_id)),
                ("resolvedAt", shown(&self.resolved_at)),
                ("rootCause", self.root_cause.clone()),
                ("solution", self.solution.clone()),
            ]),
        }
    }
}

impl FormSchema for IncidentEditForm {
    type Request = IncidentUpdateRequest;
    type Response = Incident;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("title", "Title", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(TITLE_MAX)),
            FieldSpec::new("description", "Description", FieldKind::Multiline),
            FieldSpec::new("severity", "Severity", FieldKind::Select(Severity::WIRE)).required(),
            FieldSpec::new("status", "Status", FieldKind::Select(IncidentStatus::WIRE)).required(),
            id_field("assigneeId", "Assignee id"),
            FieldSpec::new("resolvedAt", "Resolved at", FieldKind::DateTime),
            FieldSpec::new("rootCause", "Root cause", FieldKind::Multiline),
            FieldSpec::new("solution", "Solution", FieldKind::Multiline),
        ]
    }

    fn initial_values(&self) -> FormValues {
        self.baseline.values().clone()
    }

    fn project(&self, values: &FormValues) -> Result<IncidentUpdateRequest, ValidationError> {
        let b = &self.baseline;
        Ok(IncidentUpdateRequest {
            title: b.changed(values, "title"),
            description: b.changed(values, "description"),
            severity: b.changed_parse(values, "severity")?,
            status: b.changed_parse(values, "status")?,
            assignee_id: b.changed_parse(values, "assigneeId")?,
            resolved_at: b.changed_date_time(values, "resolvedAt")?,
            root_cause: b.changed(values, "rootCause"),
            solution: b.changed(values, "solution"),
        })
    }

    fn success_message(&self) -> String {
        "Incident updated".to_string()
    }

    fn navigation_target(&self, response: &Incident) -> String {
        detail_route(Incident::PATH, response.id())
    }
}

#[derive(Debug, Clone)]
pub struct PartnerEditForm {
    baseline: Baseline,
}

impl Editable for Partner {
    type EditForm = PartnerEditForm;

    fn edit_form(&self) -> PartnerEditForm {
        PartnerEditForm {
            baseline: Baseline::from_pairs([
                ("name", Some(self.name.clone())),
                ("businessNumber", Some(self.business_number.clone())),
                ("ceoName", self.ceo_name.clone()),
                ("managerId", shown(&self.manager_id)),
                ("pmId", shown(&self.pm_id)),
                // Stored as closed, edited as active
                ("isActive", self.is_closed.map(|closed| (!closed).to_string())),
            ]),
        }
    }
}

impl FormSchema for PartnerEditForm {
    type Request = PartnerUpdateRequest;
    type Response = Partner;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", "Name", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(NAME_MAX)),
            FieldSpec::new("businessNumber", "Business number", FieldKind::Text)
                .required()
                .rule(Rule::business_number()),
            FieldSpec::new("ceoName", "CEO", FieldKind::Text).rule(Rule::MaxLength(NAME_MAX)),
            id_field("managerId", "Manager id"),
            id_field("pmId", "PM id"),
            FieldSpec::new("isActive", "Active", FieldKind::Select(BOOLEAN)),
        ]
    }

    fn initial_values(&self) -> FormValues {
        self.baseline.values().clone()
    }

    fn project(&self, values: &FormValues) -> Result<PartnerUpdateRequest, ValidationError> {
        let b = &self.baseline;
        Ok(PartnerUpdateRequest {
            name: b.changed(values, "name"),
            business_number: b.changed(values, "businessNumber"),
            ceo_name: b.changed(values, "ceoName"),
            manager_id: b.changed_parse(values, "managerId")?,
            pm_id: b.changed_parse(values, "pmId")?,
            is_active: b
                .changed(values, "isActive")
                .map(|v| v.eq_ignore_ascii_case("true")),
        })
    }

    fn success_message(&self) -> String {
        "Partner updated".to_string()
    }

    fn navigation_target(&self, response: &Partner) -> String {
        detail_route(Partner::PATH, response.id())
    }
}

#[derive(Debug, Clone)]
pub struct AssetEditForm {
    baseline: Baseline,
}

impl Editable for Asset {
    type EditForm = AssetEditForm;

    fn edit_form(&self) -> AssetEditForm {
        AssetEditForm {
            baseline: Baseline::from_pairs([
                ("name", Some(self.name.clone())),
                ("assetType", Some(self.asset_type.to_string())),
                ("model", self.model.clone()),
                ("manufacturer", self.manufacturer.clone()),
                ("serialNumber", self.serial_number.clone()),
                ("location", self.location.clone()),
                ("acquiredAt", shown(&self.acquired_at)),
                ("warrantyEndDate", shown(&self.warranty_end_date)),
                ("status", Some(self.status.clone())),
                ("managerId", shown(&self.manager_id)),
                ("notes", self.notes.clone()),
            ]),
        }
    }
}

impl FormSchema for AssetEditForm {
    type Request = AssetUpdateRequest;
    type Response = Asset;

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", "Name", FieldKind::Text)
                .required()
                .rule(Rule::MaxLength(NAME_MAX)),
            FieldSpec::new("assetType", "Type", FieldKind::Select(AssetType::WIRE)).required(),
            FieldSpec::new("model", "Model", FieldKind::Text),
            FieldSpec::new("manufacturer", "Manufacturer", FieldKind::Text),
            FieldSpec::new("serialNumber", "Serial number", FieldKind::Text),
            FieldSpec::new("location", "Location", FieldKind::Text),
            FieldSpec::new("acquiredAt", "Acquired on", FieldKind::Date),
            FieldSpec::new("warrantyEndDate", "Warranty ends", FieldKind::Date),
            FieldSpec::new("status", "Status", FieldKind::Text),
            id_field("managerId", "Manager id"),
            FieldSpec::new("notes", "Notes", FieldKind::Multiline),
        ]
    }

    fn initial_values(&self) -> FormValues {
        self.baseline.values().clone()
    }

    fn project(&self, values: &FormValues) -> Result<AssetUpdateRequest, ValidationError> {
        let b = &self.baseline;
        Ok(AssetUpdateRequest {
            name: b.changed(values, "name"),
            asset_type: b.changed_parse(values, "assetType")?,
            model: b.changed(values, "model"),
            manufacturer: b.changed(values, "manufacturer"),
            serial_number: b.changed(values, "serialNumber"),
            location: b.changed(values, "location"),
            acquired_at: b.changed_parse(values, "acquiredAt")?,
            warranty_end_date: b.changed_parse(values, "warrantyEndDate")?,
            status: b.changed(values, "status"),
            manager_id: b.changed_parse(values, "managerId")?,
            notes: b.changed(values, "notes"),
        })
    }

    fn success_message(&self) -> String {
        "Asset updated".to_string()
    }

    fn navigation_target(&self, response: &Asset) -> String {
        detail_route(Asset::PATH, response.id())
    }
}

fn account_baseline(user: &User) -> Baseline {
    Baseline::from_pairs([
        ("name", Some(user.name.clone())),
        ("phoneNumber", user.phone_number.clone()),
        ("position", user.position.clone()),
        ("departmentId", None),
    ])
}

fn account_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("name", "Name", FieldKind::Text)
            .required()
            .rule(Rule::MaxLength(NAME_MAX)),
        FieldSpec::new("phoneNumber", "Phone number", FieldKind::Text)
            .rule(Rule::MaxLength(PHONE_MAX)),
        FieldSpec::new("position", "Position", FieldKind::Text).rule(Rule::MaxLength(NAME_MAX)),
        id_field("departmentId", "Department id"),
    ]
}

fn account_update(b: &Baseline, values: &FormValues) -> Result<UserUpdateRequest, ValidationError> {
    Ok(UserUpdateRequest {
        name: b.changed(values, "name"),
        phone_number: b.changed(values, "phoneNumber"),
        position: b.changed(values, "position"),
        department_id: b.changed_parse(values, "departmentId")?,
    })
}

/// Account edited by an administrator
#[derive(Debug, Clone)]
pub struct UserEditForm {
    baseline: Baseline,
}

impl Editable for User {
    type EditForm = UserEditForm;

    fn edit_form(&self) -> UserEditForm {
        UserEditForm {
            baseline: account_baseline(self),
        }
    }
}

impl FormSchema for UserEditForm {
    type Request = UserUpdateRequest;
    type Response = User;

    fn fields(&self) -> Vec<FieldSpec> {
        account_fields()
    }

    fn initial_values(&self) -> FormValues {
        self.baseline.values().clone()
    }

    fn project(&self, values: &FormValues) -> Result<UserUpdateRequest, ValidationError> {
        account_update(&self.baseline, values)
    }

    fn success_message(&self) -> String {
        "User updated".to_string()
    }

    fn navigation_target(&self, _response: &User) -> String {
        User::PATH.to_string()
    }
}

/// The signed-in user's own account (`PUT /profile`)
#[derive(Debug, Clone)]
pub struct ProfileForm {
    baseline: Baseline,
}

impl ProfileForm {
    pub fn new(user: &User) -> Self {
        Self {
            baseline: account_baseline(user),
        }
    }
}

impl FormSchema for ProfileForm {
    type Request = UserUpdateRequest;
    type Response = User;

    fn fields(&self) -> Vec<FieldSpec> {
        account_fields()
    }

    fn initial_values(&self) -> FormValues {
        self.baseline.values().clone()
    }

    fn project(&self, values: &FormValues) -> Result<UserUpdateRequest, ValidationError> {
        account_update(&self.baseline, values)
    }

    fn success_message(&self) -> String {
        "Profile updated".to_string()
    }

    fn navigation_target(&self, _response: &User) -> String {
        "/profile".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormController, SubmitOutcome};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn project() -> Project {
        serde_json::from_value(json!({
            "id": 26,
            "code": "PJ-26",
            "name": "Portal renewal",
            "projectType": "SI",
            "status": "IN_PROGRESS",
            "startDate": "2024-03-01",
            "budget": 120000000,
            "createdAt": "2024-02-20T09:00:00"
        }))
        .unwrap()
    }

    fn partner() -> Partner {
        serde_json::from_value(json!({
            "id": 31,
            "name": "Acme Systems",
            "businessNumber": "1234567890",
            "isClosed": false,
            "createdAt": "2024-01-10T09:00:00"
        }))
        .unwrap()
    }

    fn user() -> User {
        serde_json::from_value(json!({
            "id": 4,
            "email": "kim@example.com",
            "name": "Kim",
            "position": "Manager"
        }))
        .unwrap()
    }

    #[test]
    fn test_edit_form_opens_with_stored_values() {
        let form = FormController::new(project().edit_form());
        let state = form.state();
        assert_eq!(state.value("name"), "Portal renewal");
        assert_eq!(state.value("projectType"), "SI");
        assert_eq!(state.value("startDate"), "2024-03-01");
        assert_eq!(state.value("budget"), "120000000");
        assert_eq!(state.value("endDate"), "");
    }

    #[test]
    fn test_untouched_edit_projects_to_empty_update() {
        let schema = project().edit_form();
        let request = schema.project(&schema.initial_values()).unwrap();
        assert_eq!(serde_json::to_string(&request).unwrap(), "{}");
    }

    #[test]
    fn test_edit_projection_sends_only_changed_fields() {
        let schema = project().edit_form();
        let mut values = schema.initial_values();
        values.insert("name".to_string(), "Portal v2".to_string());
        values.insert("budget".to_string(), "130000000".to_string());
        values.insert("description".to_string(), "   ".to_string());

        assert_eq!(
            serde_json::to_value(schema.project(&values).unwrap()).unwrap(),
            json!({ "name": "Portal v2", "budget": 130000000 })
        );
    }

    #[test]
    fn test_partner_active_flag_is_inverse_of_closed() {
        let schema = partner().edit_form();
        assert_eq!(schema.initial_values()["isActive"], "true");

        let mut values = schema.initial_values();
        values.insert("isActive".to_string(), "False".to_string());
        let request = schema.project(&values).unwrap();
        assert_eq!(request.is_active, Some(false));
        assert_eq!(request.name, None);
    }

    #[tokio::test]
    async fn test_invalid_edit_is_not_submitted() {
        let form = FormController::new(partner().edit_form());
        assert!(form.set_value("businessNumber", "123-45-67890").is_err());

        let calls = AtomicUsize::new(0);
        let outcome = form
            .submit(|_| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(partner())
            })
            .await;

        match outcome {
            SubmitOutcome::Invalid(errors) => {
                assert_eq!(
                    errors.get("businessNumber").map(String::as_str),
                    Some("Business number must be 10 to 12 digits")
                );
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(form.state().value("businessNumber"), "123-45-67890");
    }

    #[test]
    fn test_non_finite_man_days_fail_validation() {
        let sr: ServiceRequest = serde_json::from_value(json!({
            "id": 42,
            "srNumber": "SR-42",
            "title": "Export report",
            "description": "Monthly export",
            "srType": "DEVELOPMENT",
            "status": "APPROVAL_REQUESTED",
            "priority": "MEDIUM",
            "projectId": 26,
            "createdAt": "2024-03-02T10:00:00"
        }))
        .unwrap();

        let form = FormController::new(sr.edit_form());
        assert!(form.set_value("estimatedManday", "NaN").is_err());
        assert!(!form.is_valid());
    }

    #[test]
    fn test_account_forms_share_rules_but_not_targets() {
        let user = user();
        let profile = ProfileForm::new(&user);
        let admin = user.edit_form();

        assert_eq!(profile.navigation_target(&user), "/profile");
        assert_eq!(admin.navigation_target(&user), "/users");

        let mut values = profile.initial_values();
        values.insert("phoneNumber".to_string(), "010-1234-5678".to_string());
        assert_eq!(
            serde_json::to_value(profile.project(&values).unwrap()).unwrap(),
            json!({ "phoneNumber": "010-1234-5678" })
        );

        let position = account_fields().into_iter().find(|f| f.name == "position").unwrap();
        assert!(position.validate(&"x".repeat(NAME_MAX + 1)).is_err());
    }
}
