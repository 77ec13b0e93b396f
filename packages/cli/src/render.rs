// ABOUTME: Table rows and detail views for every ITMS entity
// ABOUTME: Enums are shown with their human labels, absent values with a dash

use itms_core::{
    Approval, Asset, Incident, Issue, Partner, Project, Release, ServiceRequest, Specification,
    User,
};

use crate::output::{cell, format_datetime, truncate};

/// How an entity appears in list tables and detail views
pub trait Tabular {
    fn headers() -> Vec<&'static str>;

    fn row(&self) -> Vec<String>;

    /// Heading of the detail view
    fn title(&self) -> String;

    fn details(&self) -> Vec<(&'static str, String)>;
}

fn yes_no(value: Option<bool>) -> String {
    match value {
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
        None => cell::<&str>(None),
    }
}

impl Tabular for Project {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Code", "Name", "Type", "Status", "Company", "PM", "Period"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.code.clone(),
            truncate(&self.name, 30),
            self.project_type.to_string(),
            self.status.label().to_string(),
            cell(self.company_name.as_deref()),
            cell(self.pm_name.as_deref()),
            format!("{} ~ {}", self.start_date, cell(self.end_date)),
        ]
    }

    fn title(&self) -> String {
        format!("Project {} · {}", self.code, self.name)
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Code", self.code.clone()),
            ("Name", self.name.clone()),
            ("Type", self.project_type.label().to_string()),
            ("Status", self.status.label().to_string()),
            ("Start date", self.start_date.to_string()),
            ("End date", cell(self.end_date)),
            ("Company", cell(self.company_name.as_deref())),
            ("PM", cell(self.pm_name.as_deref())),
            ("Budget", cell(self.budget)),
            ("Description", cell(self.description.as_deref())),
            ("Created", format_datetime(&self.created_at)),
            ("Updated", cell(self.updated_at.as_ref().map(format_datetime))),
        ]
    }
}

impl Tabular for ServiceRequest {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Number", "Title", "Type", "Priority", "Status", "Project", "Requestor"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.sr_number.clone(),
            truncate(&self.title, 30),
            self.sr_type.label().to_string(),
            self.priority.label().to_string(),
            self.status.label().to_string(),
            cell(self.project_name.as_deref()),
            cell(self.requestor_name.as_deref()),
        ]
    }

    fn title(&self) -> String {
        format!("SR {} · {}", self.sr_number, self.title)
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Number", self.sr_number.clone()),
            ("Title", self.title.clone()),
            ("Type", self.sr_type.label().to_string()),
            ("Priority", self.priority.label().to_string()),
            ("Status", self.status.label().to_string()),
            ("Project", cell(self.project_name.as_deref())),
            ("Requestor", cell(self.requestor_name.as_deref())),
            ("Expected", cell(self.expected_date)),
            ("Completed", cell(self.completed_date)),
            ("Estimated man-days", cell(self.estimated_manday)),
            ("Actual man-days", cell(self.actual_manday)),
            ("Description", self.description.clone()),
            ("Created", format_datetime(&self.created_at)),
        ]
    }
}

impl Tabular for Specification {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Number", "Type", "Category", "Status", "SR", "FP", "Man-days", "Assignee"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.spec_number.clone(),
            self.spec_type.label().to_string(),
            self.spec_category.label().to_string(),
            self.status.label().to_string(),
            cell(self.sr_number.as_deref()),
            cell(self.function_point),
            cell(self.man_day),
            cell(self.assignee_name.as_deref()),
        ]
    }

    fn title(&self) -> String {
        format!("Specification {}", self.spec_number)
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Number", self.spec_number.clone()),
            ("Type", self.spec_type.label().to_string()),
            ("Category", self.spec_category.label().to_string()),
            ("Status", self.status.label().to_string()),
            ("SR", format!("{} {}", self.sr_id, cell(self.sr_title.as_deref()))),
            ("Function points", cell(self.function_point)),
            ("Man-days", cell(self.man_day)),
            ("Assignee", cell(self.assignee_name.as_deref())),
            ("Reviewer", cell(self.reviewer_name.as_deref())),
            ("Reviewed", cell(self.reviewed_at.as_ref().map(format_datetime))),
            ("Created", format_datetime(&self.created_at)),
        ]
    }
}

impl Tabular for Approval {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Number", "Type", "Target", "Status", "Step", "Requester", "Requested"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(self.approval_number.as_deref()),
            self.approval_type.label().to_string(),
            self.target_id.to_string(),
            self.status.label().to_string(),
            match (self.current_step, self.total_steps) {
                (Some(current), Some(total)) => format!("{}/{}", current, total),
                _ => cell::<&str>(None),
            },
            cell(self.requester_name.as_deref()),
            cell(self.requested_at.as_ref().map(format_datetime)),
        ]
    }

    fn title(&self) -> String {
        let number = self
            .approval_number
            .clone()
            .unwrap_or_else(|| self.id.to_string());
        format!("{} #{}", self.approval_type.label(), number)
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let mut details = vec![
            ("ID", self.id.to_string()),
            ("Type", self.approval_type.label().to_string()),
            ("Target", self.target_id.to_string()),
            ("Status", self.status.label().to_string()),
            ("Requester", cell(self.requester_name.as_deref())),
            ("Requested", cell(self.requested_at.as_ref().map(format_datetime))),
            ("Completed", cell(self.completed_at.as_ref().map(format_datetime))),
        ];
        for line in &self.approval_lines {
            details.push((
                "Approver",
                format!(
                    "{}. {} · {}{}",
                    line.step_order,
                    cell(line.approver_name.as_deref()),
                    line.status.label(),
                    line.comment
                        .as_deref()
                        .map(|c| format!(" · {}", c))
                        .unwrap_or_default()
                ),
            ));
        }
        details
    }
}

impl Tabular for Issue {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Title", "Type", "Priority", "Status", "Project", "Assignee", "Due"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            truncate(&self.title, 30),
            cell(self.issue_type.map(|t| t.label())),
            cell(self.priority.map(|p| p.label())),
            self.status.label().to_string(),
            cell(self.project_name.as_deref()),
            cell(self.assignee_name.as_deref()),
            cell(self.due_date),
        ]
    }

    fn title(&self) -> String {
        format!("Issue #{} · {}", self.id, self.title)
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Title", self.title.clone()),
            ("Type", cell(self.issue_type.map(|t| t.label()))),
            ("Priority", cell(self.priority.map(|p| p.label()))),
            ("Status", self.status.label().to_string()),
            ("Project", cell(self.project_name.as_deref())),
            ("Reporter", cell(self.reporter_name.as_deref())),
            ("Assignee", cell(self.assignee_name.as_deref())),
            ("Release", cell(self.release_name.as_deref())),
            ("Due", cell(self.due_date)),
            ("Resolved", cell(self.resolved_at.as_ref().map(format_datetime))),
            ("Description", cell(self.description.as_deref())),
            ("Created", format_datetime(&self.created_at)),
        ]
    }
}

impl Tabular for Release {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Version", "Name", "Status", "Project", "Planned", "Released", "Issues"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(self.version.as_deref()),
            truncate(&self.name, 30),
            self.status.label().to_string(),
            cell(self.project_name.as_deref()),
            cell(self.release_date),
            cell(self.actual_release_date),
            self.issue_count.to_string(),
        ]
    }

    fn title(&self) -> String {
        format!("Release {}", self.name)
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Version", cell(self.version.as_deref())),
            ("Name", self.name.clone()),
            ("Status", self.status.label().to_string()),
            ("Project", cell(self.project_name.as_deref())),
            ("Planned", cell(self.release_date)),
            ("Released", cell(self.actual_release_date)),
            ("Issues", self.issue_count.to_string()),
            ("Description", cell(self.description.as_deref())),
            ("Created", format_datetime(&self.created_at)),
        ]
    }
}

impl Tabular for Incident {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Title", "Severity", "Status", "Type", "System", "Assignee", "Occurred"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            truncate(&self.title, 30),
            self.severity.label().to_string(),
            self.status.label().to_string(),
            cell(self.incident_type.map(|t| t.label())),
            cell(self.system_type.map(|t| t.label())),
            cell(self.assignee_name.as_deref()),
            cell(self.occurred_at.as_ref().map(format_datetime)),
        ]
    }

    fn title(&self) -> String {
        format!("Incident #{} · {}", self.id, self.title)
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Title", self.title.clone()),
            ("Severity", self.severity.label().to_string()),
            ("Status", self.status.label().to_string()),
            ("Type", cell(self.incident_type.map(|t| t.label()))),
            ("System", cell(self.system_type.map(|t| t.label()))),
            ("Project", cell(self.project_name.as_deref())),
            ("Reporter", cell(self.reporter_name.as_deref())),
            ("Assignee", cell(self.assignee_name.as_deref())),
            ("Occurred", cell(self.occurred_at.as_ref().map(format_datetime))),
            ("Resolved", cell(self.resolved_at.as_ref().map(format_datetime))),
            ("Root cause", cell(self.root_cause.as_deref())),
            ("Solution", cell(self.solution.as_deref())),
            ("Description", cell(self.description.as_deref())),
        ]
    }
}

impl Tabular for Partner {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Code", "Name", "Business no.", "CEO", "Manager", "PM", "Closed"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(self.code.as_deref()),
            truncate(&self.name, 30),
            self.business_number.clone(),
            cell(self.ceo_name.as_deref()),
            cell(self.manager_name.as_deref()),
            cell(self.pm_name.as_deref()),
            yes_no(self.is_closed),
        ]
    }

    fn title(&self) -> String {
        format!("Partner {}", self.name)
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Code", cell(self.code.as_deref())),
            ("Name", self.name.clone()),
            ("Business no.", self.business_number.clone()),
            ("CEO", cell(self.ceo_name.as_deref())),
            ("Manager", cell(self.manager_name.as_deref())),
            ("PM", cell(self.pm_name.as_deref())),
            ("Closed", yes_no(self.is_closed)),
            ("Closed on", cell(self.closed_at)),
            ("Created", format_datetime(&self.created_at)),
        ]
    }
}

impl Tabular for Asset {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Number", "Name", "Type", "Status", "Location", "Manager", "Warranty"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            cell(self.asset_number.as_deref()),
            truncate(&self.name, 30),
            self.asset_type.label().to_string(),
            self.status.clone(),
            cell(self.location.as_deref()),
            cell(self.manager_name.as_deref()),
            cell(self.warranty_end_date),
        ]
    }

    fn title(&self) -> String {
        format!("Asset {}", self.name)
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Number", cell(self.asset_number.as_deref())),
            ("Name", self.name.clone()),
            ("Type", self.asset_type.label().to_string()),
            ("Status", self.status.clone()),
            ("Model", cell(self.model.as_deref())),
            ("Manufacturer", cell(self.manufacturer.as_deref())),
            ("Serial number", cell(self.serial_number.as_deref())),
            ("Location", cell(self.location.as_deref())),
            ("Acquired", cell(self.acquired_at)),
            ("Warranty ends", cell(self.warranty_end_date)),
            ("Expired", yes_no(self.is_expired)),
            ("Manager", cell(self.manager_name.as_deref())),
            ("Notes", cell(self.notes.as_deref())),
        ]
    }
}

impl Tabular for User {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Email", "Name", "Company", "Department", "Roles", "Active", "Last login"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.email.clone(),
            self.name.clone(),
            cell(self.company_name.as_deref()),
            cell(self.department_name.as_deref()),
            self.roles.join(", "),
            yes_no(self.is_active),
            cell(self.last_login_at.as_ref().map(format_datetime)),
        ]
    }

    fn title(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Email", self.email.clone()),
            ("Name", self.name.clone()),
            ("Phone", cell(self.phone_number.as_deref())),
            ("Company", cell(self.company_name.as_deref())),
            ("Department", cell(self.department_name.as_deref())),
            ("Employee no.", cell(self.employee_number.as_deref())),
            ("Position", cell(self.position.as_deref())),
            ("Roles", self.roles.join(", ")),
            ("Active", yes_no(self.is_active)),
            ("Approved", yes_no(self.is_approved)),
            ("Locked", yes_no(self.is_locked)),
            ("Must change password", yes_no(self.password_change_required)),
            ("Last login", cell(self.last_login_at.as_ref().map(format_datetime))),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::EMPTY_CELL;

    #[test]
    fn test_project_row_matches_headers() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "id": 26,
            "code": "PJ-26",
            "name": "Portal renewal",
            "projectType": "SI",
            "status": "IN_PROGRESS",
            "startDate": "2024-03-01",
            "createdAt": "2024-02-20T09:30:00"
        }))
        .unwrap();

        let row = project.row();
        assert_eq!(row.len(), Project::headers().len());
        assert_eq!(row[4], "In progress");
        assert_eq!(row[5], EMPTY_CELL);
        assert_eq!(row[7], format!("2024-03-01 ~ {}", EMPTY_CELL));
    }

    #[test]
    fn test_user_row_joins_roles() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 5,
            "email": "kim@example.com",
            "name": "Kim",
            "roles": ["ROLE_ADMIN", "ROLE_PM"],
            "isActive": true
        }))
        .unwrap();

        let row = user.row();
        assert_eq!(row.len(), User::headers().len());
        assert_eq!(row[5], "ROLE_ADMIN, ROLE_PM");
        assert_eq!(row[6], "Yes");
    }
}
