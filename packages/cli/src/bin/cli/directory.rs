// ABOUTME: Dashboard, lookup lists and the entity-specific actions of approvals and users
// ABOUTME: Approvals add approve/reject; users add password reset and activation toggle

use clap::{Subcommand, ValueEnum};
use comfy_table::Cell;
use inquire::{Password, PasswordDisplayMode};

use itms_cli::output::{self, cell, new_table};
use itms_client::ItmsClient;
use itms_controllers::forms::{ApprovalForm, UserForm};
use itms_controllers::Rule;
use itms_core::models::approval::{ApprovalDecision, ApprovalProcessRequest};
use itms_core::models::user::PasswordResetRequest;
use itms_core::{Approval, User};

use super::resources::{self, EntityCommands};

const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 20;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl From<Decision> for ApprovalDecision {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approve => ApprovalDecision::Approved,
            Decision::Reject => ApprovalDecision::Rejected,
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ApprovalCommands {
    #[command(flatten)]
    Common(EntityCommands),
    /// Approve or reject the current step
    Process {
        id: i64,
        #[arg(value_enum)]
        decision: Decision,
        /// Comment recorded with the decision
        #[arg(short, long)]
        comment: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum UserCommands {
    #[command(flatten)]
    Common(EntityCommands),
    /// Set a new password for a user
    ResetPassword { id: i64 },
    /// Activate or deactivate a user
    ToggleStatus { id: i64 },
}

pub async fn approvals(client: &ItmsClient, command: ApprovalCommands) -> anyhow::Result<()> {
    match command {
        ApprovalCommands::Common(command) => {
            resources::run::<Approval, _>(client, command, ApprovalForm).await
        }
        ApprovalCommands::Process {
            id,
            decision,
            comment,
        } => {
            let request = ApprovalProcessRequest {
                status: decision.into(),
                comment: comment.filter(|c| !c.trim().is_empty()),
            };
            let approval = client.approvals().process(id, &request).await?;
            output::success(&format!(
                "Approval {} is now {}",
                id,
                approval.status.label()
            ));
            Ok(())
        }
    }
}

pub async fn users(client: &ItmsClient, command: UserCommands) -> anyhow::Result<()> {
    match command {
        UserCommands::Common(command) => resources::run::<User, _>(client, command, UserForm).await,
        UserCommands::ResetPassword { id } => {
            let new_password = Password::new("New password:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .with_custom_confirmation_message("Confirm password:")
                .with_custom_confirmation_error_message("Passwords do not match")
                .prompt()?;
            for rule in [
                Rule::MinLength(PASSWORD_MIN),
                Rule::MaxLength(PASSWORD_MAX),
            ] {
                rule.check("Password", &new_password)?;
            }

            client
                .users()
                .reset_password(id, &PasswordResetRequest { new_password })
                .await?;
            output::success(&format!("Password of user {} reset", id));
            Ok(())
        }
        UserCommands::ToggleStatus { id } => {
            client.users().toggle_status(id).await?;
            let user = client.users().get(id).await?;
            let state = match user.is_active {
                Some(false) => "inactive",
                _ => "active",
            };
            output::success(&format!("User {} is now {}", id, state));
            Ok(())
        }
    }
}

/// Value with its trend, e.g. `12 (+8.5%)`
fn with_trend(value: impl std::fmt::Display, trend: f64) -> String {
    if trend == 0.0 {
        value.to_string()
    } else {
        format!("{} ({:+.1}%)", value, trend)
    }
}

pub async fn dashboard(client: &ItmsClient) -> anyhow::Result<()> {
    let stats = client.directory().dashboard_stats().await?;

    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    let rows = [
        ("Active projects", with_trend(stats.active_projects, stats.active_projects_trend)),
        (
            "SRs this month",
            with_trend(stats.sr_requests_this_month, stats.sr_requests_trend),
        ),
        (
            "Pending approvals",
            with_trend(stats.pending_approvals, stats.pending_approvals_trend),
        ),
        (
            "Completion rate",
            with_trend(format!("{:.1}%", stats.completion_rate), stats.completion_rate_trend),
        ),
        ("Users", stats.total_users.to_string()),
        ("Issues", stats.total_issues.to_string()),
        ("Incidents", stats.total_incidents.to_string()),
        ("Assets", stats.total_assets.to_string()),
    ];
    for (metric, value) in rows {
        table.add_row(vec![Cell::new(metric), Cell::new(value)]);
    }
    println!("{}", table);
    Ok(())
}

pub async fn companies(client: &ItmsClient, partners: bool) -> anyhow::Result<()> {
    let mut table = new_table();
    table.set_header(vec!["ID", "Name", "Business no.", "CEO"]);

    if partners {
        for partner in client.directory().partners_for_company_selection().await? {
            table.add_row(vec![
                partner.id.to_string(),
                partner.name,
                partner.business_number,
                cell(partner.ceo_name),
            ]);
        }
    } else {
        for company in client.directory().companies().await? {
            table.add_row(vec![
                company.id.to_string(),
                company.name,
                cell(company.business_number),
                cell(company.ceo_name),
            ]);
        }
    }
    println!("{}", table);
    Ok(())
}
