// ABOUTME: Headline counters shown on the dashboard

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub active_projects: u32,
    pub sr_requests_this_month: u32,
    pub pending_approvals: u32,
    /// Percentage, 0 to 100
    pub completion_rate: f64,
    pub total_users: u32,
    pub total_issues: u32,
    pub total_incidents: u32,
    pub total_assets: u32,
    pub active_projects_trend: f64,
    pub sr_requests_trend: f64,
    pub pending_approvals_trend: f64,
    pub completion_rate_trend: f64,
}
