use serde::Serialize;

use crate::query::MonthKey;

/// One point of a single-series trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub period: MonthKey,
    /// Axis label, e.g. `Jan`.
    pub label: &'static str,
    pub value: f64,
}

/// Operations dashboard values. Rates are percentages (0-100).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationalSummary {
    /// Resource hours used over hours available, across all periods.
    /// Falls back to project throughput when no capacity was recorded.
    pub utilization_rate: f64,
    /// Completed over total projects in the most recent period.
    pub project_completion_rate: f64,
    /// Completed over total projects across all periods.
    pub overall_completion_rate: f64,
    pub projects_completed: f64,
    pub projects_total: f64,
    pub resource_hours_used: f64,
    pub resource_hours_available: f64,
    /// Financial expenses over completed projects (currency).
    pub cost_per_completed_project: f64,
    /// Financial revenue over resource hours used (currency).
    pub revenue_per_resource_hour: f64,
    pub completion_trend: Vec<TrendPoint>,
    pub utilization_trend: Vec<TrendPoint>,
    pub period_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadTrendPoint {
    pub period: MonthKey,
    pub label: &'static str,
    pub leads: f64,
    pub conversion_rate: f64,
}

/// Sales & marketing dashboard values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesMarketingSummary {
    /// Sum of leads over all periods.
    pub lead_generation: f64,
    /// Average of per-period conversion rates (percent).
    pub conversion_rate: f64,
    /// Pipeline value of the most recent period (currency).
    pub sales_pipeline_value: f64,
    /// Average of per-period values (currency).
    pub avg_revenue_per_client: f64,
    /// Average of per-period ROI multiples. May be negative.
    pub marketing_roi: f64,
    /// Total spend over total leads (currency).
    pub cost_per_lead: f64,
    pub total_marketing_spend: f64,
    /// Leads times conversion rate, summed over periods.
    pub deals_closed: f64,
    pub lead_trend: Vec<LeadTrendPoint>,
    pub period_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialTrendPoint {
    pub period: MonthKey,
    pub label: &'static str,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
}

/// Financial dashboard values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub total_cost_of_goods_sold: f64,
    /// Revenue minus cost of goods sold and expenses. May be negative.
    pub net_profit: f64,
    /// Net profit over revenue, percent in -100..=100.
    pub profit_margin: f64,
    /// Revenue less cost of goods sold over revenue, percent in 0..=100.
    pub gross_margin: f64,
    /// Inflows minus outflows over all periods. May be negative.
    pub net_cash_flow: f64,
    /// Latest period balance.
    pub accounts_receivable: f64,
    /// Latest period balance.
    pub accounts_payable: f64,
    /// Latest period current assets over current liabilities.
    pub current_ratio: f64,
    /// Latest over previous period revenue change, percent. May be negative.
    pub revenue_growth: f64,
    pub trend: Vec<FinancialTrendPoint>,
    pub period_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipTrendPoint {
    pub period: MonthKey,
    pub label: &'static str,
    pub total_members: f64,
    pub new_members: f64,
    pub members_lost: f64,
}

/// Membership dashboard values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipSummary {
    /// Member count of the most recent period.
    pub total_members: f64,
    pub new_members: f64,
    pub members_lost: f64,
    /// New minus lost members. May be negative.
    pub net_member_growth: f64,
    pub retention_rate: f64,
    pub churn_rate: f64,
    pub csat: f64,
    /// Average NPS, -100..=100.
    pub nps: f64,
    pub trend: Vec<MembershipTrendPoint>,
    pub period_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubscriptionCounts {
    pub free: u64,
    pub paid: u64,
}

/// Cross-tenant overview for platform admins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSummary {
    pub total_companies: u64,
    pub total_users: u64,
    pub subscriptions: SubscriptionCounts,
    pub active_subscriptions: u64,
}
