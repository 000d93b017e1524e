use serde::{Deserialize, Serialize};

use crate::query::MonthKey;

/// One month of financial figures for a company. Currency fields share the
/// company's reporting currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    pub period: MonthKey,
    pub company_id: String,
    #[serde(default)]
    pub revenue: f64,
    /// Operating expenses, excluding cost of goods sold.
    #[serde(default)]
    pub expenses: f64,
    #[serde(default)]
    pub cost_of_goods_sold: f64,
    #[serde(default)]
    pub cash_inflow: f64,
    #[serde(default)]
    pub cash_outflow: f64,
    /// Balance at period end.
    #[serde(default)]
    pub accounts_receivable: f64,
    /// Balance at period end.
    #[serde(default)]
    pub accounts_payable: f64,
    #[serde(default)]
    pub current_assets: f64,
    #[serde(default)]
    pub current_liabilities: f64,
}

/// One month of project throughput and resource capacity.
///
/// Capacity hours are optional: companies that don't track time leave them
/// out, and utilization is then derived from project throughput.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationsRecord {
    pub period: MonthKey,
    pub company_id: String,
    #[serde(default)]
    pub projects_completed: f64,
    #[serde(default)]
    pub projects_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_hours_used: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_hours_available: Option<f64>,
}

/// One month of sales and marketing figures, as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesMarketingRecord {
    pub period: MonthKey,
    pub company_id: String,
    #[serde(default)]
    pub lead_generation: f64,
    /// Percent of leads converted, 0-100.
    #[serde(default)]
    pub conversion_rate: f64,
    #[serde(default)]
    pub sales_pipeline_value: f64,
    #[serde(default)]
    pub avg_revenue_per_client: f64,
    /// Return multiple on marketing spend; negative when spend exceeded return.
    #[serde(default)]
    pub marketing_roi: f64,
    #[serde(default)]
    pub cost_per_lead: f64,
}

/// One month of membership figures, as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRecord {
    pub period: MonthKey,
    pub company_id: String,
    #[serde(default)]
    pub total_members: f64,
    #[serde(default)]
    pub new_members: f64,
    #[serde(default)]
    pub members_lost: f64,
    #[serde(default)]
    pub retention_rate: f64,
    #[serde(default)]
    pub churn_rate: f64,
    #[serde(default)]
    pub csat: f64,
    /// Net promoter score, -100 to 100.
    #[serde(default)]
    pub nps: f64,
}

/// A metric category with its own record shape and aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    Financial,
    Operations,
    SalesMarketing,
    Membership,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Financial,
        Domain::Operations,
        Domain::SalesMarketing,
        Domain::Membership,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "financial" | "finance" => Some(Domain::Financial),
            "operations" | "ops" => Some(Domain::Operations),
            "sales-marketing" | "sales_marketing" | "sales" => Some(Domain::SalesMarketing),
            "membership" => Some(Domain::Membership),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Financial => "financial",
            Domain::Operations => "operations",
            Domain::SalesMarketing => "sales-marketing",
            Domain::Membership => "membership",
        }
    }

    /// Storage table holding this domain's records.
    pub fn table(&self) -> &'static str {
        match self {
            Domain::Financial => "financial_metrics",
            Domain::Operations => "operations_metrics",
            Domain::SalesMarketing => "sales_marketing_metrics",
            Domain::Membership => "membership_metrics",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
