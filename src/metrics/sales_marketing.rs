use crate::metrics::{
    clamp_pct, finite, mean_by, safe_div, sum_by, trailing, LeadTrendPoint, SalesMarketingSummary,
    DEFAULT_TREND_PERIODS,
};
use crate::records::{chronological, SalesMarketingRecord};

/// Summarize a company's sales & marketing records.
///
/// Per-field policy:
/// - `leadGeneration`, `dealsClosed`, `totalMarketingSpend`: summed
/// - `conversionRate`, `avgRevenuePerClient`, `marketingRoi`: averaged per period
/// - `salesPipelineValue`: latest period, since each month reports the open pipeline
/// - `costPerLead`: total spend over total leads
pub fn compute_sales_marketing_stats(records: &[SalesMarketingRecord]) -> SalesMarketingSummary {
    if records.is_empty() {
        return SalesMarketingSummary::default();
    }

    let sorted = chronological(records);

    // Lead counts and per-lead cost cannot be negative; a negative entry
    // counts as zero.
    let leads = |r: &SalesMarketingRecord| finite(r.lead_generation).max(0.0);
    let cost = |r: &SalesMarketingRecord| finite(r.cost_per_lead).max(0.0);

    let lead_generation = sum_by(&sorted, leads);
    let total_marketing_spend = sum_by(&sorted, |r| leads(r) * cost(r));
    let deals_closed = sum_by(&sorted, |r| leads(r) * clamp_pct(r.conversion_rate) / 100.0);

    let lead_trend = trailing(&sorted, DEFAULT_TREND_PERIODS)
        .iter()
        .map(|&r| LeadTrendPoint {
            period: r.period,
            label: r.period.label(),
            leads: leads(r),
            conversion_rate: clamp_pct(r.conversion_rate),
        })
        .collect();

    SalesMarketingSummary {
        lead_generation,
        conversion_rate: clamp_pct(mean_by(&sorted, |r| clamp_pct(r.conversion_rate))),
        sales_pipeline_value: sorted
            .last()
            .map_or(0.0, |r| finite(r.sales_pipeline_value).max(0.0)),
        avg_revenue_per_client: mean_by(&sorted, |r| r.avg_revenue_per_client),
        marketing_roi: mean_by(&sorted, |r| r.marketing_roi),
        cost_per_lead: safe_div(total_marketing_spend, lead_generation).max(0.0),
        total_marketing_spend,
        deals_closed,
        lead_trend,
        period_count: sorted.len(),
    }
}
