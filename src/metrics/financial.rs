use crate::metrics::{
    clamp_signed_pct, finite, percent, safe_div, sum_by, trailing, FinancialSummary,
    FinancialTrendPoint, DEFAULT_TREND_PERIODS,
};
use crate::records::{chronological, FinancialRecord};

/// Summarize a company's financial records.
///
/// Flows (revenue, expenses, cash) are summed over every period; balances
/// (receivables, payables, current ratio) come from the latest period.
pub fn compute_financial_stats(records: &[FinancialRecord]) -> FinancialSummary {
    if records.is_empty() {
        return FinancialSummary::default();
    }

    let sorted = chronological(records);

    let total_revenue = sum_by(&sorted, |r| r.revenue);
    let total_expenses = sum_by(&sorted, |r| r.expenses);
    let total_cost_of_goods_sold = sum_by(&sorted, |r| r.cost_of_goods_sold);
    let net_profit = finite(total_revenue - total_cost_of_goods_sold - total_expenses);
    let net_cash_flow = sum_by(&sorted, |r| r.cash_inflow - r.cash_outflow);

    let (accounts_receivable, accounts_payable, current_ratio) = match sorted.last() {
        Some(latest) => (
            finite(latest.accounts_receivable),
            finite(latest.accounts_payable),
            safe_div(latest.current_assets, latest.current_liabilities).max(0.0),
        ),
        None => (0.0, 0.0, 0.0),
    };

    let revenue_growth = match sorted.as_slice() {
        [.., previous, latest] => clamp_growth(
            safe_div(latest.revenue - previous.revenue, previous.revenue.abs()) * 100.0,
        ),
        _ => 0.0,
    };

    let trend = trailing(&sorted, DEFAULT_TREND_PERIODS)
        .iter()
        .map(|r| FinancialTrendPoint {
            period: r.period,
            label: r.period.label(),
            revenue: finite(r.revenue),
            expenses: finite(r.expenses + r.cost_of_goods_sold),
            profit: finite(r.revenue - r.cost_of_goods_sold - r.expenses),
        })
        .collect();

    FinancialSummary {
        total_revenue,
        total_expenses,
        total_cost_of_goods_sold,
        net_profit,
        profit_margin: clamp_signed_pct(safe_div(net_profit, total_revenue) * 100.0),
        gross_margin: percent(total_revenue - total_cost_of_goods_sold, total_revenue),
        net_cash_flow,
        accounts_receivable,
        accounts_payable,
        current_ratio,
        revenue_growth,
        trend,
        period_count: sorted.len(),
    }
}

// Growth is unbounded above (a tripling is +200%) but can't fall below -100%
// for non-negative revenue.
fn clamp_growth(x: f64) -> f64 {
    finite(x).max(-100.0)
}
