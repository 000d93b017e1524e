use std::collections::HashSet;

use crate::metrics::{
    finite, percent, safe_div, sum_by, trailing, OperationalSummary, TrendPoint,
    DEFAULT_TREND_PERIODS,
};
use crate::query::MonthKey;
use crate::records::{chronological, FinancialRecord, OperationsRecord};

/// Summarize a company's operations records.
///
/// `financial` supplies the cost and revenue side of the efficiency ratios;
/// only financial records for months that also have an operations record
/// are counted, so the two sides cover the same window. An empty financial
/// slice leaves those ratios at 0.
pub fn compute_operations_stats(
    operations: &[OperationsRecord],
    financial: &[FinancialRecord],
) -> OperationalSummary {
    if operations.is_empty() {
        return OperationalSummary::default();
    }

    let sorted = chronological(operations);

    let projects_completed = sum_by(&sorted, |r| r.projects_completed);
    let projects_total = sum_by(&sorted, |r| r.projects_total);
    let resource_hours_used = sum_by(&sorted, |r| r.resource_hours_used.unwrap_or(0.0));
    let resource_hours_available =
        sum_by(&sorted, |r| r.resource_hours_available.unwrap_or(0.0));

    let project_completion_rate = match sorted.last() {
        Some(latest) => percent(latest.projects_completed, latest.projects_total),
        None => 0.0,
    };

    let months: HashSet<MonthKey> = sorted.iter().map(|r| r.period).collect();
    let matching: Vec<&FinancialRecord> = financial
        .iter()
        .filter(|f| months.contains(&f.period))
        .collect();
    let expenses = sum_by(&matching, |f| f.expenses);
    let revenue = sum_by(&matching, |f| f.revenue);

    let window = trailing(&sorted, DEFAULT_TREND_PERIODS);
    let completion_trend = window
        .iter()
        .map(|r| TrendPoint {
            period: r.period,
            label: r.period.label(),
            value: percent(r.projects_completed, r.projects_total),
        })
        .collect();
    let utilization_trend = window
        .iter()
        .map(|r| TrendPoint {
            period: r.period,
            label: r.period.label(),
            value: utilization(std::slice::from_ref(r)),
        })
        .collect();

    log::trace!(
        "operations: {} records, {} matching financial records",
        sorted.len(),
        matching.len()
    );

    OperationalSummary {
        utilization_rate: utilization(&sorted),
        project_completion_rate,
        overall_completion_rate: percent(projects_completed, projects_total),
        projects_completed,
        projects_total,
        resource_hours_used,
        resource_hours_available,
        cost_per_completed_project: finite(safe_div(expenses, projects_completed).max(0.0)),
        revenue_per_resource_hour: finite(safe_div(revenue, resource_hours_used).max(0.0)),
        completion_trend,
        utilization_trend,
        period_count: sorted.len(),
    }
}

/// Hours used over hours available for the records that track capacity.
/// When none do, project throughput stands in for utilization.
fn utilization(records: &[&OperationsRecord]) -> f64 {
    let with_capacity: Vec<&OperationsRecord> = records
        .iter()
        .copied()
        .filter(|r| r.resource_hours_available.is_some())
        .collect();

    if with_capacity.is_empty() {
        return percent(
            sum_by(records, |r| r.projects_completed),
            sum_by(records, |r| r.projects_total),
        );
    }

    percent(
        sum_by(&with_capacity, |r| r.resource_hours_used.unwrap_or(0.0)),
        sum_by(&with_capacity, |r| r.resource_hours_available.unwrap_or(0.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(period: &str, completed: f64, total: f64) -> OperationsRecord {
        OperationsRecord {
            period: MonthKey::parse(period).unwrap(),
            company_id: "acme".into(),
            projects_completed: completed,
            projects_total: total,
            resource_hours_used: None,
            resource_hours_available: None,
        }
    }

    fn ops_hours(
        period: &str,
        completed: f64,
        total: f64,
        used: f64,
        available: f64,
    ) -> OperationsRecord {
        OperationsRecord {
            resource_hours_used: Some(used),
            resource_hours_available: Some(available),
            ..ops(period, completed, total)
        }
    }

    fn fin(period: &str, revenue: f64, expenses: f64) -> FinancialRecord {
        FinancialRecord {
            period: MonthKey::parse(period).unwrap(),
            company_id: "acme".into(),
            revenue,
            expenses,
            cost_of_goods_sold: 0.0,
            cash_inflow: 0.0,
            cash_outflow: 0.0,
            accounts_receivable: 0.0,
            accounts_payable: 0.0,
            current_assets: 0.0,
            current_liabilities: 0.0,
        }
    }

    fn all_fields_finite(s: &OperationalSummary) -> bool {
        let scalars = [
            s.utilization_rate,
            s.project_completion_rate,
            s.overall_completion_rate,
            s.projects_completed,
            s.projects_total,
            s.resource_hours_used,
            s.resource_hours_available,
            s.cost_per_completed_project,
            s.revenue_per_resource_hour,
        ];
        scalars.iter().all(|x| x.is_finite())
            && s.completion_trend.iter().all(|p| p.value.is_finite())
            && s.utilization_trend.iter().all(|p| p.value.is_finite())
    }

    #[test]
    fn test_empty_input_is_zeroed() {
        let s = compute_operations_stats(&[], &[]);
        assert_eq!(s, OperationalSummary::default());
        assert_eq!(s.utilization_rate, 0.0);
        assert!(s.completion_trend.is_empty());

        // Financial data alone does not produce operations figures.
        let s = compute_operations_stats(&[], &[fin("2025-01", 1000.0, 500.0)]);
        assert_eq!(s, OperationalSummary::default());
    }

    #[test]
    fn test_single_period_without_financials() {
        let s = compute_operations_stats(&[ops("2025-01", 8.0, 10.0)], &[]);
        assert_eq!(s.utilization_rate, 80.0);
        assert_eq!(s.project_completion_rate, 80.0);
        assert_eq!(s.overall_completion_rate, 80.0);
        assert_eq!(s.cost_per_completed_project, 0.0);
        assert_eq!(s.revenue_per_resource_hour, 0.0);
        assert_eq!(s.period_count, 1);
    }

    #[test]
    fn test_utilization_uses_capacity_hours() {
        let records = vec![
            ops_hours("2025-01", 1.0, 10.0, 100.0, 200.0),
            ops_hours("2025-02", 1.0, 10.0, 50.0, 0.0),
        ];
        let s = compute_operations_stats(&records, &[]);
        assert_eq!(s.utilization_rate, 75.0);
        assert_eq!(s.resource_hours_used, 150.0);
        assert_eq!(s.resource_hours_available, 200.0);
        // Second month has zero capacity: rate is 0, not NaN.
        assert_eq!(s.utilization_trend[1].value, 0.0);
    }

    #[test]
    fn test_zero_capacity_yields_zero() {
        let s = compute_operations_stats(&[ops_hours("2025-01", 5.0, 0.0, 40.0, 0.0)], &[]);
        assert_eq!(s.utilization_rate, 0.0);
        assert_eq!(s.project_completion_rate, 0.0);
        assert!(all_fields_finite(&s));
    }

    #[test]
    fn test_over_capacity_is_clamped() {
        let s = compute_operations_stats(&[ops_hours("2025-01", 12.0, 10.0, 300.0, 200.0)], &[]);
        assert_eq!(s.utilization_rate, 100.0);
        assert_eq!(s.project_completion_rate, 100.0);
    }

    #[test]
    fn test_negative_inputs_stay_in_range() {
        let s = compute_operations_stats(
            &[ops_hours("2025-01", -3.0, 10.0, -50.0, 100.0)],
            &[fin("2025-01", -100.0, 50.0)],
        );
        assert!((0.0..=100.0).contains(&s.utilization_rate));
        assert!((0.0..=100.0).contains(&s.project_completion_rate));
        assert!(s.cost_per_completed_project >= 0.0);
        assert!(s.revenue_per_resource_hour >= 0.0);
        assert!(all_fields_finite(&s));
    }

    #[test]
    fn test_latest_completion_follows_period_not_input_order() {
        let records = vec![
            ops("2025-03", 9.0, 10.0),
            ops("2025-01", 2.0, 10.0),
            ops("2025-02", 5.0, 10.0),
        ];
        let s = compute_operations_stats(&records, &[]);
        assert_eq!(s.project_completion_rate, 90.0);
        let labels: Vec<&str> = s.completion_trend.iter().map(|p| p.label).collect();
        assert_eq!(labels, vec!["Jan", "Feb", "Mar"]);
    }

    #[test]
    fn test_permutation_gives_identical_summary() {
        let a = vec![
            ops_hours("2025-01", 8.0, 10.0, 120.0, 160.0),
            ops_hours("2025-02", 6.0, 9.0, 140.0, 160.0),
            ops_hours("2025-03", 7.0, 7.0, 100.0, 150.0),
        ];
        let mut b = a.clone();
        b.reverse();
        let financial = vec![fin("2025-01", 9000.0, 3000.0), fin("2025-02", 8000.0, 2500.0)];
        assert_eq!(
            compute_operations_stats(&a, &financial),
            compute_operations_stats(&b, &financial)
        );
    }

    #[test]
    fn test_changing_latest_period_only_moves_latest_fields() {
        let base = vec![ops("2025-01", 5.0, 10.0), ops("2025-02", 9.0, 10.0)];
        // Same figures, but the 9/10 month now precedes the 5/10 month.
        let relabeled = vec![ops("2025-01", 5.0, 10.0), ops("2024-12", 9.0, 10.0)];
        let a = compute_operations_stats(&base, &[]);
        let b = compute_operations_stats(&relabeled, &[]);
        assert_eq!(a.utilization_rate, b.utilization_rate);
        assert_eq!(a.overall_completion_rate, b.overall_completion_rate);
        assert_eq!(a.projects_completed, b.projects_completed);
        assert_eq!(a.project_completion_rate, 90.0);
        assert_eq!(b.project_completion_rate, 50.0);
    }

    #[test]
    fn test_idempotent() {
        let records = vec![ops("2025-01", 8.0, 10.0), ops("2025-02", 3.0, 4.0)];
        let financial = vec![fin("2025-01", 1000.0, 400.0)];
        let first = compute_operations_stats(&records, &financial);
        let second = compute_operations_stats(&records, &financial);
        assert_eq!(first, second);
        assert_eq!(
            first.utilization_rate.to_bits(),
            second.utilization_rate.to_bits()
        );
    }

    #[test]
    fn test_trend_keeps_trailing_six_periods() {
        let records: Vec<OperationsRecord> = (1..=9)
            .map(|m| ops(&format!("2025-{m:02}"), m as f64, 10.0))
            .collect();
        let s = compute_operations_stats(&records, &[]);
        assert_eq!(s.completion_trend.len(), DEFAULT_TREND_PERIODS);
        assert_eq!(s.completion_trend[0].period, MonthKey::parse("2025-04").unwrap());
        assert_eq!(s.completion_trend[5].value, 90.0);
        assert_eq!(s.period_count, 9);
    }

    #[test]
    fn test_cross_domain_ratios_use_matching_months() {
        let records = vec![
            ops_hours("2025-01", 4.0, 5.0, 100.0, 120.0),
            ops_hours("2025-02", 4.0, 5.0, 100.0, 120.0),
        ];
        let financial = vec![
            fin("2025-01", 10000.0, 2000.0),
            fin("2025-02", 10000.0, 2000.0),
            // No operations record for March: ignored.
            fin("2025-03", 99999.0, 99999.0),
        ];
        let s = compute_operations_stats(&records, &financial);
        assert_eq!(s.cost_per_completed_project, 500.0);
        assert_eq!(s.revenue_per_resource_hour, 100.0);
    }
}
