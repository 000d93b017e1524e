use crate::metrics::{
    clamp_pct, clamp_signed_pct, finite, mean_by, sum_by, trailing, MembershipSummary,
    MembershipTrendPoint, DEFAULT_TREND_PERIODS,
};
use crate::records::{chronological, MembershipRecord};

/// Summarize a company's membership records.
///
/// `totalMembers` is the latest period's headcount; joins and losses are
/// summed; the entered rates and scores are averaged per period.
pub fn compute_membership_stats(records: &[MembershipRecord]) -> MembershipSummary {
    if records.is_empty() {
        return MembershipSummary::default();
    }

    let sorted = chronological(records);

    let new_members = sum_by(&sorted, |r| r.new_members);
    let members_lost = sum_by(&sorted, |r| r.members_lost);

    let trend = trailing(&sorted, DEFAULT_TREND_PERIODS)
        .iter()
        .map(|r| MembershipTrendPoint {
            period: r.period,
            label: r.period.label(),
            total_members: finite(r.total_members),
            new_members: finite(r.new_members),
            members_lost: finite(r.members_lost),
        })
        .collect();

    MembershipSummary {
        total_members: sorted.last().map_or(0.0, |r| finite(r.total_members)),
        new_members,
        members_lost,
        net_member_growth: finite(new_members - members_lost),
        retention_rate: mean_by(&sorted, |r| clamp_pct(r.retention_rate)),
        churn_rate: mean_by(&sorted, |r| clamp_pct(r.churn_rate)),
        csat: mean_by(&sorted, |r| clamp_pct(r.csat)),
        nps: mean_by(&sorted, |r| clamp_signed_pct(r.nps)),
        trend,
        period_count: sorted.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::MonthKey;

    fn record(period: &str, total: f64, new: f64, lost: f64) -> MembershipRecord {
        MembershipRecord {
            period: MonthKey::parse(period).unwrap(),
            company_id: "acme".into(),
            total_members: total,
            new_members: new,
            members_lost: lost,
            retention_rate: 90.0,
            churn_rate: 10.0,
            csat: 80.0,
            nps: 40.0,
        }
    }

    #[test]
    fn test_empty_input_is_zeroed() {
        assert_eq!(compute_membership_stats(&[]), MembershipSummary::default());
    }

    #[test]
    fn test_headcount_is_latest_and_flows_are_summed() {
        let s = compute_membership_stats(&[
            record("2025-02", 1040.0, 60.0, 20.0),
            record("2025-01", 1000.0, 50.0, 10.0),
            record("2025-03", 1080.0, 70.0, 30.0),
        ]);
        assert_eq!(s.total_members, 1080.0);
        assert_eq!(s.new_members, 180.0);
        assert_eq!(s.members_lost, 60.0);
        assert_eq!(s.net_member_growth, 120.0);
        assert_eq!(s.retention_rate, 90.0);
        assert_eq!(s.churn_rate, 10.0);
        assert_eq!(s.csat, 80.0);
        assert_eq!(s.nps, 40.0);
        let totals: Vec<f64> = s.trend.iter().map(|p| p.total_members).collect();
        assert_eq!(totals, vec![1000.0, 1040.0, 1080.0]);
    }

    #[test]
    fn test_net_growth_may_be_negative() {
        let s = compute_membership_stats(&[record("2025-01", 500.0, 5.0, 25.0)]);
        assert_eq!(s.net_member_growth, -20.0);
    }

    #[test]
    fn test_rates_and_scores_are_clamped() {
        let mut a = record("2025-01", 10.0, 0.0, 0.0);
        a.retention_rate = 150.0;
        a.churn_rate = -5.0;
        a.csat = 101.0;
        a.nps = -300.0;
        let s = compute_membership_stats(&[a]);
        assert_eq!(s.retention_rate, 100.0);
        assert_eq!(s.churn_rate, 0.0);
        assert_eq!(s.csat, 100.0);
        assert_eq!(s.nps, -100.0);
    }

    #[test]
    fn test_averages_span_all_periods() {
        let mut a = record("2025-01", 10.0, 0.0, 0.0);
        a.nps = -20.0;
        a.churn_rate = 4.0;
        let mut b = record("2025-02", 10.0, 0.0, 0.0);
        b.nps = 60.0;
        b.churn_rate = 8.0;
        let s = compute_membership_stats(&[a, b]);
        assert_eq!(s.nps, 20.0);
        assert_eq!(s.churn_rate, 6.0);
    }

    #[test]
    fn test_order_independent() {
        let a = vec![
            record("2025-01", 1000.0, 50.0, 10.0),
            record("2025-02", 1040.0, 60.0, 20.0),
        ];
        let b = vec![a[1].clone(), a[0].clone()];
        assert_eq!(compute_membership_stats(&a), compute_membership_stats(&b));
    }
}
