pub mod types;

pub use types::*;

use crate::query::{MonthKey, Period};

/// A raw monthly submission for one company in one domain.
pub trait PeriodRecord {
    fn period(&self) -> MonthKey;
    fn company_id(&self) -> &str;
}

macro_rules! impl_period_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PeriodRecord for $ty {
                fn period(&self) -> MonthKey {
                    self.period
                }

                fn company_id(&self) -> &str {
                    &self.company_id
                }
            }
        )*
    };
}

impl_period_record!(
    FinancialRecord,
    OperationsRecord,
    SalesMarketingRecord,
    MembershipRecord,
);

/// Borrow records in ascending period order. The sort is stable, so
/// records sharing a period keep their input order.
pub fn chronological<R: PeriodRecord>(records: &[R]) -> Vec<&R> {
    let mut sorted: Vec<&R> = records.iter().collect();
    sorted.sort_by_key(|r| r.period());
    sorted
}

/// Keep only the records whose month falls inside `period`.
/// `None` keeps everything.
pub fn within<R: PeriodRecord + Clone>(records: &[R], period: Option<&Period>) -> Vec<R> {
    match period {
        Some(p) => records
            .iter()
            .filter(|r| p.contains(r.period()))
            .cloned()
            .collect(),
        None => records.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(period: &str, leads: f64) -> SalesMarketingRecord {
        SalesMarketingRecord {
            period: MonthKey::parse(period).unwrap(),
            company_id: "acme".into(),
            lead_generation: leads,
            conversion_rate: 0.0,
            sales_pipeline_value: 0.0,
            avg_revenue_per_client: 0.0,
            marketing_roi: 0.0,
            cost_per_lead: 0.0,
        }
    }

    #[test]
    fn test_chronological_sorts_unordered_input() {
        let records = vec![
            record("2025-03", 3.0),
            record("2024-12", 0.0),
            record("2025-01", 1.0),
        ];
        let sorted: Vec<String> = chronological(&records)
            .iter()
            .map(|r| r.period().to_key())
            .collect();
        assert_eq!(sorted, vec!["2024-12", "2025-01", "2025-03"]);
    }

    #[test]
    fn test_chronological_is_stable_for_duplicate_periods() {
        let records = vec![
            record("2025-02", 1.0),
            record("2025-01", 0.0),
            record("2025-02", 2.0),
        ];
        let sorted = chronological(&records);
        assert_eq!(sorted[1].lead_generation, 1.0);
        assert_eq!(sorted[2].lead_generation, 2.0);
    }

    #[test]
    fn test_within_filters_by_window() {
        let records = vec![
            record("2024-12", 0.0),
            record("2025-01", 1.0),
            record("2025-03", 3.0),
            record("2025-04", 4.0),
        ];
        let q1 = Period::Quarter(2025, 1);
        let kept = within(&records, Some(&q1));
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| q1.contains(r.period())));
        assert_eq!(within(&records, None).len(), 4);
    }

    #[test]
    fn test_record_deserializes_form_payload() {
        let json = r#"{
            "period": "2025-08",
            "companyId": "acme",
            "leadGeneration": 120,
            "conversionRate": 18.5,
            "salesPipelineValue": 250000,
            "avgRevenuePerClient": 4200,
            "marketingRoi": -0.5,
            "costPerLead": 35
        }"#;
        let r: SalesMarketingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.period, MonthKey::parse("2025-08").unwrap());
        assert_eq!(r.company_id(), "acme");
        assert_eq!(r.marketing_roi, -0.5);
    }

    #[test]
    fn test_missing_numeric_fields_default_to_zero() {
        let json = r#"{"period": "2025-01", "companyId": "acme"}"#;
        let r: OperationsRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.projects_completed, 0.0);
        assert_eq!(r.projects_total, 0.0);
        assert!(r.resource_hours_used.is_none());

        let m: MembershipRecord =
            serde_json::from_str(r#"{"period": "2025-01", "companyId": "acme"}"#).unwrap();
        assert_eq!(m.nps, 0.0);
    }

    #[test]
    fn test_structurally_wrong_record_is_rejected() {
        // A non-numeric value or an unparseable period never reaches the aggregator.
        assert!(serde_json::from_str::<FinancialRecord>(
            r#"{"period": "2025-01", "companyId": "acme", "revenue": "lots"}"#
        )
        .is_err());
        assert!(serde_json::from_str::<FinancialRecord>(
            r#"{"period": "January", "companyId": "acme"}"#
        )
        .is_err());
    }

    #[test]
    fn test_domain_parse() {
        assert_eq!(Domain::parse("finance"), Some(Domain::Financial));
        assert_eq!(Domain::parse("Sales-Marketing"), Some(Domain::SalesMarketing));
        assert_eq!(Domain::parse("ops"), Some(Domain::Operations));
        assert_eq!(Domain::parse("membership"), Some(Domain::Membership));
        assert_eq!(Domain::parse("hr"), None);
        for d in Domain::ALL {
            assert_eq!(Domain::parse(d.as_str()), Some(d));
        }
    }
}
