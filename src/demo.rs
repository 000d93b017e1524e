//! Deterministic in-memory data for trying the dashboards without a database.
//!
//! Two tenants are generated over six consecutive months: `acme` on the
//! paid plan, which records resource hours, and `globex` on the free plan,
//! which does not. Every role has one user per tenant, plus a platform
//! admin on the reserved platform company.

use crate::access::Role;
use crate::error::Result;
use crate::query::MonthKey;
use crate::records::{
    FinancialRecord, MembershipRecord, OperationsRecord, PeriodRecord, SalesMarketingRecord,
};
use crate::source::RecordSource;
use crate::tenant::{Company, Plan, User, PLATFORM_COMPANY_ID};

pub const DEMO_MONTHS: i32 = 6;

struct Profile {
    id: &'static str,
    name: &'static str,
    plan: Plan,
    scale: f64,
    tracks_hours: bool,
}

const PROFILES: [Profile; 2] = [
    Profile {
        id: "acme",
        name: "Acme Corp",
        plan: Plan::Paid,
        scale: 1.0,
        tracks_hours: true,
    },
    Profile {
        id: "globex",
        name: "Globex",
        plan: Plan::Free,
        scale: 0.4,
        tracks_hours: false,
    },
];

#[derive(Debug, Clone)]
pub struct DemoSource {
    companies: Vec<Company>,
    users: Vec<User>,
    financial: Vec<FinancialRecord>,
    operations: Vec<OperationsRecord>,
    sales_marketing: Vec<SalesMarketingRecord>,
    membership: Vec<MembershipRecord>,
}

impl DemoSource {
    /// Six months of data ending at the current month.
    pub fn new() -> Self {
        Self::ending_at(MonthKey::current())
    }

    /// Six months of data ending at `last`. The same `last` always yields
    /// the same records.
    pub fn ending_at(last: MonthKey) -> Self {
        let mut source = Self {
            companies: vec![Company {
                id: PLATFORM_COMPANY_ID.into(),
                slug: PLATFORM_COMPANY_ID.into(),
                name: "Platform".into(),
                plan: Plan::Paid,
            }],
            users: vec![User {
                id: "platform-admin".into(),
                email: "admin@bizdash.test".into(),
                name: "Platform Admin".into(),
                role: Role::PlatformAdmin,
                company_id: PLATFORM_COMPANY_ID.into(),
            }],
            financial: Vec::new(),
            operations: Vec::new(),
            sales_marketing: Vec::new(),
            membership: Vec::new(),
        };

        for profile in &PROFILES {
            source.companies.push(Company {
                id: profile.id.into(),
                slug: profile.id.into(),
                name: profile.name.into(),
                plan: profile.plan,
            });

            for role in Role::ALL.into_iter().filter(|r| *r != Role::PlatformAdmin) {
                source.users.push(User {
                    id: format!("{}-{}", profile.id, role.key()),
                    email: format!("{}@{}.test", role.key(), profile.id),
                    name: format!("{} {}", profile.name, role.display_name()),
                    role,
                    company_id: profile.id.into(),
                });
            }

            for step in 0..DEMO_MONTHS {
                let period = last.shift(step - (DEMO_MONTHS - 1));
                source.push_month(profile, period, f64::from(step));
            }
        }

        log::debug!(
            "generated demo data for {} companies through {last}",
            PROFILES.len()
        );
        source
    }

    fn push_month(&mut self, profile: &Profile, period: MonthKey, i: f64) {
        let s = profile.scale;
        let company_id = profile.id.to_string();

        let revenue = (120_000.0 + 6_000.0 * i) * s;
        self.financial.push(FinancialRecord {
            period,
            company_id: company_id.clone(),
            revenue,
            expenses: revenue * 0.3,
            cost_of_goods_sold: revenue * 0.4,
            cash_inflow: revenue * 0.95,
            cash_outflow: revenue * 0.8,
            accounts_receivable: revenue * 0.2,
            accounts_payable: revenue * 0.1,
            current_assets: revenue * 1.5,
            current_liabilities: revenue * 0.75,
        });

        let projects_total = ((20.0 + 2.0 * i) * s).round();
        let (hours_used, hours_available) = if profile.tracks_hours {
            (Some((1_280.0 + 40.0 * i) * s), Some(1_600.0 * s))
        } else {
            (None, None)
        };
        self.operations.push(OperationsRecord {
            period,
            company_id: company_id.clone(),
            projects_completed: (projects_total * 0.8).round(),
            projects_total,
            resource_hours_used: hours_used,
            resource_hours_available: hours_available,
        });

        self.sales_marketing.push(SalesMarketingRecord {
            period,
            company_id: company_id.clone(),
            lead_generation: ((400.0 + 25.0 * i) * s).round(),
            conversion_rate: 12.0 + 0.5 * i,
            sales_pipeline_value: (250_000.0 + 10_000.0 * i) * s,
            avg_revenue_per_client: 4_500.0 * s,
            marketing_roi: 2.5 + 0.1 * i,
            cost_per_lead: 35.0 - i,
        });

        self.membership.push(MembershipRecord {
            period,
            company_id,
            total_members: ((1_000.0 + 40.0 * i) * s).round(),
            new_members: ((60.0 + 2.0 * i) * s).round(),
            members_lost: (20.0 * s).round(),
            retention_rate: 92.0,
            churn_rate: 8.0 - 0.2 * i,
            csat: 85.0 + 0.5 * i,
            nps: 35.0 + i,
        });
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

fn for_company<R: PeriodRecord + Clone>(records: &[R], company_id: &str) -> Vec<R> {
    records
        .iter()
        .filter(|r| r.company_id() == company_id)
        .cloned()
        .collect()
}

impl RecordSource for DemoSource {
    async fn financial_records(&self, company_id: &str) -> Result<Vec<FinancialRecord>> {
        Ok(for_company(&self.financial, company_id))
    }

    async fn operations_records(&self, company_id: &str) -> Result<Vec<OperationsRecord>> {
        Ok(for_company(&self.operations, company_id))
    }

    async fn sales_marketing_records(
        &self,
        company_id: &str,
    ) -> Result<Vec<SalesMarketingRecord>> {
        Ok(for_company(&self.sales_marketing, company_id))
    }

    async fn membership_records(&self, company_id: &str) -> Result<Vec<MembershipRecord>> {
        Ok(for_company(&self.membership, company_id))
    }

    async fn companies(&self) -> Result<Vec<Company>> {
        Ok(self.companies.clone())
    }

    async fn users(&self) -> Result<Vec<User>> {
        Ok(self.users.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{
        compute_financial_stats, compute_membership_stats, compute_operations_stats,
        compute_platform_stats, compute_sales_marketing_stats,
    };

    fn june() -> MonthKey {
        MonthKey::parse("2025-06").unwrap()
    }

    #[tokio::test]
    async fn test_six_months_per_company() {
        let demo = DemoSource::ending_at(june());
        let records = demo.financial_records("acme").await.unwrap();
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].period.to_key(), "2025-01");
        assert_eq!(records[5].period.to_key(), "2025-06");
        assert!(records.iter().all(|r| r.company_id == "acme"));

        assert!(demo.membership_records("initech").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deterministic() {
        let a = DemoSource::ending_at(june());
        let b = DemoSource::ending_at(june());
        assert_eq!(
            a.sales_marketing_records("globex").await.unwrap(),
            b.sales_marketing_records("globex").await.unwrap()
        );
        assert_eq!(a.users().await.unwrap(), b.users().await.unwrap());
    }

    #[tokio::test]
    async fn test_every_role_has_a_user() {
        let users = DemoSource::ending_at(june()).users().await.unwrap();
        for role in Role::ALL {
            assert!(users.iter().any(|u| u.role == role), "no user for {role}");
        }
        assert_eq!(users.len(), 11);
    }

    #[tokio::test]
    async fn test_feeds_every_aggregator() {
        let demo = DemoSource::ending_at(june());
        for company in ["acme", "globex"] {
            let fin = demo.financial_records(company).await.unwrap();
            let ops = demo.operations_records(company).await.unwrap();
            let sales = demo.sales_marketing_records(company).await.unwrap();
            let members = demo.membership_records(company).await.unwrap();

            let f = compute_financial_stats(&fin);
            assert!(f.total_revenue > 0.0);
            assert!(f.profit_margin > 0.0);
            assert!(f.revenue_growth > 0.0);

            let o = compute_operations_stats(&ops, &fin);
            assert!(o.utilization_rate > 0.0 && o.utilization_rate <= 100.0);
            assert!(o.project_completion_rate > 0.0);
            assert!(o.cost_per_completed_project > 0.0);

            let s = compute_sales_marketing_stats(&sales);
            assert!(s.lead_generation > 0.0);
            assert!(s.conversion_rate > 0.0);

            let m = compute_membership_stats(&members);
            assert!(m.total_members > 0.0);
            assert!(m.net_member_growth > 0.0);
            assert_eq!(m.trend.len(), 6);
        }

        let platform = compute_platform_stats(
            &demo.companies().await.unwrap(),
            &demo.users().await.unwrap(),
        );
        assert_eq!(platform.total_companies, 2);
        assert_eq!(platform.total_users, 10);
        assert_eq!(platform.subscriptions.paid, 1);
        assert_eq!(platform.subscriptions.free, 1);
    }

    #[tokio::test]
    async fn test_hours_tracked_only_by_acme() {
        let demo = DemoSource::ending_at(june());
        let acme = demo.operations_records("acme").await.unwrap();
        let globex = demo.operations_records("globex").await.unwrap();
        assert!(acme.iter().all(|r| r.resource_hours_available.is_some()));
        assert!(globex.iter().all(|r| r.resource_hours_available.is_none()));
    }
}
