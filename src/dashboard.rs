use crate::access::{check_access, Page};
use crate::error::Result;
use crate::metrics::{
    compute_financial_stats, compute_membership_stats, compute_operations_stats,
    compute_platform_stats, compute_sales_marketing_stats, FinancialSummary, MembershipSummary,
    OperationalSummary, PlatformSummary, SalesMarketingSummary,
};
use crate::query::Period;
use crate::records::{within, Domain};
use crate::source::RecordSource;
use crate::tenant::{Viewer, PLATFORM_COMPANY_ID};

/// Every dashboard read goes through here: access check, load, window,
/// aggregate.
pub struct Dashboard<S> {
    source: S,
}

impl<S: RecordSource> Dashboard<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    fn authorize(&self, viewer: &Viewer, company_id: &str, domain: Domain) -> Result<()> {
        check_access(
            viewer.role,
            &viewer.company_id,
            company_id,
            Page::Domain(domain),
        )
    }

    pub async fn financial(
        &self,
        viewer: &Viewer,
        company_id: &str,
        period: Option<&Period>,
    ) -> Result<FinancialSummary> {
        self.authorize(viewer, company_id, Domain::Financial)?;
        let records = within(&self.source.financial_records(company_id).await?, period);
        log::debug!("{company_id}: {} financial records in window", records.len());
        Ok(compute_financial_stats(&records))
    }

    /// Cost and revenue ratios draw on the company's financial records for
    /// the same window.
    pub async fn operations(
        &self,
        viewer: &Viewer,
        company_id: &str,
        period: Option<&Period>,
    ) -> Result<OperationalSummary> {
        self.authorize(viewer, company_id, Domain::Operations)?;
        let operations = within(&self.source.operations_records(company_id).await?, period);
        let financial = within(&self.source.financial_records(company_id).await?, period);
        log::debug!(
            "{company_id}: {} operations and {} financial records in window",
            operations.len(),
            financial.len()
        );
        Ok(compute_operations_stats(&operations, &financial))
    }

    pub async fn sales_marketing(
        &self,
        viewer: &Viewer,
        company_id: &str,
        period: Option<&Period>,
    ) -> Result<SalesMarketingSummary> {
        self.authorize(viewer, company_id, Domain::SalesMarketing)?;
        let records = within(
            &self.source.sales_marketing_records(company_id).await?,
            period,
        );
        log::debug!(
            "{company_id}: {} sales & marketing records in window",
            records.len()
        );
        Ok(compute_sales_marketing_stats(&records))
    }

    pub async fn membership(
        &self,
        viewer: &Viewer,
        company_id: &str,
        period: Option<&Period>,
    ) -> Result<MembershipSummary> {
        self.authorize(viewer, company_id, Domain::Membership)?;
        let records = within(&self.source.membership_records(company_id).await?, period);
        log::debug!("{company_id}: {} membership records in window", records.len());
        Ok(compute_membership_stats(&records))
    }

    pub async fn platform(&self, viewer: &Viewer) -> Result<PlatformSummary> {
        check_access(
            viewer.role,
            &viewer.company_id,
            PLATFORM_COMPANY_ID,
            Page::Platform,
        )?;
        let companies = self.source.companies().await?;
        let users = self.source.users().await?;
        log::debug!(
            "platform overview over {} companies and {} users",
            companies.len(),
            users.len()
        );
        Ok(compute_platform_stats(&companies, &users))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use crate::demo::DemoSource;
    use crate::error::Error;
    use crate::query::MonthKey;

    fn dashboard() -> Dashboard<DemoSource> {
        Dashboard::new(DemoSource::ending_at(MonthKey::parse("2025-06").unwrap()))
    }

    #[tokio::test]
    async fn test_finance_team_reads_financial_and_membership() {
        let dash = dashboard();
        let viewer = Viewer::new(Role::FinanceTeam, "acme");

        let fin = dash.financial(&viewer, "acme", None).await.unwrap();
        assert_eq!(fin.period_count, 6);
        assert!(fin.total_revenue > 0.0);

        let members = dash.membership(&viewer, "acme", None).await.unwrap();
        assert_eq!(members.period_count, 6);

        let err = dash.operations(&viewer, "acme", None).await.unwrap_err();
        assert!(matches!(err, Error::AccessDenied { .. }));
    }

    #[tokio::test]
    async fn test_cross_company_denied_before_loading() {
        let dash = dashboard();
        let viewer = Viewer::new(Role::Ceo, "acme");
        let err = dash
            .sales_marketing(&viewer, "globex", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AccessDenied { .. }));
    }

    #[tokio::test]
    async fn test_period_window_limits_records() {
        let dash = dashboard();
        let viewer = Viewer::new(Role::Ceo, "acme");

        let q2 = Period::parse("2025-Q2").unwrap();
        let ops = dash.operations(&viewer, "acme", Some(&q2)).await.unwrap();
        assert_eq!(ops.period_count, 3);
        assert_eq!(ops.completion_trend.len(), 3);

        let may = Period::parse("2025-05").unwrap();
        let sales = dash
            .sales_marketing(&viewer, "acme", Some(&may))
            .await
            .unwrap();
        assert_eq!(sales.period_count, 1);

        let empty = Period::parse("2023").unwrap();
        let fin = dash.financial(&viewer, "acme", Some(&empty)).await.unwrap();
        assert_eq!(fin, FinancialSummary::default());
    }

    #[tokio::test]
    async fn test_platform_admin_sees_everything() {
        let dash = dashboard();
        let admin = Viewer::new(Role::PlatformAdmin, PLATFORM_COMPANY_ID);

        let overview = dash.platform(&admin).await.unwrap();
        assert_eq!(overview.total_companies, 2);
        assert_eq!(overview.active_subscriptions, 2);

        assert!(dash.operations(&admin, "globex", None).await.is_ok());

        let ceo = Viewer::new(Role::Ceo, "acme");
        assert!(dash.platform(&ceo).await.is_err());
    }
}
