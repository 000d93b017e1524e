use crate::error::Result;
use crate::records::{FinancialRecord, MembershipRecord, OperationsRecord, SalesMarketingRecord};
use crate::tenant::{Company, User};

/// Where raw period records and tenants come from.
///
/// Record methods return every record stored for one company, in any
/// order; callers window and sort them.
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    async fn financial_records(&self, company_id: &str) -> Result<Vec<FinancialRecord>>;

    async fn operations_records(&self, company_id: &str) -> Result<Vec<OperationsRecord>>;

    async fn sales_marketing_records(&self, company_id: &str)
        -> Result<Vec<SalesMarketingRecord>>;

    async fn membership_records(&self, company_id: &str) -> Result<Vec<MembershipRecord>>;

    async fn companies(&self) -> Result<Vec<Company>>;

    async fn users(&self) -> Result<Vec<User>>;
}
