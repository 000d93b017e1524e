pub mod access;
pub mod dashboard;
pub mod date_util;
pub mod demo;
pub mod error;
pub mod metrics;
pub mod query;
pub mod records;
pub mod source;
pub mod storage;
pub mod tenant;

pub use access::{check_access, Page, Role};
pub use dashboard::Dashboard;
pub use demo::DemoSource;
pub use error::{Error, Result};
pub use metrics::{
    FinancialSummary, MembershipSummary, OperationalSummary, PlatformSummary,
    SalesMarketingSummary,
};
pub use query::{MonthKey, Period};
pub use records::{
    Domain, FinancialRecord, MembershipRecord, OperationsRecord, SalesMarketingRecord,
};
pub use source::RecordSource;
pub use storage::Database;
pub use tenant::{Company, Plan, User, Viewer, PLATFORM_COMPANY_ID};
