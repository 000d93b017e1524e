use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension};

use crate::access::Role;
use crate::query::MonthKey;
use crate::records::{
    Domain, FinancialRecord, MembershipRecord, OperationsRecord, SalesMarketingRecord,
};
use crate::tenant::{Company, Plan, User};

// ── Financial ──────────────────────────────────────────────────────

pub fn insert_financial_record(
    conn: &Connection,
    record: &FinancialRecord,
) -> Result<i64, rusqlite::Error> {
    conn.execute(
        "INSERT INTO financial_metrics (
            company_id, period, revenue, expenses, cost_of_goods_sold,
            cash_inflow, cash_outflow, accounts_receivable, accounts_payable,
            current_assets, current_liabilities
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            record.company_id,
            record.period,
            record.revenue,
            record.expenses,
            record.cost_of_goods_sold,
            record.cash_inflow,
            record.cash_outflow,
            record.accounts_receivable,
            record.accounts_payable,
            record.current_assets,
            record.current_liabilities,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_financial_records(
    conn: &Connection,
    company_id: &str,
) -> Result<Vec<FinancialRecord>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT period, company_id, revenue, expenses, cost_of_goods_sold,
                cash_inflow, cash_outflow, accounts_receivable, accounts_payable,
                current_assets, current_liabilities
         FROM financial_metrics WHERE company_id = ?1 ORDER BY period, id",
    )?;
    let rows = stmt.query_map(params![company_id], |row| {
        Ok(FinancialRecord {
            period: row.get(0)?,
            company_id: row.get(1)?,
            revenue: row.get(2)?,
            expenses: row.get(3)?,
            cost_of_goods_sold: row.get(4)?,
            cash_inflow: row.get(5)?,
            cash_outflow: row.get(6)?,
            accounts_receivable: row.get(7)?,
            accounts_payable: row.get(8)?,
            current_assets: row.get(9)?,
            current_liabilities: row.get(10)?,
        })
    })?;
    rows.collect()
}

// ── Operations ─────────────────────────────────────────────────────

pub fn insert_operations_record(
    conn: &Connection,
    record: &OperationsRecord,
) -> Result<i64, rusqlite::Error> {
    conn.execute(
        "INSERT INTO operations_metrics (
            company_id, period, projects_completed, projects_total,
            resource_hours_used, resource_hours_available
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.company_id,
            record.period,
            record.projects_completed,
            record.projects_total,
            record.resource_hours_used,
            record.resource_hours_available,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_operations_records(
    conn: &Connection,
    company_id: &str,
) -> Result<Vec<OperationsRecord>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT period, company_id, projects_completed, projects_total,
                resource_hours_used, resource_hours_available
         FROM operations_metrics WHERE company_id = ?1 ORDER BY period, id",
    )?;
    let rows = stmt.query_map(params![company_id], |row| {
        Ok(OperationsRecord {
            period: row.get(0)?,
            company_id: row.get(1)?,
            projects_completed: row.get(2)?,
            projects_total: row.get(3)?,
            resource_hours_used: row.get(4)?,
            resource_hours_available: row.get(5)?,
        })
    })?;
    rows.collect()
}

// ── Sales & Marketing ──────────────────────────────────────────────

pub fn insert_sales_marketing_record(
    conn: &Connection,
    record: &SalesMarketingRecord,
) -> Result<i64, rusqlite::Error> {
    conn.execute(
        "INSERT INTO sales_marketing_metrics (
            company_id, period, lead_generation, conversion_rate, sales_pipeline_value,
            avg_revenue_per_client, marketing_roi, cost_per_lead
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            record.company_id,
            record.period,
            record.lead_generation,
            record.conversion_rate,
            record.sales_pipeline_value,
            record.avg_revenue_per_client,
            record.marketing_roi,
            record.cost_per_lead,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_sales_marketing_records(
    conn: &Connection,
    company_id: &str,
) -> Result<Vec<SalesMarketingRecord>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT period, company_id, lead_generation, conversion_rate, sales_pipeline_value,
                avg_revenue_per_client, marketing_roi, cost_per_lead
         FROM sales_marketing_metrics WHERE company_id = ?1 ORDER BY period, id",
    )?;
    let rows = stmt.query_map(params![company_id], |row| {
        Ok(SalesMarketingRecord {
            period: row.get(0)?,
            company_id: row.get(1)?,
            lead_generation: row.get(2)?,
            conversion_rate: row.get(3)?,
            sales_pipeline_value: row.get(4)?,
            avg_revenue_per_client: row.get(5)?,
            marketing_roi: row.get(6)?,
            cost_per_lead: row.get(7)?,
        })
    })?;
    rows.collect()
}

// ── Membership ─────────────────────────────────────────────────────

pub fn insert_membership_record(
    conn: &Connection,
    record: &MembershipRecord,
) -> Result<i64, rusqlite::Error> {
    conn.execute(
        "INSERT INTO membership_metrics (
            company_id, period, total_members, new_members, members_lost,
            retention_rate, churn_rate, csat, nps
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            record.company_id,
            record.period,
            record.total_members,
            record.new_members,
            record.members_lost,
            record.retention_rate,
            record.churn_rate,
            record.csat,
            record.nps,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_membership_records(
    conn: &Connection,
    company_id: &str,
) -> Result<Vec<MembershipRecord>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT period, company_id, total_members, new_members, members_lost,
                retention_rate, churn_rate, csat, nps
         FROM membership_metrics WHERE company_id = ?1 ORDER BY period, id",
    )?;
    let rows = stmt.query_map(params![company_id], |row| {
        Ok(MembershipRecord {
            period: row.get(0)?,
            company_id: row.get(1)?,
            total_members: row.get(2)?,
            new_members: row.get(3)?,
            members_lost: row.get(4)?,
            retention_rate: row.get(5)?,
            churn_rate: row.get(6)?,
            csat: row.get(7)?,
            nps: row.get(8)?,
        })
    })?;
    rows.collect()
}

/// Number of stored records per domain, across all companies.
pub fn record_counts(conn: &Connection) -> Result<Vec<(Domain, i64)>, rusqlite::Error> {
    Domain::ALL
        .into_iter()
        .map(|domain| -> Result<(Domain, i64), rusqlite::Error> {
            let count: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {}", domain.table()),
                [],
                |row| row.get(0),
            )?;
            Ok((domain, count))
        })
        .collect()
}

// ── Companies ──────────────────────────────────────────────────────

pub fn upsert_company(conn: &Connection, company: &Company) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO companies (id, slug, name, plan)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            slug=excluded.slug, name=excluded.name, plan=excluded.plan",
        params![company.id, company.slug, company.name, company.plan],
    )?;
    Ok(())
}

pub fn get_company(conn: &Connection, id: &str) -> Result<Option<Company>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, slug, name, plan FROM companies WHERE id = ?1",
        params![id],
        |row| {
            Ok(Company {
                id: row.get(0)?,
                slug: row.get(1)?,
                name: row.get(2)?,
                plan: row.get(3)?,
            })
        },
    )
    .optional()
}

pub fn list_companies(conn: &Connection) -> Result<Vec<Company>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT id, slug, name, plan FROM companies ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(Company {
            id: row.get(0)?,
            slug: row.get(1)?,
            name: row.get(2)?,
            plan: row.get(3)?,
        })
    })?;
    rows.collect()
}

// ── Users ──────────────────────────────────────────────────────────

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO users (id, email, name, role, company_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![user.id, user.email, user.name, user.role, user.company_id],
    )?;
    Ok(())
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT id, email, name, role, company_id FROM users ORDER BY company_id, email",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(User {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            role: row.get(3)?,
            company_id: row.get(4)?,
        })
    })?;
    rows.collect()
}

// ── Config ─────────────────────────────────────────────────────────

pub fn get_config(conn: &Connection, key: &str) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row(
        "SELECT value FROM app_config WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

pub fn set_config(conn: &Connection, key: &str, value: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO app_config (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))",
        params![key, value],
    )?;
    Ok(())
}

pub fn list_config(conn: &Connection) -> Result<Vec<(String, String)>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT key, value FROM app_config ORDER BY key")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect()
}

// ── Column conversions ─────────────────────────────────────────────

// Months are stored as `YYYY-MM` text so `ORDER BY period` is chronological.
impl ToSql for MonthKey {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_key()))
    }
}

impl FromSql for MonthKey {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        MonthKey::parse(value.as_str()?).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.key()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Role::parse(value.as_str()?).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Plan {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Plan {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Plan::parse(value.as_str()?).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
