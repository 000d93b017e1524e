pub mod repository;

use rusqlite_migration::{Migrations, M};

use crate::error::{Error, Result};
use crate::records::{
    Domain, FinancialRecord, MembershipRecord, OperationsRecord, SalesMarketingRecord,
};
use crate::source::RecordSource;
use crate::tenant::{Company, User};

/// Database wraps two `tokio_rusqlite::Connection` instances (writer + reader)
/// using WAL mode for concurrent access. The writer serializes writes via
/// `tokio_rusqlite`'s internal channel; the reader can proceed without blocking.
#[derive(Clone)]
pub struct Database {
    writer: tokio_rusqlite::Connection,
    reader: tokio_rusqlite::Connection,
}

impl Database {
    /// Open the database at the default path (`~/.bizdash/bizdash.db`).
    pub async fn open() -> Result<Self> {
        let dir = dirs::home_dir()
            .ok_or_else(|| Error::Config("cannot determine home directory".into()))?
            .join(".bizdash");
        std::fs::create_dir_all(&dir).map_err(|e| Error::Config(e.to_string()))?;
        Self::open_at(dir.join("bizdash.db")).await
    }

    /// Open the database at the given path.
    pub async fn open_at(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        log::debug!("opening database at {}", path.display());

        let writer = tokio_rusqlite::Connection::open(&path).await?;
        Self::init_writer(&writer).await?;

        let reader = tokio_rusqlite::Connection::open(&path).await?;
        Self::init_reader(&reader).await?;

        Ok(Self { writer, reader })
    }

    /// Open an in-memory database (for testing).
    pub async fn open_memory() -> Result<Self> {
        let writer = tokio_rusqlite::Connection::open_in_memory().await?;
        Self::init_writer(&writer).await?;

        // In-memory DBs are per-connection, so reader and writer share one.
        Ok(Self {
            reader: writer.clone(),
            writer,
        })
    }

    async fn init_writer(conn: &tokio_rusqlite::Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;\
                 PRAGMA foreign_keys=ON;\
                 PRAGMA busy_timeout=5000;",
            )
            .map_err(|e| e.to_string())?;
            let migrations =
                Migrations::new(vec![M::up(include_str!("migrations/001_initial.sql"))]);
            migrations.to_latest(conn).map_err(|e| e.to_string())?;
            Ok::<(), String>(())
        })
        .await
        .map_err(|e| Error::Migration(e.to_string()))
    }

    async fn init_reader(conn: &tokio_rusqlite::Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;\
                 PRAGMA foreign_keys=ON;\
                 PRAGMA busy_timeout=5000;",
            )?;
            Ok::<(), rusqlite::Error>(())
        })
        .await?;
        Ok(())
    }

    /// Get a reference to the writer connection.
    pub fn writer(&self) -> &tokio_rusqlite::Connection {
        &self.writer
    }

    /// Get a reference to the reader connection.
    pub fn reader(&self) -> &tokio_rusqlite::Connection {
        &self.reader
    }

    /// Append records in one transaction; either all land or none do.
    async fn append<R, F>(&self, records: Vec<R>, insert: F) -> Result<usize>
    where
        R: Send + 'static,
        F: Fn(&rusqlite::Connection, &R) -> std::result::Result<i64, rusqlite::Error>
            + Send
            + 'static,
    {
        let count = self
            .writer
            .call(move |conn| {
                let tx = conn.transaction()?;
                for record in &records {
                    insert(&tx, record)?;
                }
                tx.commit()?;
                Ok::<usize, rusqlite::Error>(records.len())
            })
            .await?;
        Ok(count)
    }

    pub async fn append_financial(&self, records: Vec<FinancialRecord>) -> Result<usize> {
        self.append(records, repository::insert_financial_record).await
    }

    pub async fn append_operations(&self, records: Vec<OperationsRecord>) -> Result<usize> {
        self.append(records, repository::insert_operations_record).await
    }

    pub async fn append_sales_marketing(
        &self,
        records: Vec<SalesMarketingRecord>,
    ) -> Result<usize> {
        self.append(records, repository::insert_sales_marketing_record)
            .await
    }

    pub async fn append_membership(&self, records: Vec<MembershipRecord>) -> Result<usize> {
        self.append(records, repository::insert_membership_record).await
    }

    /// Decode a JSON array of `domain` records and append them.
    /// Nothing is written if any element fails to decode.
    pub async fn import_json(&self, domain: Domain, json: &str) -> Result<usize> {
        let count = match domain {
            Domain::Financial => self.append_financial(serde_json::from_str(json)?).await?,
            Domain::Operations => self.append_operations(serde_json::from_str(json)?).await?,
            Domain::SalesMarketing => {
                self.append_sales_marketing(serde_json::from_str(json)?)
                    .await?
            }
            Domain::Membership => self.append_membership(serde_json::from_str(json)?).await?,
        };
        log::info!("imported {count} {domain} records");
        Ok(count)
    }

    pub async fn upsert_company(&self, company: Company) -> Result<()> {
        self.writer
            .call(move |conn| repository::upsert_company(conn, &company))
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn company(&self, id: &str) -> Result<Option<Company>> {
        self.reader
            .call({
                let id = id.to_string();
                move |conn| repository::get_company(conn, &id)
            })
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn add_user(&self, user: User) -> Result<()> {
        self.writer
            .call(move |conn| repository::insert_user(conn, &user))
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn record_counts(&self) -> Result<Vec<(Domain, i64)>> {
        self.reader
            .call(|conn| repository::record_counts(conn))
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    // ── Config ─────────────────────────────────────────────────────

    pub async fn config_get(&self, key: &str) -> Result<Option<String>> {
        self.reader
            .call({
                let key = key.to_string();
                move |conn| repository::get_config(conn, &key)
            })
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn config_set(&self, key: &str, value: &str) -> Result<()> {
        self.writer
            .call({
                let key = key.to_string();
                let value = value.to_string();
                move |conn| repository::set_config(conn, &key, &value)
            })
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn config_list(&self) -> Result<Vec<(String, String)>> {
        self.reader
            .call(|conn| repository::list_config(conn))
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }
}

impl RecordSource for Database {
    async fn financial_records(&self, company_id: &str) -> Result<Vec<FinancialRecord>> {
        let company_id = company_id.to_string();
        let records = self
            .reader
            .call(move |conn| repository::list_financial_records(conn, &company_id))
            .await?;
        Ok(records)
    }

    async fn operations_records(&self, company_id: &str) -> Result<Vec<OperationsRecord>> {
        let company_id = company_id.to_string();
        let records = self
            .reader
            .call(move |conn| repository::list_operations_records(conn, &company_id))
            .await?;
        Ok(records)
    }

    async fn sales_marketing_records(
        &self,
        company_id: &str,
    ) -> Result<Vec<SalesMarketingRecord>> {
        let company_id = company_id.to_string();
        let records = self
            .reader
            .call(move |conn| repository::list_sales_marketing_records(conn, &company_id))
            .await?;
        Ok(records)
    }

    async fn membership_records(&self, company_id: &str) -> Result<Vec<MembershipRecord>> {
        let company_id = company_id.to_string();
        let records = self
            .reader
            .call(move |conn| repository::list_membership_records(conn, &company_id))
            .await?;
        Ok(records)
    }

    async fn companies(&self) -> Result<Vec<Company>> {
        let companies = self.reader.call(|conn| repository::list_companies(conn)).await?;
        Ok(companies)
    }

    async fn users(&self) -> Result<Vec<User>> {
        let users = self.reader.call(|conn| repository::list_users(conn)).await?;
        Ok(users)
    }
}
