mod memory;
mod postgres;
mod repository;

pub use repository::PatientRepository;

use deadpool_postgres::{Config, Pool, Runtime};
use tokio_postgres::NoTls;

/// Create a connection pool from a database URL
pub async fn create_pool(database_url: &str) -> Result<Pool, deadpool_postgres::CreatePoolError> {
    let mut cfg = Config::new();
    cfg.url = Some(database_url.to_string());
    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
}

/// Sortable patient fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    LastUpdated,
    Name,
    Age,
}

impl SortField {
    /// Unknown names sort by creation time
    pub fn parse(raw: &str) -> Self {
        match raw {
            "updatedAt" => SortField::UpdatedAt,
            "lastUpdated" => SortField::LastUpdated,
            "name" => SortField::Name,
            "age" => SortField::Age,
            _ => SortField::CreatedAt,
        }
    }
}

/// One page of an active-patient listing
#[derive(Debug, Clone)]
pub struct PatientQuery {
    /// 1-based
    pub page: u64,
    pub limit: u64,
    /// Case-insensitive substring over name, email and phone
    pub search: Option<String>,
    pub sort_by: SortField,
    pub descending: bool,
}

impl Default for PatientQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
            sort_by: SortField::CreatedAt,
            descending: true,
        }
    }
}

impl PatientQuery {
    /// Rows to skip; saturates for absurd page numbers
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}
