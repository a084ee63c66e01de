use ayur_core::{PatientId, PatientRecord};
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;

use super::memory::MemoryStore;
use super::postgres::PostgresStore;
use super::PatientQuery;
use crate::error::AppError;

/// Repository for patient records.
///
/// PostgreSQL in deployment; the in-memory variant backs local development
/// and tests with the same semantics.
#[derive(Clone)]
pub enum PatientRepository {
    Postgres(PostgresStore),
    Memory(MemoryStore),
}

impl PatientRepository {
    pub fn postgres(pool: Pool) -> Self {
        PatientRepository::Postgres(PostgresStore::new(pool))
    }

    pub fn in_memory() -> Self {
        PatientRepository::Memory(MemoryStore::default())
    }

    pub fn backend(&self) -> &'static str {
        match self {
            PatientRepository::Postgres(_) => "postgres",
            PatientRepository::Memory(_) => "memory",
        }
    }

    /// Create the schema if it does not exist yet
    pub async fn migrate(&self) -> Result<(), AppError> {
        match self {
            PatientRepository::Postgres(store) => store.migrate().await,
            PatientRepository::Memory(_) => Ok(()),
        }
    }

    /// Check the store is reachable
    pub async fn ping(&self) -> Result<(), AppError> {
        match self {
            PatientRepository::Postgres(store) => store.ping().await,
            PatientRepository::Memory(_) => Ok(()),
        }
    }

    /// Insert a new patient
    pub async fn insert(&self, record: &PatientRecord) -> Result<(), AppError> {
        match self {
            PatientRepository::Postgres(store) => store.insert(record).await,
            PatientRepository::Memory(store) => store.insert(record).await,
        }
    }

    /// Get a patient by ID, including soft-deleted ones
    pub async fn find(&self, id: &PatientId) -> Result<Option<PatientRecord>, AppError> {
        match self {
            PatientRepository::Postgres(store) => store.find(id).await,
            PatientRepository::Memory(store) => store.find(id).await,
        }
    }

    /// Get a patient by ID, `None` when absent or soft-deleted
    pub async fn find_active(&self, id: &PatientId) -> Result<Option<PatientRecord>, AppError> {
        Ok(self.find(id).await?.filter(|r| r.is_active))
    }

    /// Overwrite a stored patient; returns false when the id is unknown
    pub async fn save(&self, record: &PatientRecord) -> Result<bool, AppError> {
        match self {
            PatientRepository::Postgres(store) => store.save(record).await,
            PatientRepository::Memory(store) => store.save(record).await,
        }
    }

    /// Mark a patient inactive; returns false when the id is unknown
    pub async fn soft_delete(&self, id: &PatientId, now: DateTime<Utc>) -> Result<bool, AppError> {
        match self {
            PatientRepository::Postgres(store) => store.soft_delete(id, now).await,
            PatientRepository::Memory(store) => store.soft_delete(id, now).await,
        }
    }

    /// One page of active patients plus the total match count
    pub async fn search(&self, query: &PatientQuery) -> Result<(Vec<PatientRecord>, u64), AppError> {
        match self {
            PatientRepository::Postgres(store) => store.search(query).await,
            PatientRepository::Memory(store) => store.search(query).await,
        }
    }

    /// Whether an active patient already uses this email or phone.
    /// Empty values never conflict.
    pub async fn contact_in_use(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<bool, AppError> {
        let email = email.filter(|e| !e.is_empty());
        let phone = phone.filter(|p| !p.is_empty());
        if email.is_none() && phone.is_none() {
            return Ok(false);
        }
        match self {
            PatientRepository::Postgres(store) => store.contact_in_use(email, phone).await,
            PatientRepository::Memory(store) => store.contact_in_use(email, phone).await,
        }
    }
}
