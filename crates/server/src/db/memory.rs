use ayur_core::{PatientId, PatientRecord};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{PatientQuery, SortField};
use crate::error::AppError;

/// Process-local patient store, records kept in insertion order
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<PatientRecord>>>,
}

impl MemoryStore {
    pub async fn insert(&self, record: &PatientRecord) -> Result<(), AppError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(AppError::Conflict(format!("Patient {} already exists", record.id)));
        }
        records.push(record.clone());
        Ok(())
    }

    pub async fn find(&self, id: &PatientId) -> Result<Option<PatientRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| &r.id == id).cloned())
    }

    pub async fn save(&self, record: &PatientRecord) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(stored) => {
                *stored = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn soft_delete(&self, id: &PatientId, now: DateTime<Utc>) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| &r.id == id) {
            Some(stored) => {
                stored.is_active = false;
                stored.last_updated = now;
                stored.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn search(&self, query: &PatientQuery) -> Result<(Vec<PatientRecord>, u64), AppError> {
        let records = self.records.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);

        let mut matches: Vec<&PatientRecord> = records
            .iter()
            .filter(|r| r.is_active)
            .filter(|r| match &needle {
                Some(needle) => matches_search(r, needle),
                None => true,
            })
            .collect();

        matches.sort_by(|a, b| {
            let ord = compare(a, b, query.sort_by).then_with(|| a.id.cmp(&b.id));
            if query.descending { ord.reverse() } else { ord }
        });

        let total = matches.len() as u64;
        let page = matches
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok((page, total))
    }

    pub async fn contact_in_use(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<bool, AppError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| r.is_active).any(|r| {
            let p = &r.profile;
            (email.is_some() && p.email() == email) || (phone.is_some() && p.phone() == phone)
        }))
    }
}

fn matches_search(record: &PatientRecord, needle: &str) -> bool {
    let p = &record.profile;
    [Some(p.name.as_str()), p.email(), p.phone()]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

fn compare(a: &PatientRecord, b: &PatientRecord, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::LastUpdated => a.last_updated.cmp(&b.last_updated),
        SortField::Name => a.profile.name.cmp(&b.profile.name),
        SortField::Age => a.profile.age.cmp(&b.profile.age),
    }
}
