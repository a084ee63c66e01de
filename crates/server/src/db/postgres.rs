use ayur_core::{PatientId, PatientProfile, PatientRecord};
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use serde_json::Value as JsonValue;
use tokio_postgres::Row;

use super::{PatientQuery, SortField};
use crate::error::AppError;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS patients (
    id           TEXT PRIMARY KEY,
    data         JSONB NOT NULL,
    is_active    BOOLEAN NOT NULL DEFAULT TRUE,
    created_at   TIMESTAMPTZ NOT NULL,
    updated_at   TIMESTAMPTZ NOT NULL,
    last_updated TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS patients_active_created ON patients (is_active, created_at DESC);
CREATE INDEX IF NOT EXISTS patients_email ON patients ((lower(data->'contactInfo'->>'email')));
CREATE INDEX IF NOT EXISTS patients_phone ON patients ((data->'contactInfo'->>'phone'));
"#;

const SELECT_COLUMNS: &str = "id, data, is_active, created_at, updated_at, last_updated";

/// Patients stored as a JSONB profile document plus lifecycle columns
#[derive(Clone)]
pub struct PostgresStore {
    pool: Pool,
}

impl PostgresStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        let client = self.pool.get().await?;
        client.batch_execute(SCHEMA).await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        let client = self.pool.get().await?;
        client.simple_query("SELECT 1").await?;
        Ok(())
    }

    pub async fn insert(&self, record: &PatientRecord) -> Result<(), AppError> {
        let client = self.pool.get().await?;
        let data = serde_json::to_value(&record.profile)?;

        client
            .execute(
                "INSERT INTO patients (id, data, is_active, created_at, updated_at, last_updated)
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &record.id.as_str(),
                    &data,
                    &record.is_active,
                    &record.created_at,
                    &record.updated_at,
                    &record.last_updated,
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn find(&self, id: &PatientId) -> Result<Option<PatientRecord>, AppError> {
        let client = self.pool.get().await?;
        let sql = format!("SELECT {SELECT_COLUMNS} FROM patients WHERE id = $1");
        let row = client.query_opt(&sql, &[&id.as_str()]).await?;
        row.as_ref().map(row_to_record).transpose()
    }

    pub async fn save(&self, record: &PatientRecord) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let data = serde_json::to_value(&record.profile)?;

        let updated = client
            .execute(
                "UPDATE patients
                 SET data = $2, is_active = $3, updated_at = $4, last_updated = $5
                 WHERE id = $1",
                &[
                    &record.id.as_str(),
                    &data,
                    &record.is_active,
                    &record.updated_at,
                    &record.last_updated,
                ],
            )
            .await?;
        Ok(updated > 0)
    }

    pub async fn soft_delete(&self, id: &PatientId, now: DateTime<Utc>) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let updated = client
            .execute(
                "UPDATE patients SET is_active = FALSE, updated_at = $2, last_updated = $2
                 WHERE id = $1",
                &[&id.as_str(), &now],
            )
            .await?;
        Ok(updated > 0)
    }

    pub async fn search(&self, query: &PatientQuery) -> Result<(Vec<PatientRecord>, u64), AppError> {
        let client = self.pool.get().await?;
        let pattern = query.search.as_deref().map(like_pattern);
        let filter = "is_active AND ($1::text IS NULL
            OR data->>'name' ILIKE $1
            OR data->'contactInfo'->>'email' ILIKE $1
            OR data->'contactInfo'->>'phone' ILIKE $1)";

        let total: i64 = client
            .query_one(&format!("SELECT COUNT(*) FROM patients WHERE {filter}"), &[&pattern])
            .await?
            .get(0);

        let direction = if query.descending { "DESC" } else { "ASC" };
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM patients WHERE {filter}
             ORDER BY {} {direction}, id {direction}
             LIMIT $2 OFFSET $3",
            order_column(query.sort_by),
        );
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);
        let rows = client.query(&sql, &[&pattern, &limit, &offset]).await?;

        let records = rows.iter().map(row_to_record).collect::<Result<Vec<_>, _>>()?;
        Ok((records, total.max(0) as u64))
    }

    pub async fn contact_in_use(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<bool, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                "SELECT EXISTS (
                    SELECT 1 FROM patients WHERE is_active AND (
                        ($1::text IS NOT NULL AND data->'contactInfo'->>'email' = $1)
                        OR ($2::text IS NOT NULL AND data->'contactInfo'->>'phone' = $2)
                    )
                 )",
                &[&email, &phone],
            )
            .await?;
        Ok(row.get(0))
    }
}

/// Whitelisted ORDER BY expressions
fn order_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::LastUpdated => "last_updated",
        SortField::Name => "data->>'name'",
        SortField::Age => "(data->>'age')::int",
    }
}

/// Substring ILIKE pattern with wildcards in the input escaped
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn row_to_record(row: &Row) -> Result<PatientRecord, AppError> {
    let id: String = row.try_get("id")?;
    let data: JsonValue = row.try_get("data")?;
    let profile: PatientProfile = serde_json::from_value(data)?;

    Ok(PatientRecord {
        id: PatientId::parse(&id)?,
        profile,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        last_updated: row.try_get("last_updated")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("meera"), "%meera%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn test_order_column_whitelist() {
        assert_eq!(order_column(SortField::parse("name")), "data->>'name'");
        assert_eq!(order_column(SortField::parse("DROP TABLE")), "created_at");
    }
}
