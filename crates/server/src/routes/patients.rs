//! Patient record endpoints

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use ayur_core::summary::PatientSummary;
use ayur_core::{Envelope, Pagination, PatientId, PatientRecord, validate_patient};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::{json_body, patient_id, patient_not_found};
use crate::db::{PatientQuery, SortField};
use crate::error::AppError;
use crate::state::AppState;

const MAX_PAGE_SIZE: u64 = 100;
pub const PARTIAL_UPDATE_HEADER: &str = "x-partial-update";

/// Raw listing parameters; anything unparseable falls back to the default
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    page: Option<String>,
    limit: Option<String>,
    search: Option<String>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

impl ListParams {
    fn into_query(self) -> PatientQuery {
        let defaults = PatientQuery::default();
        let page = self
            .page
            .and_then(|p| p.trim().parse::<u64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(defaults.page);
        let limit = self
            .limit
            .and_then(|l| l.trim().parse::<u64>().ok())
            .filter(|l| *l >= 1)
            .map_or(defaults.limit, |l| l.min(MAX_PAGE_SIZE));

        PatientQuery {
            page,
            limit,
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            sort_by: self.sort_by.as_deref().map_or(SortField::default(), SortField::parse),
            descending: self.sort_order.as_deref() != Some("asc"),
        }
    }
}

fn view_json(record: &PatientRecord) -> Result<JsonValue, AppError> {
    Ok(serde_json::to_value(record.view())?)
}

async fn load_active(state: &AppState, raw_id: &str) -> Result<PatientRecord, AppError> {
    let id = patient_id(raw_id)?;
    state.repo.find_active(&id).await?.ok_or_else(patient_not_found)
}

/// GET /api/patients
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.into_query();
    let (records, total) = state.repo.search(&query).await?;

    let data = records
        .iter()
        .map(view_json)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(
        Envelope::ok(JsonValue::Array(data))
            .with_pagination(Pagination::new(query.page, query.limit, total)),
    ))
}

/// POST /api/patients
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_body(body)?;
    let profile = validate_patient(&body)?;

    if state.repo.contact_in_use(profile.email(), profile.phone()).await? {
        return Err(AppError::Conflict(
            "Patient with this email or phone already exists".to_string(),
        ));
    }

    let now = Utc::now();
    let record = PatientRecord::new(PatientId::generate(now), profile, now);
    state.repo.insert(&record).await?;

    tracing::info!(patient_id = %record.id, "Created patient");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(view_json(&record)?).with_message("Patient created successfully")),
    ))
}

/// GET /api/patients/{id}
pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = load_active(&state, &id).await?;
    Ok(Json(Envelope::ok(view_json(&record)?)))
}

/// PUT /api/patients/{id}
///
/// With `X-Partial-Update: true` the body is merged over the stored document
/// and only checked for type shape; otherwise it must be a complete, valid
/// patient.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let mut record = load_active(&state, &id).await?;
    let body = json_body(body)?;
    let now = Utc::now();

    let partial = headers
        .get(PARTIAL_UPDATE_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));

    if partial {
        record.merge_partial(&body, now)?;
    } else {
        record.replace(validate_patient(&body)?, now);
    }

    if !state.repo.save(&record).await? {
        return Err(patient_not_found());
    }

    tracing::info!(patient_id = %record.id, partial, "Updated patient");

    Ok(Json(
        Envelope::ok(view_json(&record)?).with_message("Patient updated successfully"),
    ))
}

/// DELETE /api/patients/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = load_active(&state, &id).await?;
    if !state.repo.soft_delete(&record.id, Utc::now()).await? {
        return Err(patient_not_found());
    }

    tracing::info!(patient_id = %record.id, "Soft-deleted patient");
    Ok(Json(Envelope::<JsonValue>::done("Patient deleted successfully")))
}

/// GET /api/patients/{id}/summary
pub async fn summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = load_active(&state, &id).await?;
    Ok(Json(Envelope::ok(PatientSummary::from(&record))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: &str, limit: &str) -> ListParams {
        ListParams {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
            ..ListParams::default()
        }
    }

    #[test]
    fn test_list_params_defaults() {
        let query = ListParams::default().into_query();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert!(query.descending);
        assert!(query.search.is_none());
    }

    #[test]
    fn test_list_params_clamped() {
        let query = params("0", "500").into_query();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 100);

        let query = params("abc", "-3").into_query();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);

        let query = params("3", "20").into_query();
        assert_eq!(query.offset(), 40);
    }

    #[test]
    fn test_list_params_sorting() {
        let query = ListParams {
            sort_by: Some("name".to_string()),
            sort_order: Some("asc".to_string()),
            search: Some("  ".to_string()),
            ..ListParams::default()
        }
        .into_query();
        assert_eq!(query.sort_by, SortField::Name);
        assert!(!query.descending);
        assert!(query.search.is_none());
    }
}
