use std::collections::BTreeMap;
use std::str::FromStr;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::shared::kpi::{
    normalize_kpi_value, normalize_meta, KpiCatalogResponse, KpiMeta, KpiPayloadSafe, TimeRange,
};
use serde::Deserialize;

use crate::shared::data::kpi_storage;

#[derive(Debug, Deserialize, Default)]
pub struct RangeQuery {
    pub range: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CatalogQuery {
    pub dashboard: Option<String>,
}

/// Missing or blank `range` means the default window; anything unknown is a 400.
fn parse_range(query: &RangeQuery) -> Result<TimeRange, StatusCode> {
    match query.range.as_deref().map(str::trim) {
        None | Some("") => Ok(TimeRange::default()),
        Some(s) => TimeRange::from_str(s).map_err(|e| {
            tracing::warn!("{}", e);
            StatusCode::BAD_REQUEST
        }),
    }
}

/// One `KpiMeta` per stored key, taken from the first stored range; keys without `meta` are skipped.
fn build_catalog(rows: &[kpi_storage::Model], dashboard: Option<&str>) -> Vec<KpiMeta> {
    let mut by_key: BTreeMap<&str, KpiMeta> = BTreeMap::new();
    for row in rows {
        if by_key.contains_key(row.kpi_key.as_str()) {
            continue;
        }
        let raw = match row.raw_value() {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Stored payload for {} is not JSON: {}", row.kpi_key, e);
                continue;
            }
        };
        match raw.get("meta") {
            Some(meta) if !meta.is_null() => {
                let mut meta = normalize_meta(meta);
                if meta.kpi_key.is_empty() {
                    meta.kpi_key = row.kpi_key.clone();
                }
                by_key.insert(row.kpi_key.as_str(), meta);
            }
            _ => tracing::warn!("Stored payload for {} has no meta", row.kpi_key),
        }
    }

    by_key
        .into_values()
        .filter(|meta| match dashboard {
            Some(d) => meta.dashboard.as_deref() == Some(d),
            None => true,
        })
        .collect()
}

/// GET /api/kpi
pub async fn list_catalog(
    Query(query): Query<CatalogQuery>,
) -> Result<Json<KpiCatalogResponse>, StatusCode> {
    let rows = kpi_storage::list_all().await.map_err(|e| {
        tracing::error!("Failed to list KPI payloads: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let dashboard = query.dashboard.as_deref().filter(|d| !d.is_empty());
    Ok(Json(KpiCatalogResponse {
        kpis: build_catalog(&rows, dashboard),
    }))
}

async fn load_raw(kpi_key: &str, range: TimeRange) -> Result<serde_json::Value, StatusCode> {
    let row = kpi_storage::get(kpi_key, range)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get KPI payload {}: {}", kpi_key, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    row.raw_value().map_err(|e| {
        tracing::error!("Failed to parse stored payload {}: {}", kpi_key, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// GET /api/kpi/:kpi_key?range=30d
pub async fn get_raw(
    Path(kpi_key): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let range = parse_range(&query)?;
    Ok(Json(load_raw(&kpi_key, range).await?))
}

/// GET /api/kpi/:kpi_key/normalized?range=30d
pub async fn get_normalized(
    Path(kpi_key): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<KpiPayloadSafe>, StatusCode> {
    let range = parse_range(&query)?;
    let raw = load_raw(&kpi_key, range).await?;
    normalize_kpi_value(&raw).map(Json).ok_or_else(|| {
        tracing::warn!("Stored payload {} has no usable meta", kpi_key);
        StatusCode::UNPROCESSABLE_ENTITY
    })
}

/// PUT /api/kpi/:kpi_key?range=30d
pub async fn put_raw(
    Path(kpi_key): Path<String>,
    Query(query): Query<RangeQuery>,
    Json(body): Json<serde_json::Value>,
) -> Result<StatusCode, StatusCode> {
    let range = parse_range(&query)?;
    if kpi_key.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    kpi_storage::upsert(&kpi_key, range, &body)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store KPI payload {}: {}", kpi_key, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    tracing::info!("Stored KPI payload {} ({})", kpi_key, range.as_str());
    Ok(StatusCode::NO_CONTENT)
}
