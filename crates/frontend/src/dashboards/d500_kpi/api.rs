use contracts::shared::kpi::{normalize_kpi_value, KpiCatalogResponse, KpiPayloadSafe, TimeRange};
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;

/// Catalogue of KPIs, optionally restricted to one dashboard.
pub async fn fetch_catalog(dashboard: Option<&str>) -> Result<KpiCatalogResponse, String> {
    let url = match dashboard {
        Some(d) => api_url(&format!("/api/kpi?dashboard={}", urlencoding::encode(d))),
        None => api_url("/api/kpi"),
    };

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Raw payload for one KPI and range, normalized on arrival.
///
/// `Ok(None)` means there is nothing to show: no stored payload, or one the
/// normalizer rejected. Transport and HTTP failures are `Err`.
pub async fn fetch_payload(
    kpi_key: &str,
    range: TimeRange,
) -> Result<Option<KpiPayloadSafe>, String> {
    let url = api_url(&format!(
        "/api/kpi/{}?range={}",
        urlencoding::encode(kpi_key),
        range.as_str()
    ));

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if response.status() == 404 {
        return Ok(None);
    }
    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let raw: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    Ok(normalize_kpi_value(&raw))
}
