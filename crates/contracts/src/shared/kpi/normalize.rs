//! Raw KPI payload -> render-safe payload.
//!
//! The only rejection is a missing `meta`: without an identity nothing can be
//! rendered, so the caller gets `None` and shows its empty state. Every other
//! malformation is absorbed field by field.

use serde_json::Value;

use super::coerce::{
    coerce_array, coerce_number, coerce_number_opt, coerce_optional_string, coerce_string,
    coerce_string_opt,
};
use super::meta::{KpiMeta, KpiVariant};
use super::payload::{
    CategoryPoint, HeatmapPoint, KpiPayloadRaw, KpiPayloadSafe, LatestValue, TableCell, TableRow,
    TimeseriesPoint,
};

/// Category label fields, highest priority first.
const CATEGORY_LABEL_FIELDS: [&str; 3] = ["category", "name", "label"];

/// Normalize a raw payload. `None` in, or no `meta`, gives `None`.
pub fn normalize_kpi_payload(raw: Option<&KpiPayloadRaw>) -> Option<KpiPayloadSafe> {
    let raw = raw?;
    let meta = match raw.meta.as_ref() {
        None | Some(Value::Null) => return None,
        Some(meta) => normalize_meta(meta),
    };

    Some(KpiPayloadSafe {
        meta,
        latest: normalize_latest(raw.latest.as_ref()),
        timeseries: coerce_array(raw.timeseries.as_ref())
            .iter()
            .map(normalize_timeseries_point)
            .collect(),
        categories: coerce_array(raw.categories.as_ref())
            .iter()
            .filter_map(normalize_category_point)
            .collect(),
        heatmap: coerce_array(raw.heatmap.as_ref())
            .iter()
            .map(normalize_heatmap_point)
            .collect(),
        table_rows: coerce_array(raw.table_rows.as_ref())
            .iter()
            .map(normalize_table_row)
            .collect(),
        generated_at: coerce_optional_string(raw.generated_at.as_ref()),
    })
}

/// Normalize any JSON document; non-objects are rejected like a missing `meta`.
pub fn normalize_kpi_value(value: &Value) -> Option<KpiPayloadSafe> {
    let raw = KpiPayloadRaw::from_value(value)?;
    normalize_kpi_payload(Some(&raw))
}

/// Coerce `meta`. A non-object meta yields empty fields and an unknown variant.
pub fn normalize_meta(meta: &Value) -> KpiMeta {
    let field = |name: &str| meta.get(name);
    KpiMeta {
        kpi_key: coerce_string_opt(field("kpi_key")),
        name: coerce_string_opt(field("name")),
        variant: KpiVariant::parse(&coerce_string_opt(field("variant"))),
        unit: coerce_optional_string(field("unit")),
        x_axis: coerce_optional_string(field("x_axis")),
        y_axis: coerce_optional_string(field("y_axis")),
        config: field("config").cloned().unwrap_or(Value::Null),
        dashboard: coerce_optional_string(field("dashboard")),
    }
}

/// `latest` survives only as an object that carries a `value` key.
fn normalize_latest(latest: Option<&Value>) -> Option<LatestValue> {
    let value = latest?.as_object()?.get("value")?;
    Some(LatestValue {
        value: coerce_number(value),
    })
}

fn normalize_timeseries_point(p: &Value) -> TimeseriesPoint {
    TimeseriesPoint {
        ts: coerce_optional_string(p.get("ts")),
        bucket: coerce_optional_string(p.get("bucket")),
        series: coerce_optional_string(p.get("series")),
        value: coerce_number_opt(p.get("value")),
    }
}

/// `None` when no label field yields a non-empty string.
fn normalize_category_point(p: &Value) -> Option<CategoryPoint> {
    let category = CATEGORY_LABEL_FIELDS
        .iter()
        .map(|field| coerce_string_opt(p.get(*field)))
        .find(|label| !label.is_empty())?;

    Some(CategoryPoint {
        category,
        value: coerce_number_opt(p.get("value")),
    })
}

fn normalize_heatmap_point(p: &Value) -> HeatmapPoint {
    HeatmapPoint {
        x: coerce_string_opt(p.get("x")),
        y: coerce_string_opt(p.get("y")),
        value: coerce_number_opt(p.get("value")),
    }
}

/// Keep null, numbers and strings; everything else becomes its text form.
pub fn normalize_table_cell(v: &Value) -> TableCell {
    match v {
        Value::Null => TableCell::Null,
        Value::Number(n) => TableCell::Number(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => TableCell::Text(s.clone()),
        other => TableCell::Text(coerce_string(other)),
    }
}

/// Non-object rows have no columns.
pub fn normalize_table_row(row: &Value) -> TableRow {
    match row.as_object() {
        Some(obj) => obj
            .iter()
            .map(|(column, cell)| (column.clone(), normalize_table_cell(cell)))
            .collect(),
        None => TableRow::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta() -> Value {
        json!({"kpi_key": "on_time_departure", "name": "On-time departures", "variant": "line", "unit": "%"})
    }

    #[test]
    fn test_null_propagation() {
        assert_eq!(normalize_kpi_payload(None), None);
        assert_eq!(normalize_kpi_payload(Some(&KpiPayloadRaw::default())), None);
        assert_eq!(normalize_kpi_value(&json!(null)), None);
        assert_eq!(normalize_kpi_value(&json!({})), None);
        assert_eq!(normalize_kpi_value(&json!({"meta": null, "timeseries": []})), None);
        assert_eq!(normalize_kpi_value(&json!("payload")), None);
    }

    #[test]
    fn test_totality_over_malformed_fields() {
        let inputs = vec![
            json!({"meta": meta()}),
            json!({"meta": meta(), "latest": 5, "timeseries": {}, "categories": "x", "heatmap": 3, "tableRows": null}),
            json!({"meta": meta(), "timeseries": [null, 1, "a", [], {"value": {"deep": true}}]}),
            json!({"meta": meta(), "categories": [null, {"value": "7"}], "heatmap": [false, {}]}),
            json!({"meta": meta(), "tableRows": [1, null, "row", {"k": [1, {"a": null}]}]}),
            json!({"meta": "not an object"}),
            json!({"meta": 0, "generated_at": 1700000000}),
            json!({"meta": [], "latest": {"value": []}}),
        ];
        for input in inputs {
            assert!(normalize_kpi_value(&input).is_some(), "input {input}");
        }
    }

    #[test]
    fn test_array_defaulting() {
        let safe = normalize_kpi_value(&json!({"meta": meta(), "timeseries": "not-an-array"})).unwrap();
        assert!(safe.timeseries.is_empty());
        assert!(safe.categories.is_empty());
        assert!(safe.heatmap.is_empty());
        assert!(safe.table_rows.is_empty());
        assert_eq!(safe.latest, None);
        assert!(safe.is_empty());
    }

    #[test]
    fn test_meta_fields_coerced() {
        let safe = normalize_kpi_value(&json!({
            "meta": {"kpi_key": 42, "name": null, "variant": "Dual-Axis", "unit": "", "config": {"xKey": "station"}, "dashboard": "ops"}
        }))
        .unwrap();
        assert_eq!(safe.meta.kpi_key, "42");
        assert_eq!(safe.meta.name, "");
        assert_eq!(safe.meta.variant, KpiVariant::DualAxis);
        assert_eq!(safe.meta.unit, None);
        assert_eq!(safe.meta.config, json!({"xKey": "station"}));
        assert_eq!(safe.meta.dashboard, Some("ops".to_string()));
    }

    #[test]
    fn test_non_object_meta_is_coerced_not_rejected() {
        let safe = normalize_kpi_value(&json!({"meta": "broken"})).unwrap();
        assert_eq!(safe.meta.kpi_key, "");
        assert_eq!(safe.meta.variant, KpiVariant::Unknown(String::new()));
        assert_eq!(safe.meta.config, Value::Null);
    }

    #[test]
    fn test_latest_requires_value_key() {
        let with = |latest: Value| normalize_kpi_value(&json!({"meta": meta(), "latest": latest})).unwrap().latest;
        assert_eq!(with(json!({"value": "81.5"})), Some(LatestValue { value: 81.5 }));
        assert_eq!(with(json!({"value": null})), Some(LatestValue { value: 0.0 }));
        assert_eq!(with(json!({"value": "n/a"})), Some(LatestValue { value: 0.0 }));
        assert_eq!(with(json!({"val": 3})), None);
        assert_eq!(with(json!(42)), None);
    }

    #[test]
    fn test_timeseries_points() {
        let safe = normalize_kpi_value(&json!({
            "meta": meta(),
            "timeseries": [
                {"ts": "2024-01-05", "value": "12"},
                {"bucket": "W02", "series": "HEL", "value": 4.5, "extra": true},
                {"ts": null, "value": "oops"},
                7
            ]
        }))
        .unwrap();
        assert_eq!(safe.timeseries.len(), 4);
        assert_eq!(safe.timeseries[0].ts.as_deref(), Some("2024-01-05"));
        assert_eq!(safe.timeseries[0].value, 12.0);
        assert_eq!(safe.timeseries[1].bucket.as_deref(), Some("W02"));
        assert_eq!(safe.timeseries[1].series.as_deref(), Some("HEL"));
        assert_eq!(safe.timeseries[2].ts, None);
        assert_eq!(safe.timeseries[2].value, 0.0);
        assert_eq!(safe.timeseries[3].value, 0.0);
    }

    #[test]
    fn test_category_label_fallback_and_drop() {
        let safe = normalize_kpi_value(&json!({
            "meta": meta(),
            "categories": [
                {"category": null, "name": null, "label": null, "value": 5},
                {"name": "Fleet A", "value": 5},
                {"label": "Fleet B", "value": "3"},
                {"category": "", "name": "Fleet C", "value": 1},
                {"category": 2024, "value": 9}
            ]
        }))
        .unwrap();
        assert_eq!(
            safe.categories,
            vec![
                CategoryPoint { category: "Fleet A".into(), value: 5.0 },
                CategoryPoint { category: "Fleet B".into(), value: 3.0 },
                CategoryPoint { category: "Fleet C".into(), value: 1.0 },
                CategoryPoint { category: "2024".into(), value: 9.0 },
            ]
        );
    }

    #[test]
    fn test_heatmap_points() {
        let safe = normalize_kpi_value(&json!({
            "meta": meta(),
            "heatmap": [{"x": "Mon", "y": 6, "value": "3"}, {"value": 1}]
        }))
        .unwrap();
        assert_eq!(
            safe.heatmap,
            vec![
                HeatmapPoint { x: "Mon".into(), y: "6".into(), value: 3.0 },
                HeatmapPoint { x: "".into(), y: "".into(), value: 1.0 },
            ]
        );
    }

    #[test]
    fn test_table_cell_safety() {
        let safe = normalize_kpi_value(&json!({
            "meta": meta(),
            "tableRows": [{"a": {"nested": 1}, "b": 3, "c": null, "d": true, "e": [1, 2], "f": "HEL"}]
        }))
        .unwrap();
        let row = &safe.table_rows[0];
        assert_eq!(row.get("a"), Some(&TableCell::Text(r#"{"nested":1}"#.into())));
        assert_eq!(row.get("b"), Some(&TableCell::Number(3.0)));
        assert_eq!(row.get("c"), Some(&TableCell::Null));
        assert_eq!(row.get("d"), Some(&TableCell::Text("true".into())));
        assert_eq!(row.get("e"), Some(&TableCell::Text("[1,2]".into())));
        assert_eq!(row.get("f"), Some(&TableCell::Text("HEL".into())));
        let cols: Vec<&str> = row.columns().collect();
        assert_eq!(cols, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_non_object_table_rows_are_empty() {
        let safe = normalize_kpi_value(&json!({"meta": meta(), "tableRows": [1, "x"]})).unwrap();
        assert_eq!(safe.table_rows.len(), 2);
        assert!(safe.table_rows.iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_generated_at_passthrough() {
        let safe = normalize_kpi_value(&json!({"meta": meta(), "generated_at": "2024-01-05T10:00:00Z"})).unwrap();
        assert_eq!(safe.generated_at.as_deref(), Some("2024-01-05T10:00:00Z"));
        let safe = normalize_kpi_value(&json!({"meta": meta()})).unwrap();
        assert_eq!(safe.generated_at, None);
    }

    #[test]
    fn test_deterministic() {
        let input = json!({
            "meta": meta(),
            "latest": {"value": "3"},
            "categories": [{"name": "A", "value": 1}],
            "tableRows": [{"x": {"y": 1}}]
        });
        assert_eq!(normalize_kpi_value(&input), normalize_kpi_value(&input));
    }

    #[test]
    fn test_safe_payload_round_trips_through_json() {
        let safe = normalize_kpi_value(&json!({
            "meta": meta(),
            "tableRows": [{"station": "HEL", "delay": 4}]
        }))
        .unwrap();
        let text = serde_json::to_string(&safe).unwrap();
        let back: KpiPayloadSafe = serde_json::from_str(&text).unwrap();
        assert_eq!(back, safe);
    }
}
