//! `KpiPayloadSafe` -> `ChartSpec`, one builder per chart family.

use crate::shared::kpi::{CategoryPoint, KpiMeta, KpiPayloadSafe, KpiVariant};
use crate::shared::presentation::{
    delta_percent, normalize_percent, parse_axis_timestamp, MetadataRowFilter,
};

use super::spec::{AxisBinding, AxisSpec, ChartKind, ChartPoint, ChartSeries, ChartSpec, Headline};

/// Per-KPI knobs read from `meta.config`, plus the injected metadata-row rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    /// Label column when plotting table rows.
    pub x_key: String,
    /// Value column when plotting table rows.
    pub y_key: String,
    /// Gauge full-scale value; without it the gauge uses percent normalization.
    pub gauge_max: Option<f64>,
    pub row_filter: MetadataRowFilter,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            x_key: "category".to_string(),
            y_key: "value".to_string(),
            gauge_max: None,
            row_filter: MetadataRowFilter::default(),
        }
    }
}

impl ChartOptions {
    pub fn from_meta(meta: &KpiMeta) -> Self {
        let defaults = Self::default();
        Self {
            x_key: meta.config_str(&["xKey", "x_key"]).unwrap_or(defaults.x_key),
            y_key: meta.config_str(&["yKey", "y_key"]).unwrap_or(defaults.y_key),
            gauge_max: meta
                .config_f64(&["max", "gauge_max"])
                .filter(|m| *m > 0.0),
            row_filter: defaults.row_filter,
        }
    }

    pub fn with_row_filter(mut self, row_filter: MetadataRowFilter) -> Self {
        self.row_filter = row_filter;
        self
    }
}

/// Chart description for a payload, or `None` for variants that are not charts
/// (`table`, unknown).
pub fn build_chart_spec(payload: &KpiPayloadSafe, options: &ChartOptions) -> Option<ChartSpec> {
    let spec = match payload.meta.variant {
        KpiVariant::Line => build_series_chart(payload, ChartKind::Line),
        KpiVariant::Bar => build_bar_chart(payload, options),
        KpiVariant::DualAxis => build_dual_axis_chart(payload),
        KpiVariant::Pie => build_pie_chart(payload, options),
        KpiVariant::Heatmap => build_heatmap_chart(payload, options),
        KpiVariant::Gauge => build_gauge_chart(payload, options),
        KpiVariant::Numeric => build_headline_chart(payload, ChartKind::Numeric),
        KpiVariant::Delta => build_delta_chart(payload),
        KpiVariant::Table | KpiVariant::Unknown(_) => return None,
    };
    Some(spec)
}

fn base_spec(meta: &KpiMeta, kind: ChartKind) -> ChartSpec {
    ChartSpec {
        kind,
        title: meta.display_name().to_string(),
        series: Vec::new(),
        x_keys: Vec::new(),
        time_axis: false,
        x_axis: AxisSpec::fixed(meta.x_axis.clone(), 0.0, 1.0),
        y_axis: AxisSpec::fit(meta.y_axis.clone(), std::iter::empty()),
        y2_axis: None,
        unit: meta.unit.clone(),
        headline: None,
    }
}

/// Group timeseries points by `series` in first-seen order.
fn group_timeseries(payload: &KpiPayloadSafe) -> Vec<ChartSeries> {
    let default_name = payload.meta.display_name().to_string();
    let mut series: Vec<ChartSeries> = Vec::new();

    for point in &payload.timeseries {
        let name = point.series.clone().unwrap_or_else(|| default_name.clone());
        let chart_point = ChartPoint {
            label: point.x_label().to_string(),
            value: point.value,
        };
        match series.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.points.push(chart_point),
            None => series.push(ChartSeries {
                name,
                axis: AxisBinding::Left,
                points: vec![chart_point],
            }),
        }
    }
    series
}

/// Distinct x keys across all series. When every key is a date or timestamp
/// they are put in time order and the axis is flagged as a time axis;
/// otherwise first-seen order is kept.
fn x_axis_keys(series: &[ChartSeries]) -> (Vec<String>, bool) {
    let mut keys: Vec<String> = Vec::new();
    for point in series.iter().flat_map(|s| &s.points) {
        if !keys.contains(&point.label) {
            keys.push(point.label.clone());
        }
    }

    let stamps: Option<Vec<_>> = keys.iter().map(|k| parse_axis_timestamp(k)).collect();
    match stamps {
        Some(stamps) if !keys.is_empty() => {
            let mut keyed: Vec<_> = stamps.into_iter().zip(keys).collect();
            keyed.sort_by_key(|(stamp, _)| *stamp);
            (keyed.into_iter().map(|(_, key)| key).collect(), true)
        }
        _ => (keys, false),
    }
}

fn finish_series_chart(mut spec: ChartSpec, series: Vec<ChartSeries>) -> ChartSpec {
    (spec.x_keys, spec.time_axis) = x_axis_keys(&series);
    spec.x_axis = AxisSpec::fixed(
        spec.x_axis.label.clone(),
        0.0,
        spec.x_keys.len().saturating_sub(1) as f64,
    );
    spec.y_axis = AxisSpec::fit(
        spec.y_axis.label.clone(),
        series
            .iter()
            .filter(|s| s.axis == AxisBinding::Left)
            .flat_map(|s| s.points.iter().map(|p| p.value)),
    );
    if series.iter().any(|s| s.axis == AxisBinding::Right) {
        spec.y2_axis = Some(AxisSpec::fit(
            None,
            series
                .iter()
                .filter(|s| s.axis == AxisBinding::Right)
                .flat_map(|s| s.points.iter().map(|p| p.value)),
        ));
    }
    spec.series = series;
    spec
}

fn build_series_chart(payload: &KpiPayloadSafe, kind: ChartKind) -> ChartSpec {
    let spec = base_spec(&payload.meta, kind);
    finish_series_chart(spec, group_timeseries(payload))
}

fn category_series(name: &str, points: Vec<CategoryPoint>) -> ChartSeries {
    ChartSeries {
        name: name.to_string(),
        axis: AxisBinding::Left,
        points: points
            .into_iter()
            .map(|p| ChartPoint {
                label: p.category,
                value: p.value,
            })
            .collect(),
    }
}

/// Categories, else table rows projected through `x_key`/`y_key`, metadata rows removed.
fn plottable_categories(payload: &KpiPayloadSafe, options: &ChartOptions) -> Vec<CategoryPoint> {
    if !payload.categories.is_empty() {
        return options.row_filter.retain_categories(&payload.categories);
    }
    options
        .row_filter
        .project_table_rows(&payload.table_rows, &options.x_key, &options.y_key)
}

fn build_bar_chart(payload: &KpiPayloadSafe, options: &ChartOptions) -> ChartSpec {
    if !payload.timeseries.is_empty() {
        return build_series_chart(payload, ChartKind::Bar);
    }
    let spec = base_spec(&payload.meta, ChartKind::Bar);
    let series = category_series(
        payload.meta.display_name(),
        plottable_categories(payload, options),
    );
    finish_series_chart(spec, vec![series])
}

fn build_dual_axis_chart(payload: &KpiPayloadSafe) -> ChartSpec {
    let spec = base_spec(&payload.meta, ChartKind::DualAxis);
    let mut series: Vec<ChartSeries> = group_timeseries(payload).into_iter().take(2).collect();
    if let Some(second) = series.get_mut(1) {
        second.axis = AxisBinding::Right;
    }
    finish_series_chart(spec, series)
}

fn build_pie_chart(payload: &KpiPayloadSafe, options: &ChartOptions) -> ChartSpec {
    let mut spec = base_spec(&payload.meta, ChartKind::Pie);
    let series = category_series(
        payload.meta.display_name(),
        plottable_categories(payload, options),
    );
    spec.x_keys = series.points.iter().map(|p| p.label.clone()).collect();
    spec.y_axis = AxisSpec::fit(spec.y_axis.label.clone(), [series.total()]);
    spec.series = vec![series];
    spec
}

/// One series per heatmap row (`y`), one point per column (`x`).
fn build_heatmap_chart(payload: &KpiPayloadSafe, options: &ChartOptions) -> ChartSpec {
    let mut spec = base_spec(&payload.meta, ChartKind::Heatmap);
    let cells = options.row_filter.retain_heatmap(&payload.heatmap);

    let mut rows: Vec<ChartSeries> = Vec::new();
    for cell in &cells {
        let point = ChartPoint {
            label: cell.x.clone(),
            value: cell.value,
        };
        match rows.iter_mut().find(|s| s.name == cell.y) {
            Some(row) => row.points.push(point),
            None => rows.push(ChartSeries {
                name: cell.y.clone(),
                axis: AxisBinding::Left,
                points: vec![point],
            }),
        }
    }

    (spec.x_keys, spec.time_axis) = x_axis_keys(&rows);
    spec.y_axis = AxisSpec::fit(spec.y_axis.label.clone(), cells.iter().map(|c| c.value));
    spec.series = rows;
    spec
}

/// Latest value, else the last timeseries point.
fn current_value(payload: &KpiPayloadSafe) -> Option<f64> {
    payload
        .latest
        .map(|l| l.value)
        .or_else(|| payload.timeseries.last().map(|p| p.value))
}

fn build_headline_chart(payload: &KpiPayloadSafe, kind: ChartKind) -> ChartSpec {
    let mut spec = base_spec(&payload.meta, kind);
    spec.headline = current_value(payload).map(|value| Headline {
        value,
        previous: None,
        delta_percent: None,
        percent: None,
    });
    spec
}

fn build_gauge_chart(payload: &KpiPayloadSafe, options: &ChartOptions) -> ChartSpec {
    let mut spec = base_spec(&payload.meta, ChartKind::Gauge);
    spec.y_axis = AxisSpec::fixed(spec.y_axis.label.clone(), 0.0, 100.0);
    spec.headline = current_value(payload).map(|value| {
        let percent = match options.gauge_max {
            Some(max) => (value / max * 100.0).clamp(0.0, 100.0),
            None => normalize_percent(Some(value)),
        };
        Headline {
            value,
            previous: None,
            delta_percent: None,
            percent: Some(percent),
        }
    });
    spec
}

/// Last point against the one before it; `latest` stands in only when there is no timeseries.
fn build_delta_chart(payload: &KpiPayloadSafe) -> ChartSpec {
    let mut spec = base_spec(&payload.meta, ChartKind::Delta);
    let series = group_timeseries(payload);
    let points = series.first().map(|s| s.points.as_slice()).unwrap_or(&[]);

    spec.headline = match points {
        [] => payload.latest.map(|l| Headline {
            value: l.value,
            previous: None,
            delta_percent: None,
            percent: None,
        }),
        [only] => Some(Headline {
            value: only.value,
            previous: None,
            delta_percent: None,
            percent: None,
        }),
        [.., prev, last] => Some(Headline {
            value: last.value,
            previous: Some(prev.value),
            delta_percent: delta_percent(last.value, prev.value),
            percent: None,
        }),
    };
    if let Some(first) = series.into_iter().next() {
        spec = finish_series_chart(spec, vec![first]);
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::kpi::normalize_kpi_value;
    use serde_json::{json, Value};

    fn payload(variant: &str, body: Value) -> KpiPayloadSafe {
        let mut doc = body;
        doc["meta"] = json!({"kpi_key": "k", "name": "Block time", "variant": variant, "unit": "h", "y_axis": "Hours"});
        normalize_kpi_value(&doc).unwrap()
    }

    #[test]
    fn test_line_groups_series_and_formats_dates() {
        let p = payload(
            "line",
            json!({"timeseries": [
                {"ts": "2024-01-05", "series": "A320", "value": 10},
                {"ts": "2024-01-06", "series": "A320", "value": 12},
                {"ts": "2024-01-05", "series": "E190", "value": 4},
                {"ts": "2024-01-07", "value": 1}
            ]}),
        );
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert_eq!(spec.kind, ChartKind::Line);
        let names: Vec<&str> = spec.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A320", "E190", "Block time"]);
        assert_eq!(spec.x_keys, vec!["2024-01-05", "2024-01-06", "2024-01-07"]);
        assert!(spec.time_axis);
        let ticks: Vec<String> = (0..spec.x_keys.len()).map(|i| spec.x_tick_label(i)).collect();
        assert_eq!(ticks, vec!["Jan 05", "Jan 06", "Jan 07"]);
        assert_eq!(spec.y_axis.max, 12.0);
        assert_eq!(spec.y_axis.label.as_deref(), Some("Hours"));
        assert_eq!(spec.unit.as_deref(), Some("h"));
        assert!(spec.y2_axis.is_none());
    }

    #[test]
    fn test_bucket_labels_pass_through() {
        let p = payload("bar", json!({"timeseries": [{"bucket": "W01", "value": 3}, {"bucket": "W02", "value": 5}]}));
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert_eq!(spec.kind, ChartKind::Bar);
        assert_eq!(spec.x_keys, vec!["W01", "W02"]);
        assert!(!spec.time_axis);
    }

    #[test]
    fn test_same_day_timestamps_get_their_own_slots() {
        let p = payload(
            "line",
            json!({"timeseries": [
                {"ts": "2024-01-05T08:00:00Z", "value": 1},
                {"ts": "2024-01-05T12:00:00Z", "value": 2},
                {"ts": "2024-01-05T16:00:00Z", "value": 3}
            ]}),
        );
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert_eq!(spec.x_keys.len(), 3);
        let slots: Vec<Option<usize>> = spec.series[0]
            .points
            .iter()
            .map(|pt| spec.x_index(&pt.label))
            .collect();
        assert_eq!(slots, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(spec.x_axis.max, 2.0);
    }

    #[test]
    fn test_same_day_in_different_years_stays_apart() {
        let p = payload(
            "line",
            json!({"timeseries": [
                {"ts": "2024-01-05", "value": 1},
                {"ts": "2025-01-05", "value": 2}
            ]}),
        );
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert_eq!(spec.x_keys, vec!["2024-01-05", "2025-01-05"]);
        assert_eq!(spec.x_tick_label(0), spec.x_tick_label(1));
    }

    #[test]
    fn test_x_keys_follow_time_order_across_series() {
        let p = payload(
            "line",
            json!({"timeseries": [
                {"ts": "2024-01-06", "series": "A", "value": 1},
                {"ts": "2024-01-07", "series": "A", "value": 2},
                {"ts": "2024-01-05", "series": "B", "value": 3}
            ]}),
        );
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert_eq!(spec.x_keys, vec!["2024-01-05", "2024-01-06", "2024-01-07"]);
        assert_eq!(spec.x_index(&spec.series[1].points[0].label), Some(0));
        assert_eq!(spec.x_index(&spec.series[0].points[1].label), Some(2));
    }

    #[test]
    fn test_mixed_keys_keep_first_seen_order() {
        let p = payload(
            "bar",
            json!({"timeseries": [
                {"bucket": "2024-01-06", "value": 1},
                {"bucket": "later", "value": 2},
                {"bucket": "2024-01-05", "value": 3}
            ]}),
        );
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert_eq!(spec.x_keys, vec!["2024-01-06", "later", "2024-01-05"]);
        assert!(!spec.time_axis);
    }

    #[test]
    fn test_bar_falls_back_to_categories() {
        let p = payload("bar", json!({"categories": [{"name": "HEL", "value": 7}, {"name": "OUL", "value": 2}]}));
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert_eq!(spec.x_keys, vec!["HEL", "OUL"]);
        assert_eq!(spec.series[0].points.len(), 2);
    }

    #[test]
    fn test_dual_axis_binds_second_series_right() {
        let p = payload(
            "dual_axis",
            json!({"timeseries": [
                {"ts": "2024-02-01", "series": "flights", "value": 120},
                {"ts": "2024-02-01", "series": "load_factor", "value": 0.82},
                {"ts": "2024-02-01", "series": "ignored", "value": 9}
            ]}),
        );
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.series[0].axis, AxisBinding::Left);
        assert_eq!(spec.series[1].axis, AxisBinding::Right);
        assert_eq!(spec.y_axis.max, 120.0);
        let right = spec.y2_axis.as_ref().unwrap();
        assert_eq!(right.max, 0.82);
        assert_eq!(spec.axis(AxisBinding::Right).max, 0.82);
    }

    #[test]
    fn test_pie_excludes_metadata_rows_from_table() {
        let p = payload(
            "pie",
            json!({"tableRows": [
                {"category": "KPI Variant", "value": "line"},
                {"category": "Reason to Track", "value": 3},
                {"category": "Fuel", "value": 42},
                {"category": "Crew", "value": 18}
            ]}),
        );
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert_eq!(spec.kind, ChartKind::Pie);
        assert_eq!(spec.x_keys, vec!["Fuel", "Crew"]);
        assert_eq!(spec.series[0].total(), 60.0);
    }

    #[test]
    fn test_pie_uses_configured_keys() {
        let mut p = payload(
            "pie",
            json!({"tableRows": [{"station": "HEL", "flights": 30}, {"station": "TKU", "flights": 10}]}),
        );
        p.meta.config = json!({"xKey": "station", "yKey": "flights"});
        let spec = build_chart_spec(&p, &ChartOptions::from_meta(&p.meta)).unwrap();
        assert_eq!(spec.x_keys, vec!["HEL", "TKU"]);
    }

    #[test]
    fn test_pie_filters_reserved_categories() {
        let p = payload("pie", json!({"categories": [{"category": "Variant Detail", "value": 1}, {"category": "Fuel", "value": 2}]}));
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert_eq!(spec.x_keys, vec!["Fuel"]);
    }

    #[test]
    fn test_heatmap_rows_and_columns() {
        let p = payload(
            "heatmap",
            json!({"heatmap": [
                {"x": "Mon", "y": "HEL", "value": 3},
                {"x": "Tue", "y": "HEL", "value": 5},
                {"x": "Mon", "y": "OUL", "value": 1},
                {"x": "Mon", "y": "KPI Variant", "value": 0}
            ]}),
        );
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert_eq!(spec.series.len(), 2);
        assert_eq!(spec.x_keys, vec!["Mon", "Tue"]);
        assert_eq!(spec.y_axis.max, 5.0);
    }

    #[test]
    fn test_gauge_percent() {
        let p = payload("gauge", json!({"latest": {"value": 0.87}}));
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        let headline = spec.headline.unwrap();
        assert_eq!(headline.value, 0.87);
        assert_eq!(headline.percent, Some(87.0));

        let mut p = payload("gauge", json!({"latest": {"value": 150}}));
        p.meta.config = json!({"max": 200});
        let spec = build_chart_spec(&p, &ChartOptions::from_meta(&p.meta)).unwrap();
        assert_eq!(spec.headline.unwrap().percent, Some(75.0));
    }

    #[test]
    fn test_numeric_prefers_latest() {
        let p = payload("numeric", json!({"latest": {"value": 42}, "timeseries": [{"value": 1}]}));
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert_eq!(spec.headline.unwrap().value, 42.0);

        let p = payload("numeric", json!({"timeseries": [{"value": 1}, {"value": 9}]}));
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert_eq!(spec.headline.unwrap().value, 9.0);

        let p = payload("numeric", json!({}));
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        assert!(spec.is_empty());
    }

    #[test]
    fn test_delta_compares_last_two_points() {
        let p = payload(
            "delta",
            json!({"timeseries": [{"ts": "2024-01-01", "value": 80}, {"ts": "2024-01-02", "value": 100}, {"ts": "2024-01-03", "value": 110}]}),
        );
        let spec = build_chart_spec(&p, &ChartOptions::default()).unwrap();
        let h = spec.headline.unwrap();
        assert_eq!(h.value, 110.0);
        assert_eq!(h.previous, Some(100.0));
        assert_eq!(h.delta_percent, Some(10.0));
        assert_eq!(spec.series.len(), 1);

        let p = payload("delta", json!({"latest": {"value": 5}}));
        let h = build_chart_spec(&p, &ChartOptions::default()).unwrap().headline.unwrap();
        assert_eq!(h.value, 5.0);
        assert_eq!(h.delta_percent, None);
    }

    #[test]
    fn test_table_and_unknown_are_not_charts() {
        let p = payload("table", json!({"tableRows": [{"a": 1}]}));
        assert!(build_chart_spec(&p, &ChartOptions::default()).is_none());
        let p = payload("sankey", json!({}));
        assert!(build_chart_spec(&p, &ChartOptions::default()).is_none());
    }
}
