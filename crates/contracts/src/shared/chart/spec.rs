use serde::{Deserialize, Serialize};

use crate::shared::presentation::format_x_axis_date_label;

/// Chart family a `ChartSpec` is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Gauge,
    Heatmap,
    Numeric,
    Delta,
    DualAxis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisBinding {
    #[default]
    Left,
    Right,
}

/// Axis title plus the value extent the renderer scales against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub label: Option<String>,
    pub min: f64,
    pub max: f64,
}

impl AxisSpec {
    /// Extent covering `values` and zero; a flat extent is widened to `[min, min + 1]`.
    pub fn fit<I: IntoIterator<Item = f64>>(label: Option<String>, values: I) -> Self {
        let (mut min, mut max) = (0.0_f64, 0.0_f64);
        for v in values {
            min = min.min(v);
            max = max.max(v);
        }
        if max - min <= f64::EPSILON {
            max = min + 1.0;
        }
        Self { label, min, max }
    }

    pub fn fixed(label: Option<String>, min: f64, max: f64) -> Self {
        Self { label, min, max }
    }

    /// Position of `v` inside the extent, `0.0..=1.0`.
    pub fn ratio(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((v - self.min) / span).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Raw x key (timestamp, bucket or category); one of `ChartSpec::x_keys`.
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    pub axis: AxisBinding,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }
}

/// Single headline figure for numeric, delta and gauge KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub value: f64,
    pub previous: Option<f64>,
    pub delta_percent: Option<f64>,
    /// Gauge fill, `0..=100`.
    pub percent: Option<f64>,
}

/// Library-independent description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub series: Vec<ChartSeries>,
    /// Raw x keys in draw order (line, bar, dual-axis, heatmap columns).
    pub x_keys: Vec<String>,
    /// Every x key is a date or timestamp; keys are in time order.
    #[serde(default)]
    pub time_axis: bool,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub y2_axis: Option<AxisSpec>,
    pub unit: Option<String>,
    pub headline: Option<Headline>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.headline.is_none() && self.series.iter().all(|s| s.points.is_empty())
    }

    /// Slot of a raw x key on the x axis.
    pub fn x_index(&self, key: &str) -> Option<usize> {
        self.x_keys.iter().position(|k| k == key)
    }

    /// Tick text for the x key at `index`; dates are shortened, e.g. `"Jan 05"`.
    pub fn x_tick_label(&self, index: usize) -> String {
        match self.x_keys.get(index) {
            Some(key) if self.time_axis => format_x_axis_date_label(key),
            Some(key) => key.clone(),
            None => String::new(),
        }
    }

    pub fn axis(&self, binding: AxisBinding) -> &AxisSpec {
        match (binding, &self.y2_axis) {
            (AxisBinding::Right, Some(axis)) => axis,
            _ => &self.y_axis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_fit_includes_zero() {
        let axis = AxisSpec::fit(None, vec![3.0, 9.0]);
        assert_eq!((axis.min, axis.max), (0.0, 9.0));
        let axis = AxisSpec::fit(None, vec![-4.0, 2.0]);
        assert_eq!((axis.min, axis.max), (-4.0, 2.0));
        let axis = AxisSpec::fit(None, Vec::<f64>::new());
        assert_eq!((axis.min, axis.max), (0.0, 1.0));
    }

    #[test]
    fn test_tick_labels_shorten_only_time_axes() {
        let mut spec = ChartSpec {
            kind: ChartKind::Line,
            title: "OTP".to_string(),
            series: vec![],
            x_keys: vec!["2024-01-05T08:00:00Z".to_string(), "2024-01-06".to_string()],
            time_axis: true,
            x_axis: AxisSpec::fixed(None, 0.0, 1.0),
            y_axis: AxisSpec::fixed(None, 0.0, 1.0),
            y2_axis: None,
            unit: None,
            headline: None,
        };
        assert_eq!(spec.x_tick_label(0), "Jan 05");
        assert_eq!(spec.x_tick_label(1), "Jan 06");
        assert_eq!(spec.x_tick_label(2), "");
        assert_eq!(spec.x_index("2024-01-06"), Some(1));

        spec.time_axis = false;
        assert_eq!(spec.x_tick_label(0), "2024-01-05T08:00:00Z");
    }

    #[test]
    fn test_axis_ratio() {
        let axis = AxisSpec::fixed(None, 0.0, 200.0);
        assert_eq!(axis.ratio(50.0), 0.25);
        assert_eq!(axis.ratio(-5.0), 0.0);
        assert_eq!(axis.ratio(500.0), 1.0);
    }
}
