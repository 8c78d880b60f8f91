//! Draws a `ChartSpec` as inline SVG. The only place chart geometry meets the DOM.

use contracts::shared::chart::{AxisSpec, ChartKind, ChartSeries, ChartSpec};
use contracts::shared::presentation::format_value;
use leptos::prelude::*;

use super::geometry::{
    gauge_arc_path, heat_color, line_path, polar, slice_path, tick_indices, Plot,
};

const VIEW_BOX: &str = "0 0 480 240";
const PLOT: Plot = Plot::new(56.0, 16.0, 368.0, 188.0);
const MAX_X_TICKS: usize = 6;

const PALETTE: [&str; 8] = [
    "#2563eb", "#f59e0b", "#10b981", "#ef4444", "#8b5cf6", "#0ea5e9", "#84cc16", "#ec4899",
];

pub fn series_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn px(v: f64) -> String {
    format!("{:.1}", v)
}

/// Chart body for every drawable kind. `Numeric` has no graphic; the card shows its headline.
#[component]
pub fn ChartSvg(spec: ChartSpec) -> impl IntoView {
    match spec.kind {
        ChartKind::Line | ChartKind::DualAxis | ChartKind::Delta => {
            view! { <LineChart spec=spec /> }.into_any()
        }
        ChartKind::Bar => view! { <BarChart spec=spec /> }.into_any(),
        ChartKind::Pie => view! { <PieChart spec=spec /> }.into_any(),
        ChartKind::Heatmap => view! { <HeatmapChart spec=spec /> }.into_any(),
        ChartKind::Gauge => view! { <GaugeChart spec=spec /> }.into_any(),
        ChartKind::Numeric => ().into_any(),
    }
}

/// Horizontal grid lines plus min/mid/max labels for one value axis.
fn value_axis(axis: &AxisSpec, unit: Option<&str>, right: bool) -> impl IntoView {
    let (x, anchor) = if right {
        (PLOT.right() + 6.0, "start")
    } else {
        (PLOT.left - 6.0, "end")
    };
    [0.0, 0.5, 1.0]
        .into_iter()
        .map(|ratio| {
            let y = PLOT.y_at(ratio);
            let value = axis.min + (axis.max - axis.min) * ratio;
            let grid = (!right).then(|| {
                view! {
                    <line
                        x1=px(PLOT.left)
                        x2=px(PLOT.right())
                        y1=px(y)
                        y2=px(y)
                        stroke="#e5e7eb"
                        stroke-width="1"
                    />
                }
            });
            view! {
                {grid}
                <text x=px(x) y=px(y + 4.0) text-anchor=anchor class="kpi-chart__tick">
                    {format_value(value, unit)}
                </text>
            }
        })
        .collect_view()
}

/// X tick labels under the plot, thinned to at most `MAX_X_TICKS`.
fn category_axis(spec: &ChartSpec, banded: bool) -> impl IntoView {
    let count = spec.x_keys.len();
    tick_indices(count, MAX_X_TICKS)
        .into_iter()
        .map(|i| {
            let x = if banded {
                let (left, w) = PLOT.band(i, count);
                left + w / 2.0
            } else {
                PLOT.x_at(i, count)
            };
            view! {
                <text x=px(x) y=px(PLOT.bottom() + 16.0) text-anchor="middle" class="kpi-chart__tick">
                    {spec.x_tick_label(i)}
                </text>
            }
        })
        .collect_view()
}

fn axis_titles(spec: &ChartSpec) -> impl IntoView {
    let x_title = spec.x_axis.label.clone().map(|t| {
        view! {
            <text x=px(PLOT.left + PLOT.width / 2.0) y="238" text-anchor="middle" class="kpi-chart__axis-title">
                {t}
            </text>
        }
    });
    let y_title = spec.y_axis.label.clone().map(|t| {
        view! {
            <text x="10" y=px(PLOT.top + PLOT.height / 2.0) text-anchor="middle"
                transform=format!("rotate(-90 10 {:.1})", PLOT.top + PLOT.height / 2.0)
                class="kpi-chart__axis-title">
                {t}
            </text>
        }
    });
    view! { {x_title} {y_title} }
}

#[component]
fn Legend(series: Vec<ChartSeries>) -> impl IntoView {
    (series.len() > 1).then(|| {
        view! {
            <div class="kpi-chart__legend">
                {series
                    .into_iter()
                    .enumerate()
                    .map(|(i, s)| {
                        view! {
                            <span class="kpi-chart__legend-item">
                                <span
                                    class="kpi-chart__swatch"
                                    style=format!("background: {};", series_color(i))
                                ></span>
                                {s.name}
                            </span>
                        }
                    })
                    .collect_view()}
            </div>
        }
    })
}

#[component]
fn LineChart(spec: ChartSpec) -> impl IntoView {
    let count = spec.x_keys.len();
    let unit = spec.unit.clone();

    let lines = spec
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            let axis = spec.axis(series.axis);
            let mut points: Vec<(f64, f64)> = series
                .points
                .iter()
                .filter_map(|p| {
                    let idx = spec.x_index(&p.label)?;
                    Some((PLOT.x_at(idx, count), PLOT.y_at(axis.ratio(p.value))))
                })
                .collect();
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            let color = series_color(i);
            let d = line_path(&points);
            let dots = points
                .iter()
                .map(|(x, y)| view! { <circle cx=px(*x) cy=px(*y) r="2.5" fill=color /> })
                .collect_view();
            view! {
                <g>
                    <path d=d fill="none" stroke=color stroke-width="2" />
                    {dots}
                </g>
            }
        })
        .collect_view();

    let right_axis = spec
        .y2_axis
        .as_ref()
        .map(|axis| value_axis(axis, unit.as_deref(), true));

    view! {
        <svg class="kpi-chart" viewBox=VIEW_BOX preserveAspectRatio="xMidYMid meet">
            {value_axis(&spec.y_axis, unit.as_deref(), false)}
            {right_axis}
            {category_axis(&spec, false)}
            {axis_titles(&spec)}
            {lines}
        </svg>
        <Legend series=spec.series.clone() />
    }
}

#[component]
fn BarChart(spec: ChartSpec) -> impl IntoView {
    let count = spec.x_keys.len();
    let unit = spec.unit.clone();
    let n_series = spec.series.len().max(1);
    let baseline = PLOT.y_at(spec.y_axis.ratio(0.0));

    let bars = spec
        .series
        .iter()
        .enumerate()
        .flat_map(|(si, series)| {
            let spec = &spec;
            let axis = &spec.y_axis;
            series.points.iter().filter_map(move |p| {
                let idx = spec.x_index(&p.label)?;
                let (left, band) = PLOT.band(idx, count);
                let inner = band * 0.7;
                let w = inner / n_series as f64;
                let x = left + band * 0.15 + w * si as f64;
                let top = PLOT.y_at(axis.ratio(p.value));
                let (y, h) = if top <= baseline {
                    (top, baseline - top)
                } else {
                    (baseline, top - baseline)
                };
                Some(view! {
                    <rect x=px(x) y=px(y) width=px(w.max(1.0)) height=px(h) fill=series_color(si) rx="2" />
                })
            })
        })
        .collect_view();

    view! {
        <svg class="kpi-chart" viewBox=VIEW_BOX preserveAspectRatio="xMidYMid meet">
            {value_axis(&spec.y_axis, unit.as_deref(), false)}
            {category_axis(&spec, true)}
            {axis_titles(&spec)}
            {bars}
        </svg>
        <Legend series=spec.series.clone() />
    }
}

#[component]
fn PieChart(spec: ChartSpec) -> impl IntoView {
    const CX: f64 = 130.0;
    const CY: f64 = 120.0;
    const R: f64 = 100.0;

    let unit = spec.unit.clone();
    let points = spec
        .series
        .first()
        .map(|s| s.points.clone())
        .unwrap_or_default();
    let total: f64 = points.iter().map(|p| p.value.max(0.0)).sum();
    if total <= 0.0 {
        return view! { <div class="kpi-card__empty">"No data for this period"</div> }.into_any();
    }

    let mut angle = 0.0;
    let slices = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let sweep = p.value.max(0.0) / total * std::f64::consts::TAU;
            let d = slice_path(CX, CY, R, angle, angle + sweep);
            angle += sweep;
            view! { <path d=d fill=series_color(i) stroke="#fff" stroke-width="1" /> }
        })
        .collect_view();

    let legend = points
        .iter()
        .enumerate()
        .take(10)
        .map(|(i, p)| {
            let y = 24.0 + i as f64 * 20.0;
            let share = p.value.max(0.0) / total * 100.0;
            view! {
                <rect x="260" y=px(y - 10.0) width="12" height="12" fill=series_color(i) rx="2" />
                <text x="278" y=px(y) class="kpi-chart__tick">
                    {format!("{} {} ({:.1}%)", p.label, format_value(p.value, unit.as_deref()), share)}
                </text>
            }
        })
        .collect_view();

    view! {
        <svg class="kpi-chart" viewBox=VIEW_BOX preserveAspectRatio="xMidYMid meet">
            {slices}
            {legend}
        </svg>
    }
    .into_any()
}

#[component]
fn HeatmapChart(spec: ChartSpec) -> impl IntoView {
    let cols = spec.x_keys.len().max(1);
    let rows = spec.series.len().max(1);
    let cell_w = PLOT.width / cols as f64;
    let cell_h = PLOT.height / rows as f64;

    let cells = spec
        .series
        .iter()
        .enumerate()
        .flat_map(|(ri, row)| {
            let spec = &spec;
            let axis = &spec.y_axis;
            row.points.iter().filter_map(move |p| {
                let ci = spec.x_index(&p.label)?;
                let x = PLOT.left + cell_w * ci as f64;
                let y = PLOT.top + cell_h * ri as f64;
                Some(view! {
                    <rect
                        x=px(x + 1.0)
                        y=px(y + 1.0)
                        width=px((cell_w - 2.0).max(1.0))
                        height=px((cell_h - 2.0).max(1.0))
                        fill=heat_color(axis.ratio(p.value))
                    />
                })
            })
        })
        .collect_view();

    let row_labels = spec
        .series
        .iter()
        .enumerate()
        .map(|(ri, row)| {
            let y = PLOT.top + cell_h * (ri as f64 + 0.5) + 4.0;
            view! {
                <text x=px(PLOT.left - 6.0) y=px(y) text-anchor="end" class="kpi-chart__tick">
                    {row.name.clone()}
                </text>
            }
        })
        .collect_view();

    view! {
        <svg class="kpi-chart" viewBox=VIEW_BOX preserveAspectRatio="xMidYMid meet">
            {cells}
            {row_labels}
            {category_axis(&spec, true)}
        </svg>
    }
}

#[component]
fn GaugeChart(spec: ChartSpec) -> impl IntoView {
    const CX: f64 = 240.0;
    const CY: f64 = 190.0;
    const R: f64 = 140.0;

    let Some(headline) = spec.headline else {
        return view! { <div class="kpi-card__empty">"No data for this period"</div> }.into_any();
    };
    let percent = headline.percent.unwrap_or(0.0);
    let (needle_x, needle_y) = polar(
        CX,
        CY,
        R - 24.0,
        -std::f64::consts::FRAC_PI_2 + std::f64::consts::PI * percent / 100.0,
    );

    view! {
        <svg class="kpi-chart" viewBox=VIEW_BOX preserveAspectRatio="xMidYMid meet">
            <path d=gauge_arc_path(CX, CY, R, 1.0) fill="none" stroke="#e5e7eb" stroke-width="20" />
            <path d=gauge_arc_path(CX, CY, R, percent / 100.0) fill="none" stroke=series_color(0) stroke-width="20" />
            <line x1=px(CX) y1=px(CY) x2=px(needle_x) y2=px(needle_y) stroke="#374151" stroke-width="3" />
            <text x=px(CX) y=px(CY - 40.0) text-anchor="middle" class="kpi-chart__gauge-value">
                {format!("{:.0}%", percent)}
            </text>
            <text x=px(CX) y=px(CY + 30.0) text-anchor="middle" class="kpi-chart__tick">
                {format_value(headline.value, spec.unit.as_deref())}
            </text>
        </svg>
    }
    .into_any()
}
