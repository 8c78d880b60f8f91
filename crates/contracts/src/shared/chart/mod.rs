//! Chart descriptions built from normalized payloads, independent of any renderer.

mod builder;
mod spec;
mod view;

pub use builder::{build_chart_spec, ChartOptions};
pub use spec::{AxisBinding, AxisSpec, ChartKind, ChartPoint, ChartSeries, ChartSpec, Headline};
pub use view::KpiView;
