use crate::shared::kpi::{KpiPayloadSafe, KpiVariant};
use crate::shared::presentation::{ColumnVisibility, KpiTableModel};

use super::builder::{build_chart_spec, ChartOptions};
use super::spec::ChartSpec;

/// What a KPI card draws.
#[derive(Debug, Clone, PartialEq)]
pub enum KpiView {
    Chart(ChartSpec),
    Table(KpiTableModel),
    /// Variant name the card cannot draw, as it arrived in `meta.variant`.
    Unsupported(String),
    /// No payload, or nothing to plot.
    Empty,
}

impl KpiView {
    /// Dispatch on `meta.variant` with the default chart options and column rules.
    pub fn from_payload(payload: Option<&KpiPayloadSafe>) -> Self {
        match payload {
            Some(p) => Self::build(p, &ChartOptions::from_meta(&p.meta), &ColumnVisibility::default()),
            None => KpiView::Empty,
        }
    }

    pub fn build(
        payload: &KpiPayloadSafe,
        options: &ChartOptions,
        visibility: &ColumnVisibility,
    ) -> Self {
        match &payload.meta.variant {
            KpiVariant::Table => {
                let model = KpiTableModel::from_payload(payload, visibility);
                if model.is_empty() {
                    KpiView::Empty
                } else {
                    KpiView::Table(model)
                }
            }
            KpiVariant::Unknown(name) => KpiView::Unsupported(name.clone()),
            _ => match build_chart_spec(payload, options) {
                Some(spec) if !spec.is_empty() => KpiView::Chart(spec),
                _ => KpiView::Empty,
            },
        }
    }
}
