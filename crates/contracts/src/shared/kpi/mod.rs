//! KPI data model and the payload normalizer.

pub mod coerce;
mod meta;
mod normalize;
mod payload;
mod time_range;

pub use meta::{KpiCatalogResponse, KpiMeta, KpiVariant};
pub use normalize::{
    normalize_kpi_payload, normalize_kpi_value, normalize_meta, normalize_table_cell,
    normalize_table_row,
};
pub use payload::{
    CategoryPoint, HeatmapPoint, KpiPayloadRaw, KpiPayloadSafe, LatestValue, TableCell, TableRow,
    TimeseriesPoint,
};
pub use time_range::TimeRange;
