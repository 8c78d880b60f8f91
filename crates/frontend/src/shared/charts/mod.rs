pub mod geometry;
pub mod kpi_table;
pub mod svg_adapter;

pub use kpi_table::KpiTable;
pub use svg_adapter::ChartSvg;
