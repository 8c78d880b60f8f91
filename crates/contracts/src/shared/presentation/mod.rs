//! Presentation rules applied by renderers to a `KpiPayloadSafe`.

mod columns;
mod date_label;
mod format;
mod pagination;
mod row_filter;
mod table;

pub use columns::{classify_column, classify_columns, ColumnKind, ColumnVisibility};
pub use date_label::{format_x_axis_date_label, parse_axis_date, parse_axis_timestamp};
pub use format::{delta_percent, format_value, normalize_percent};
pub use pagination::{Pager, KPI_TABLE_PAGE_SIZE};
pub use row_filter::{MetadataRowFilter, RESERVED_METADATA_LABELS};
pub use table::KpiTableModel;
