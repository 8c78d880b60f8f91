use serde::{Deserialize, Serialize};

use crate::shared::kpi::{TableCell, TableRow};

/// Columns hidden from KPI tables: internal markers, identifiers, bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnVisibility {
    hidden_prefixes: Vec<String>,
    hidden_names: Vec<String>,
    hide_identifiers: bool,
}

impl Default for ColumnVisibility {
    fn default() -> Self {
        Self {
            hidden_prefixes: vec!["_".to_string()],
            hidden_names: ["created_at", "updated_at", "inserted_at", "generated_at"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            hide_identifiers: true,
        }
    }
}

impl ColumnVisibility {
    pub fn with_hidden_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.hidden_prefixes.push(prefix.into());
        self
    }

    pub fn with_hidden_name(mut self, name: impl Into<String>) -> Self {
        self.hidden_names.push(name.into());
        self
    }

    /// Show identifier-like columns too.
    pub fn show_identifiers(mut self) -> Self {
        self.hide_identifiers = false;
        self
    }

    pub fn is_hidden(&self, column: &str) -> bool {
        if self.hidden_prefixes.iter().any(|p| column.starts_with(p.as_str())) {
            return true;
        }
        if self.hidden_names.iter().any(|n| n.eq_ignore_ascii_case(column)) {
            return true;
        }
        self.hide_identifiers && is_identifier_column(column)
    }

    /// Visible columns across `rows`, in first-seen order.
    pub fn visible_columns(&self, rows: &[TableRow]) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            for column in row.columns() {
                if !self.is_hidden(column) && !columns.iter().any(|c| c == column) {
                    columns.push(column.to_string());
                }
            }
        }
        columns
    }
}

/// `id`, `flight_id`, `id_station`, `aircraftId`.
fn is_identifier_column(column: &str) -> bool {
    let lower = column.to_ascii_lowercase();
    lower == "id"
        || lower.ends_with("_id")
        || lower.starts_with("id_")
        || (column.ends_with("Id") && column.len() > 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Text,
}

/// Numeric when the column has at least one value and every non-null value is a number.
pub fn classify_column(rows: &[TableRow], column: &str) -> ColumnKind {
    let mut seen_value = false;
    for cell in rows.iter().filter_map(|row| row.get(column)) {
        match cell {
            TableCell::Null => {}
            TableCell::Number(_) => seen_value = true,
            TableCell::Text(_) => return ColumnKind::Text,
        }
    }
    if seen_value {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

pub fn classify_columns(rows: &[TableRow], columns: &[String]) -> Vec<ColumnKind> {
    columns.iter().map(|c| classify_column(rows, c)).collect()
}
