use crate::shared::kpi::{KpiPayloadSafe, TableCell, TableRow};

use super::columns::{classify_columns, ColumnKind, ColumnVisibility};
use super::format::format_value;
use super::pagination::{Pager, KPI_TABLE_PAGE_SIZE};

/// Everything a table renderer needs: visible columns, their kinds, paging.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiTableModel {
    pub columns: Vec<String>,
    pub kinds: Vec<ColumnKind>,
    pub rows: Vec<TableRow>,
    pub pager: Pager,
    pub unit: Option<String>,
}

impl KpiTableModel {
    pub fn new(rows: Vec<TableRow>, visibility: &ColumnVisibility, unit: Option<String>) -> Self {
        let columns = visibility.visible_columns(&rows);
        let kinds = classify_columns(&rows, &columns);
        let pager = Pager::new(rows.len(), KPI_TABLE_PAGE_SIZE);
        Self {
            columns,
            kinds,
            rows,
            pager,
            unit,
        }
    }

    pub fn from_payload(payload: &KpiPayloadSafe, visibility: &ColumnVisibility) -> Self {
        Self::new(
            payload.table_rows.clone(),
            visibility,
            payload.meta.unit.clone(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Display text of every visible cell on `page`, row by row.
    pub fn page_cells(&self, page: usize) -> Vec<Vec<String>> {
        self.rows[self.pager.window(page)]
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(&self.kinds)
                    .map(|(column, kind)| self.cell_text(row.get(column), *kind))
                    .collect()
            })
            .collect()
    }

    fn cell_text(&self, cell: Option<&TableCell>, kind: ColumnKind) -> String {
        match (cell, kind) {
            (Some(TableCell::Number(n)), ColumnKind::Numeric) => {
                format_value(*n, self.unit.as_deref())
            }
            (Some(cell), _) => cell.text(),
            (None, _) => String::new(),
        }
    }
}
