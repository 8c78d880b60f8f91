//! Separation of backend metadata rows from plottable rows.
//!
//! Upstream interleaves descriptive rows ("KPI Variant", "Reason to Track", ...)
//! with numeric data in the same row-oriented payload. The normalizer keeps
//! them; chart builders drop them with [`MetadataRowFilter`].

use crate::shared::kpi::{CategoryPoint, HeatmapPoint, TableCell, TableRow};

/// Labels that mark a row as backend metadata.
pub const RESERVED_METADATA_LABELS: [&str; 3] = ["KPI Variant", "Variant Detail", "Reason to Track"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRowFilter {
    reserved_labels: Vec<String>,
}

impl Default for MetadataRowFilter {
    fn default() -> Self {
        Self::new(RESERVED_METADATA_LABELS)
    }
}

impl MetadataRowFilter {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reserved_labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_reserved_label(&self, label: &str) -> bool {
        self.reserved_labels.iter().any(|l| l == label)
    }

    /// A row is metadata when its value is not numeric or its label is reserved.
    pub fn is_metadata_row(&self, label: &str, value: Option<f64>) -> bool {
        value.is_none() || self.is_reserved_label(label)
    }

    /// Same rule for a table row, reading the label and value columns by name.
    pub fn is_metadata_table_row(&self, row: &TableRow, label_key: &str, value_key: &str) -> bool {
        let label = row.get(label_key).map(TableCell::text).unwrap_or_default();
        let value = row.get(value_key).and_then(TableCell::as_number);
        self.is_metadata_row(&label, value)
    }

    pub fn retain_categories(&self, points: &[CategoryPoint]) -> Vec<CategoryPoint> {
        points
            .iter()
            .filter(|p| !self.is_metadata_row(&p.category, Some(p.value)))
            .cloned()
            .collect()
    }

    /// Project `label_key`/`value_key` out of table rows, dropping metadata rows.
    pub fn project_table_rows(
        &self,
        rows: &[TableRow],
        label_key: &str,
        value_key: &str,
    ) -> Vec<CategoryPoint> {
        rows.iter()
            .filter(|row| !self.is_metadata_table_row(row, label_key, value_key))
            .filter_map(|row| {
                let category = row.get(label_key).map(TableCell::text)?;
                let value = row.get(value_key).and_then(TableCell::as_number)?;
                if category.is_empty() {
                    return None;
                }
                Some(CategoryPoint { category, value })
            })
            .collect()
    }

    /// Heatmap cells whose row or column label is reserved are dropped.
    pub fn retain_heatmap(&self, points: &[HeatmapPoint]) -> Vec<HeatmapPoint> {
        points
            .iter()
            .filter(|p| !self.is_reserved_label(&p.x) && !self.is_reserved_label(&p.y))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: TableCell, value: TableCell) -> TableRow {
        vec![("category", label), ("value", value)].into_iter().collect()
    }

    #[test]
    fn test_metadata_row_exclusion() {
        let filter = MetadataRowFilter::default();
        // string value and reserved label: each excludes on its own
        let variant_row = row(TableCell::Text("KPI Variant".into()), TableCell::Text("line".into()));
        assert!(filter.is_metadata_table_row(&variant_row, "category", "value"));

        let fuel = row(TableCell::Text("Fuel".into()), TableCell::Number(42.0));
        assert!(!filter.is_metadata_table_row(&fuel, "category", "value"));

        let reserved_numeric = row(TableCell::Text("Reason to Track".into()), TableCell::Number(1.0));
        assert!(filter.is_metadata_table_row(&reserved_numeric, "category", "value"));

        let text_value = row(TableCell::Text("Fuel".into()), TableCell::Text("42".into()));
        assert!(filter.is_metadata_table_row(&text_value, "category", "value"));

        let null_value = row(TableCell::Text("Fuel".into()), TableCell::Null);
        assert!(filter.is_metadata_table_row(&null_value, "category", "value"));
    }

    #[test]
    fn test_reserved_labels_match_exactly() {
        let filter = MetadataRowFilter::default();
        assert!(filter.is_reserved_label("Variant Detail"));
        assert!(!filter.is_reserved_label("variant detail"));
        assert!(!filter.is_reserved_label("KPI Variant "));
    }

    #[test]
    fn test_project_table_rows() {
        let filter = MetadataRowFilter::default();
        let rows = vec![
            row(TableCell::Text("KPI Variant".into()), TableCell::Text("pie".into())),
            row(TableCell::Text("Fuel".into()), TableCell::Number(42.0)),
            row(TableCell::Text("Crew".into()), TableCell::Number(13.0)),
            row(TableCell::Null, TableCell::Number(2.0)),
        ];
        let points = filter.project_table_rows(&rows, "category", "value");
        assert_eq!(
            points,
            vec![
                CategoryPoint { category: "Fuel".into(), value: 42.0 },
                CategoryPoint { category: "Crew".into(), value: 13.0 },
            ]
        );
    }

    #[test]
    fn test_custom_labels_are_injected() {
        let filter = MetadataRowFilter::new(["Owner"]);
        let points = vec![
            CategoryPoint { category: "Owner".into(), value: 1.0 },
            CategoryPoint { category: "KPI Variant".into(), value: 2.0 },
        ];
        let kept = filter.retain_categories(&points);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].category, "KPI Variant");
    }

    #[test]
    fn test_retain_heatmap() {
        let filter = MetadataRowFilter::default();
        let points = vec![
            HeatmapPoint { x: "Mon".into(), y: "HEL".into(), value: 1.0 },
            HeatmapPoint { x: "Variant Detail".into(), y: "HEL".into(), value: 0.0 },
            HeatmapPoint { x: "Tue".into(), y: "KPI Variant".into(), value: 0.0 },
        ];
        assert_eq!(filter.retain_heatmap(&points).len(), 1);
    }
}
