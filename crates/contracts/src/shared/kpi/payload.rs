use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::meta::KpiMeta;

// ---------------------------------------------------------------------------
// Raw (untrusted) payload
// ---------------------------------------------------------------------------

/// KPI payload exactly as the data store returned it.
///
/// Every field is optional and loosely typed; partial upstream failures are
/// the normal case. Use [`super::normalize_kpi_payload`] to get a
/// [`KpiPayloadSafe`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiPayloadRaw {
    #[serde(default)]
    pub meta: Option<Value>,
    #[serde(default)]
    pub latest: Option<Value>,
    #[serde(default)]
    pub timeseries: Option<Value>,
    #[serde(default)]
    pub categories: Option<Value>,
    #[serde(default)]
    pub heatmap: Option<Value>,
    #[serde(default, rename = "tableRows", alias = "table_rows")]
    pub table_rows: Option<Value>,
    #[serde(default)]
    pub generated_at: Option<Value>,
}

impl KpiPayloadRaw {
    /// Split an arbitrary JSON document into the raw payload fields.
    ///
    /// Returns `None` when the document is not a JSON object. Explicit `null`
    /// fields are kept as `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let field = |name: &str| obj.get(name).filter(|v| !v.is_null()).cloned();
        Some(Self {
            meta: field("meta"),
            latest: field("latest"),
            timeseries: field("timeseries"),
            categories: field("categories"),
            heatmap: field("heatmap"),
            table_rows: field("tableRows").or_else(|| field("table_rows")),
            generated_at: field("generated_at"),
        })
    }
}

// ---------------------------------------------------------------------------
// Safe payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatestValue {
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeseriesPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Distinguishes overlaid lines/bars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    pub value: f64,
}

impl TimeseriesPoint {
    /// Raw x-position: `ts`, else `bucket`, else `""`.
    pub fn x_label(&self) -> &str {
        self.ts
            .as_deref()
            .or(self.bucket.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPoint {
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    pub x: String,
    pub y: String,
    pub value: f64,
}

/// A display-safe table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableCell {
    Number(f64),
    Text(String),
    Null,
}

impl TableCell {
    pub fn is_null(&self) -> bool {
        matches!(self, TableCell::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            TableCell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text shown for the cell; numbers print in their shortest form, null is `""`.
    pub fn text(&self) -> String {
        match self {
            TableCell::Number(n) => super::coerce::number_text(*n),
            TableCell::Text(s) => s.clone(),
            TableCell::Null => String::new(),
        }
    }
}

/// One table row: columns in the order they appeared in the raw row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    cells: Vec<(String, TableCell)>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cell, keeping the first position of the column.
    pub fn insert(&mut self, column: impl Into<String>, cell: TableCell) {
        let column = column.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = cell,
            None => self.cells.push((column, cell)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&TableCell> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TableCell)> {
        self.cells.iter().map(|(name, cell)| (name.as_str(), cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, TableCell)> for TableRow {
    fn from_iter<I: IntoIterator<Item = (S, TableCell)>>(iter: I) -> Self {
        let mut row = TableRow::new();
        for (column, cell) in iter {
            row.insert(column, cell);
        }
        row
    }
}

impl Serialize for TableRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, cell) in &self.cells {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TableRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let obj = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        Ok(super::normalize::normalize_table_row(&Value::Object(obj)))
    }
}

/// Render-safe payload: every collection is present and every field has its declared kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiPayloadSafe {
    pub meta: KpiMeta,
    pub latest: Option<LatestValue>,
    pub timeseries: Vec<TimeseriesPoint>,
    pub categories: Vec<CategoryPoint>,
    pub heatmap: Vec<HeatmapPoint>,
    #[serde(rename = "tableRows")]
    pub table_rows: Vec<TableRow>,
    pub generated_at: Option<String>,
}

impl KpiPayloadSafe {
    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
            && self.timeseries.is_empty()
            && self.categories.is_empty()
            && self.heatmap.is_empty()
            && self.table_rows.is_empty()
    }
}
