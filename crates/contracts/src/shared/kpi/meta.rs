use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Variant
// ---------------------------------------------------------------------------

/// Which renderer a KPI is drawn with. Serialized as its snake_case name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KpiVariant {
    Line,
    Bar,
    Pie,
    Gauge,
    Heatmap,
    Table,
    Numeric,
    Delta,
    DualAxis,
    /// Any variant name the renderers do not know, as received (trimmed).
    Unknown(String),
}

impl KpiVariant {
    /// Lenient parse used by the normalizer. Case and `-`/`_` spelling are ignored.
    pub fn parse(s: &str) -> Self {
        let raw = s.trim();
        let key = raw.to_ascii_lowercase().replace('-', "_");
        match key.as_str() {
            "line" => KpiVariant::Line,
            "bar" => KpiVariant::Bar,
            "pie" | "donut" => KpiVariant::Pie,
            "gauge" => KpiVariant::Gauge,
            "heatmap" => KpiVariant::Heatmap,
            "table" => KpiVariant::Table,
            "numeric" | "number" => KpiVariant::Numeric,
            "delta" => KpiVariant::Delta,
            "dual_axis" | "dualaxis" => KpiVariant::DualAxis,
            _ => KpiVariant::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            KpiVariant::Line => "line",
            KpiVariant::Bar => "bar",
            KpiVariant::Pie => "pie",
            KpiVariant::Gauge => "gauge",
            KpiVariant::Heatmap => "heatmap",
            KpiVariant::Table => "table",
            KpiVariant::Numeric => "numeric",
            KpiVariant::Delta => "delta",
            KpiVariant::DualAxis => "dual_axis",
            KpiVariant::Unknown(raw) => raw,
        }
    }
}

impl Serialize for KpiVariant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for KpiVariant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(KpiVariant::parse(&raw))
    }
}

// ---------------------------------------------------------------------------
// Meta
// ---------------------------------------------------------------------------

/// Identity and display metadata of one KPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiMeta {
    /// Globally unique, stable identifier.
    pub kpi_key: String,
    /// Display label.
    pub name: String,
    pub variant: KpiVariant,
    /// Suffix appended to formatted values, e.g. `"%"` or `" min"`.
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub x_axis: Option<String>,
    #[serde(default)]
    pub y_axis: Option<String>,
    /// Opaque variant-specific settings (`xKey`, `yKey`, `max`, ...).
    #[serde(default)]
    pub config: serde_json::Value,
    /// Owning dashboard, if any.
    #[serde(default)]
    pub dashboard: Option<String>,
}

impl KpiMeta {
    /// Label shown in card headers: the name, or the key when the name is blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.kpi_key
        } else {
            &self.name
        }
    }

    /// String setting from `config`, looked up under each of `keys` in order.
    pub fn config_str(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|k| self.config.get(*k))
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
    }

    /// Numeric setting from `config`, looked up under each of `keys` in order.
    pub fn config_f64(&self, keys: &[&str]) -> Option<f64> {
        keys.iter()
            .filter_map(|k| self.config.get(*k))
            .find_map(|v| match v {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            })
            .filter(|v| v.is_finite())
    }
}

/// Catalogue of KPIs known to the backend store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiCatalogResponse {
    pub kpis: Vec<KpiMeta>,
}
