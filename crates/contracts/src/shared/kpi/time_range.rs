use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Time window a KPI payload was precomputed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Last7Days,
    #[default]
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [
        TimeRange::Last7Days,
        TimeRange::Last30Days,
        TimeRange::Last90Days,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Last7Days => "7d",
            TimeRange::Last30Days => "30d",
            TimeRange::Last90Days => "90d",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Last7Days => "Last 7 days",
            TimeRange::Last30Days => "Last 30 days",
            TimeRange::Last90Days => "Last 90 days",
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7d" => Ok(TimeRange::Last7Days),
            "30d" => Ok(TimeRange::Last30Days),
            "90d" => Ok(TimeRange::Last90Days),
            other => Err(format!("Unknown time range: {}", other)),
        }
    }
}
