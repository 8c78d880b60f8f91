pub mod dashboard;
pub mod kpi_card;

pub use dashboard::KpiDashboard;
