pub mod chart;
pub mod kpi;
pub mod presentation;
