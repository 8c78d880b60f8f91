pub mod db;
pub mod kpi_storage;
pub mod seed;
