pub mod logging;
pub mod middleware;
