pub mod logging;
pub mod paint;
