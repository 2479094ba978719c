//! Scenario files and the fixed-step host loop for `glide-core`.

pub mod config;
pub mod scenario;

pub use config::Config;
pub use scenario::{Sample, Scenario};
