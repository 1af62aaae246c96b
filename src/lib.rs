//! src/lib.rs
pub mod aggregator;
pub mod attribute;
pub mod configuration;
pub mod error;
pub mod file_task;
pub mod input;
pub mod job;
pub mod order;
pub mod report;
pub mod telemetry;
#[cfg(test)]
mod test_utils;
pub mod worker_pool;
pub mod writer;
