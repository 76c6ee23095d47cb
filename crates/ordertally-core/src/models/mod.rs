//! Data models: observations, reports and configuration.

pub mod config;
pub mod observation;
pub mod report;
