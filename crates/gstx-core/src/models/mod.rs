//! Data models for extracted returns and configuration.

pub mod config;
pub mod report;
