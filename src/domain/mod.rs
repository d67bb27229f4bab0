//! Core domain types and logic.

pub mod benchmark;
pub mod chart;
pub mod comparison;
pub mod config_validation;
pub mod error;
pub mod payload;
pub mod preset;
pub mod presentation;
pub mod request;
pub mod retry;
pub mod series;
pub mod timeline;
