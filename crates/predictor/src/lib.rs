//! HTTP transport and configuration for the charging predictor service

pub mod api;
pub mod config;
