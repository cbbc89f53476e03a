//! Integration Tests Module
//!
//! End-to-end consistency runs across fixtures, providers and reports.

pub mod blockchain_info_http;
