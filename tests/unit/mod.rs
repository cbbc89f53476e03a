//! Unit Tests Module
//!
//! Component-level tests for the comparator, fixture loading and reports.
//! None of these touch the network.

pub mod comparator;
pub mod report;
