//! Ranking pipeline
//!
//! [`runner`] ranks a single document, [`batch`] fans a collection out over
//! it, and [`validation`] checks the configuration before anything runs.

pub mod batch;
pub mod runner;
pub mod validation;
