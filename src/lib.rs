//! ivscreen: Weight of Evidence and Information Value screening
//!
//! A library for ranking the predictive power of dataset features against a
//! binary target using rank-quantile binning, per-bin Weight of Evidence and
//! the Information Value summary.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
