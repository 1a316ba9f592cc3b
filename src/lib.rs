//! SQLNest - column and JSON rendering for nested query plans
//!
//! This crate turns a validated tree of selects into the SQL fragments of a
//! single statement that returns nested JSON:
//! - Query plan model and invariant checks
//! - Alias naming shared by every rendering phase
//! - Column, function and JSON field rendering per dialect
//! - On-disk caching of compiled plans

pub mod utils;

pub mod config;
pub mod query_cache;
pub mod query_plan;
pub mod sql_generator;
pub mod storage;
