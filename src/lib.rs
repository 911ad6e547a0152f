//! # Query Assistant Library
//!
//! Natural-language to SQL matching with static safety and optimization
//! checks for a PostgreSQL administration dashboard.

pub mod advisor;
pub mod app;
pub mod assistant;
pub mod audit;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod intent;
pub mod logging;
pub mod output;
pub mod recommend;
pub mod safety;
