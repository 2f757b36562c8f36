//! Calorie Diary Library
//!
//! Food logging, profile targets and weekly nutrition statistics.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
