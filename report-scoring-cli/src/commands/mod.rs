//! Subcommand implementations

pub mod auth;
pub mod config;
pub mod files;
pub mod reports;
pub mod routes;
pub mod scoring;
