//! IV&V report portal: vendors edit draft reports and submit immutable
//! snapshots, admins approve or deny them, and the public sees only what was
//! approved.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod notify;
pub mod workflow;
