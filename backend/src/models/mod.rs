//! Data models shared across the document store seam and API handlers.

pub mod audit_log;
pub mod user;
