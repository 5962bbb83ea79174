//! Staffdesk server: the REST persistence surface plus the operator CLI
//! flows (import, undo, duplicates, merge, seed).

pub mod client;
pub mod commands;
pub mod config;
pub mod http;
pub mod referral;
