//! Invite Gate Backend Library
//!
//! Session tokens, password verification and invite-gated registration,
//! exposed for the binary and for integration tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
