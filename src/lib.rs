//! ratingsmeta library
//!
//! Exposes the fetch cache, meta resolution pipeline, and HTTP layer for use
//! by the binary and the integration tests.

pub mod cache;
pub mod cli;
pub mod config;
pub mod manifest;
pub mod meta;
pub mod server;
