//! Shared utilities for Watchparty binaries and libraries.

pub mod logger;
pub mod time;
