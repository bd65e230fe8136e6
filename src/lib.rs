//! Webhost - minimal embedded HTTP server
//!
//! Serves static content from a website root through an extension-driven
//! router, tracks a session per client address, and bounds concurrent
//! accepts with a permit pool.

pub mod config;
pub mod error;
pub mod http;
pub mod router;
pub mod server;
pub mod session;
