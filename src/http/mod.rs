//! HTTP protocol layer.
//!
//! # Architecture
//!
//! - **`connection`**: per-client state machine that reads one request, answers it and closes
//! - **`parser`**: parses requests out of a byte buffer
//! - **`request`**: request representation, target and parameter splitting
//! - **`response`**: response representation with builder pattern
//! - **`writer`**: serializes and writes responses to the client
//! - **`mime`**: extension registry mapping file extensions to loaders and MIME types
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for incoming request data
//!        └──────┬──────┘
//!               │ Request received (malformed → 400 straight to Writing)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Session lookup, routing
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               ▼
//!             Closed
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod connection;
pub mod writer;
pub mod mime;
