//! HTTP/1.x wire protocol.
//!
//! One request per connection: the server reads a request head, dispatches
//! it, writes a single response and closes.
//!
//! # Architecture
//!
//! - **`connection`**: per-connection state machine driving parse → dispatch → respond
//! - **`parser`**: parses the request line and headers from a byte buffer
//! - **`request`**: request representation and the query-parameter accessors
//! - **`query`**: query string splitting (last duplicate wins, no decoding)
//! - **`response`**: response representation with builder pattern
//! - **`writer`**: serializes and writes responses to the client
//! - **`mime`**: content type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for the request head
//!        └──────┬──────┘
//!               │ Request parsed        (malformed → 400 response)
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← Route table, then static files
//!        └──────┬───────────┘
//!               │ Response ready         (handler panic → 500 response)
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```

pub mod request;
pub mod response;
pub mod parser;
pub mod query;
pub mod connection;
pub mod writer;
pub mod mime;
