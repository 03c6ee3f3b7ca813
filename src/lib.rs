//! Microserve - embeddable HTTP/1.x server
//!
//! Register handlers by exact path, point the server at a static root, and
//! block serving one response per connection.

pub mod config;
pub mod http;
pub mod router;
pub mod server;
pub mod static_files;
