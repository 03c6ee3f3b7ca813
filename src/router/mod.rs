//! Route dispatch.
//!
//! Handlers are registered in a shared [`RouteTable`] keyed by exact path.
//! The [`Dispatcher`] probes it first and falls back to static files.

pub mod dispatcher;
pub mod handler;
pub mod table;

pub use dispatcher::Dispatcher;
pub use handler::{Handler, ResponseContext};
pub use table::RouteTable;
