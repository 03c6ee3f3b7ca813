//! Registration API and connection acceptor.
//!
//! ```no_run
//! use microserve::config::Config;
//! use microserve::http::request::Request;
//! use microserve::router::ResponseContext;
//! use microserve::server::HttpServer;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let server = HttpServer::new(Config::load());
//! server.static_files("/webroot");
//! server.get("/hello", |req: &Request, _: &mut ResponseContext| {
//!     format!("hello {}", req.value("name"))
//! });
//! server.start().await
//! # }
//! ```

pub mod listener;

use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::http::connection::Limits;
use crate::http::request::Request;
use crate::router::{Dispatcher, Handler, ResponseContext, RouteTable};
use crate::static_files::StaticFiles;

/// An embeddable server: a route table, a static root and a listen address.
///
/// Registration may happen before or while serving; the table tolerates
/// concurrent lookups.
pub struct HttpServer {
    config: Config,
    routes: Arc<RouteTable>,
    static_files: Arc<StaticFiles>,
}

impl HttpServer {
    pub fn new(config: Config) -> Self {
        let static_files = Arc::new(StaticFiles::new(&config.static_files));
        Self {
            config,
            routes: Arc::new(RouteTable::new()),
            static_files,
        }
    }

    /// Registers a GET handler. Shares its key space with [`post`](Self::post).
    pub fn get<F>(&self, path: impl Into<String>, handler: F) -> &Self
    where
        F: Fn(&Request, &mut ResponseContext) -> String + Send + Sync + 'static,
    {
        self.routes.register(path, handler);
        self
    }

    /// Registers a POST handler.
    ///
    /// The route table is keyed by path alone, so this replaces any GET
    /// handler registered at the same path (and vice versa).
    pub fn post<F>(&self, path: impl Into<String>, handler: F) -> &Self
    where
        F: Fn(&Request, &mut ResponseContext) -> String + Send + Sync + 'static,
    {
        self.routes.register(path, handler);
        self
    }

    /// Registers a named handler type.
    pub fn route<H: Handler>(&self, path: impl Into<String>, handler: H) -> &Self {
        self.routes.register(path, handler);
        self
    }

    /// Sets the static root; `/webroot` and `webroot` are equivalent.
    pub fn static_files(&self, root: &str) -> &Self {
        self.static_files.set_root(root);
        self
    }

    /// Effective static root after normalization.
    pub fn static_root(&self) -> PathBuf {
        self.static_files.root()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(
            Arc::clone(&self.routes),
            Arc::clone(&self.static_files),
            self.config.server.route_prefix.as_str(),
        )
    }

    /// Binds the configured address and serves until the task is dropped.
    pub async fn start(&self) -> anyhow::Result<()> {
        listener::run(
            &self.config.server.listen_addr,
            self.dispatcher(),
            Limits::from(&self.config.server),
        )
        .await
    }

    /// Serves on an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        listener::serve(listener, self.dispatcher(), Limits::from(&self.config.server)).await
    }
}
