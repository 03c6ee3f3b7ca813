use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::http::request::Request;
use crate::http::response::{Response, ResponseBuilder};
use crate::router::handler::{Handler, ResponseContext};
use crate::router::table::RouteTable;
use crate::static_files::StaticFiles;

/// Chooses between a registered handler and the static resolver.
///
/// An exact route always wins over a file with the same path. Each request
/// ends in exactly one of: handler response, static file, 404.
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
    static_files: Arc<StaticFiles>,
    route_prefix: String,
}

impl Dispatcher {
    pub fn new(
        routes: Arc<RouteTable>,
        static_files: Arc<StaticFiles>,
        route_prefix: impl Into<String>,
    ) -> Self {
        let route_prefix: String = route_prefix.into();
        Self {
            routes,
            static_files,
            route_prefix: route_prefix.trim_end_matches('/').to_string(),
        }
    }

    pub async fn dispatch(&self, request: &Request) -> Response {
        if let Some(handler) = self.route_key(&request.path).and_then(|key| self.routes.lookup(key)) {
            return invoke(handler.as_ref(), request);
        }

        match self.static_files.resolve(&request.path).await {
            Ok(Some(file)) => Response::ok(file.content_type, file.content),
            Ok(None) => Response::not_found(),
            Err(e) => {
                tracing::error!(path = %request.path, error = %e, "Failed to read static file");
                Response::internal_error()
            }
        }
    }

    /// Route-table key for a request path, `None` when the path lies outside
    /// the route prefix.
    fn route_key<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.route_prefix.is_empty() {
            return Some(path);
        }
        match path.strip_prefix(self.route_prefix.as_str()) {
            Some(rest) if rest.starts_with('/') => Some(rest),
            _ => None,
        }
    }
}

/// Runs a handler, turning a panic into a 500 response.
fn invoke(handler: &dyn Handler, request: &Request) -> Response {
    let mut ctx = ResponseContext::new();

    let outcome = catch_unwind(AssertUnwindSafe(|| handler.handle(request, &mut ctx)));

    let body = match outcome {
        Ok(body) => body,
        Err(panic) => {
            let reason = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::warn!(path = %request.path, reason = %reason, "Handler panicked");
            return Response::internal_error();
        }
    };

    let mut builder = ResponseBuilder::new(ctx.status())
        .header("Content-Type", ctx.content_type());
    for (key, value) in ctx.headers() {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder.body(body).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticFilesConfig;
    use crate::http::request::RequestBuilder;
    use crate::http::response::StatusCode;

    fn dispatcher(prefix: &str) -> Dispatcher {
        let routes = Arc::new(RouteTable::new());
        routes.register("/hello", |req: &Request, _: &mut ResponseContext| {
            format!("hello {}", req.value("name"))
        });
        let statics = Arc::new(StaticFiles::new(&StaticFilesConfig {
            base_dir: "/nonexistent-base".to_string(),
            ..StaticFilesConfig::default()
        }));
        Dispatcher::new(routes, statics, prefix)
    }

    #[tokio::test]
    async fn prefix_is_stripped_before_lookup() {
        let d = dispatcher("/app");
        let req = RequestBuilder::new().target("/app/hello?name=Michael").build().unwrap();
        let resp = d.dispatch(&req).await;
        assert_eq!(resp.status, StatusCode::Ok);
        assert_eq!(resp.body, b"hello Michael");

        let bare = RequestBuilder::new().target("/hello").build().unwrap();
        assert_eq!(d.dispatch(&bare).await.status, StatusCode::NotFound);
    }

    #[tokio::test]
    async fn handler_can_override_status_and_type() {
        let d = dispatcher("");
        d.routes.register("/made", |_: &Request, res: &mut ResponseContext| {
            res.set_status(StatusCode::Created);
            res.set_content_type("text/plain");
            res.add_header("X-Trace", "1");
            "done".to_string()
        });
        let req = RequestBuilder::new().target("/made").build().unwrap();
        let resp = d.dispatch(&req).await;
        assert_eq!(resp.status, StatusCode::Created);
        assert_eq!(resp.header("Content-Type"), Some("text/plain"));
        assert_eq!(resp.header("X-Trace"), Some("1"));
    }

    #[tokio::test]
    async fn handler_header_replaces_content_type_in_any_case() {
        let d = dispatcher("");
        d.routes.register("/report.csv", |_: &Request, res: &mut ResponseContext| {
            res.add_header("content-type", "text/csv");
            "a,b".to_string()
        });
        let req = RequestBuilder::new().target("/report.csv").build().unwrap();
        let resp = d.dispatch(&req).await;

        let content_types: Vec<&String> = resp
            .headers
            .keys()
            .filter(|k| k.eq_ignore_ascii_case("Content-Type"))
            .collect();
        assert_eq!(content_types.len(), 1);
        assert_eq!(resp.header("Content-Type"), Some("text/csv"));
    }
}
