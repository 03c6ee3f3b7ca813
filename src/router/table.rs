use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::router::handler::Handler;

/// Exact-path route table shared by every connection.
///
/// Keys are request paths with no pattern syntax. The verb is not part of
/// the key, so a POST registration replaces a GET one at the same path.
/// Handlers are stored behind `Arc` and cloned out of the lock, so a lookup
/// never holds the lock while a handler runs.
#[derive(Default)]
pub struct RouteTable {
    routes: RwLock<HashMap<String, Arc<dyn Handler>>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the handler for `path`.
    ///
    /// Returns `true` when an existing handler was replaced.
    pub fn register<H: Handler>(&self, path: impl Into<String>, handler: H) -> bool {
        let path = path.into();
        let replaced = self
            .routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.clone(), Arc::new(handler))
            .is_some();

        if replaced {
            tracing::debug!(path = %path, "Route handler replaced");
        } else {
            tracing::debug!(path = %path, "Route registered");
        }
        replaced
    }

    pub fn lookup(&self, path: &str) -> Option<Arc<dyn Handler>> {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.routes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every route.
    pub fn clear(&self) {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::{Request, RequestBuilder};
    use crate::router::handler::ResponseContext;

    fn reply(text: &'static str) -> impl Handler {
        move |_: &Request, _: &mut ResponseContext| text.to_string()
    }

    #[test]
    fn register_replaces_without_growing() {
        let table = RouteTable::new();
        assert!(!table.register("/test", reply("First version")));
        assert!(table.register("/test", reply("Second version")));
        assert_eq!(table.len(), 1);

        let req = RequestBuilder::new().path("/test").build().unwrap();
        let handler = table.lookup("/test").unwrap();
        assert_eq!(handler.handle(&req, &mut ResponseContext::new()), "Second version");
    }

    #[test]
    fn clear_empties_table() {
        let table = RouteTable::new();
        table.register("/a", reply(""));
        table.clear();
        assert!(table.is_empty());
        assert!(table.lookup("/a").is_none());
    }
}
