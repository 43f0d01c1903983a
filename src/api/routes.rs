//! Route table module
//!
//! Routing is a fixed, ordered list of exact-path rules. The first rule
//! whose path equals the request path wins; anything else falls through to
//! the not-found handler. Matching is case-sensitive and does not
//! normalize trailing slashes.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::handlers;

/// An exact-path route and the handler producing its response.
pub struct RouteRule {
    pub path: &'static str,
    pub handler: fn() -> Response<Full<Bytes>>,
}

/// Route table in priority order.
static ROUTES: &[RouteRule] = &[
    RouteRule {
        path: "/",
        handler: handlers::service_status,
    },
    RouteRule {
        path: "/api/analyze",
        handler: handlers::analyze_receipt,
    },
];

/// Find the first table rule matching `target`.
pub fn resolve(target: &str) -> Option<&'static RouteRule> {
    find(ROUTES, target)
}

/// Path component of a raw request target: everything before the first
/// `?` or `#`.
pub fn request_path(target: &str) -> &str {
    let end = target.find(['?', '#']).unwrap_or(target.len());
    &target[..end]
}

/// First rule in `rules` whose path equals the path component of `target`.
fn find<'a>(rules: &'a [RouteRule], target: &str) -> Option<&'a RouteRule> {
    let path = request_path(target);
    rules.iter().find(|rule| rule.path == path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn test_resolve_known_paths() {
        assert_eq!(resolve("/").unwrap().path, "/");
        assert_eq!(resolve("/api/analyze").unwrap().path, "/api/analyze");
    }

    #[test]
    fn test_resolve_ignores_query_and_fragment() {
        assert_eq!(resolve("/?debug=1").unwrap().path, "/");
        assert_eq!(resolve("/api/analyze?file=report.jtl").unwrap().path, "/api/analyze");
        assert_eq!(resolve("/api/analyze#section").unwrap().path, "/api/analyze");
        assert_eq!(resolve("/api/analyze?x=1#y").unwrap().path, "/api/analyze");
    }

    #[test]
    fn test_resolve_rejects_unknown_paths() {
        assert!(resolve("/api").is_none());
        assert!(resolve("/api/analyze/").is_none());
        assert!(resolve("/api/analyze/extra").is_none());
        assert!(resolve("/API/ANALYZE").is_none());
        assert!(resolve("/missing").is_none());
        assert!(resolve("").is_none());
    }

    #[test]
    fn test_request_path() {
        assert_eq!(request_path("/a/b"), "/a/b");
        assert_eq!(request_path("/a/b?x=1"), "/a/b");
        assert_eq!(request_path("/a/b#frag"), "/a/b");
        assert_eq!(request_path("/a/b?x=1#frag"), "/a/b");
        assert_eq!(request_path("/#?"), "/");
    }

    #[test]
    fn test_find_returns_first_match_in_order() {
        let rules = [
            RouteRule {
                path: "/dup",
                handler: handlers::service_status,
            },
            RouteRule {
                path: "/dup",
                handler: handlers::not_found,
            },
        ];

        let rule = find(&rules, "/dup").unwrap();
        assert_eq!((rule.handler)().status(), StatusCode::OK);
    }
}
