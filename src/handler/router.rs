use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::{Method, Request, Response, Version};

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Check HTTP method and return early response if not GET/HEAD
/// Returns Some(response) for OPTIONS/405, None to continue processing
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            tracing::warn!("Method not allowed: {method}");
            Some(http::build_405_response())
        }
    }
}

/// hyper service entry point: forwards to [`SpaHandler::handle`](crate::handler::SpaHandler::handle)
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let response =
        check_http_method(req.method()).unwrap_or_else(|| state.spa.handle(&req));

    if state.config.logging.access_log {
        let entry = access_entry(&req, &response, peer_addr);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
) -> AccessLogEntry {
    let uri = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), ToString::to_string);
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), req.method().to_string(), uri);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fs::MemoryFs;
    use chrono::Utc;
    use hyper::StatusCode;

    fn state() -> Arc<AppState> {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::load_from(dir.path().join("none").to_str().unwrap()).unwrap();
        config.logging.access_log = false;
        let tree = MemoryFs::new().with_file("index.html", &b"<html></html>"[..], Utc::now());
        Arc::new(AppState::new(config, Arc::new(tree)))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    #[tokio::test]
    async fn test_get_is_served() {
        let req = Request::get("/dashboard").body(()).unwrap();
        let response = handle_request(req, state(), peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_options() {
        let req = Request::options("/").body(()).unwrap();
        let response = handle_request(req, state(), peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["allow"], "GET, HEAD, OPTIONS");
    }

    #[tokio::test]
    async fn test_post_not_allowed() {
        let req = Request::post("/index.html").body(()).unwrap();
        let response = handle_request(req, state(), peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_access_entry() {
        let req = Request::get("/app?x=1")
            .header("user-agent", "curl/8.0")
            .body(())
            .unwrap();
        let response = http::build_404_response();
        let entry = access_entry(&req, &response, peer());
        assert_eq!(entry.uri, "/app?x=1");
        assert_eq!(entry.status, 404);
        assert_eq!(entry.body_bytes, 13);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.remote_addr, "127.0.0.1");
    }
}
