use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use embed_spa::http::cache::{generate_etag, parse_http_date};
use embed_spa::{FileMetadata, MemoryFs, SpaConfig, SpaHandler};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header;
use hyper::{Request, Response, StatusCode};

fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn t1() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_086_400, 123_000_000).unwrap()
}

fn index_html() -> Vec<u8> {
    let mut html = b"<!doctype html><html><body><div id=app></div></body></html>".to_vec();
    html.resize(100, b' ');
    html
}

fn main_js() -> Vec<u8> {
    let mut js = b"import('./chunk.js').then(m => m.run());".to_vec();
    js.resize(50, b' ');
    js
}

fn tree() -> MemoryFs {
    MemoryFs::new()
        .with_file("index.html", index_html(), t0())
        .with_file("main.js", main_js(), t1())
        .with_file("assets/logo.svg", &b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"[..], t0())
}

fn spa(prefix: &str) -> SpaHandler {
    let config = SpaConfig::builder()
        .index_path("index.html")
        .strip_prefix(prefix)
        .build();
    SpaHandler::new(Arc::new(tree()), config)
}

fn get(path: &str) -> Request<()> {
    Request::get(path).body(()).unwrap()
}

async fn body(response: Response<Full<Bytes>>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn etag_of(response: &Response<Full<Bytes>>) -> String {
    response.headers()[header::ETAG].to_str().unwrap().to_string()
}

#[tokio::test]
async fn exact_match_then_not_modified() {
    let spa = spa("");

    let response = spa.handle(&get("/main.js"));
    assert_eq!(response.status(), StatusCode::OK);
    let expected = generate_etag(&FileMetadata { size: 50, modified: t1() });
    let etag = etag_of(&response);
    assert_eq!(etag, expected);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "max-age=604800");
    assert_eq!(response.headers()[header::VARY], "Accept-Encoding");
    assert_eq!(body(response).await.as_ref(), main_js().as_slice());

    let req = Request::get("/main.js")
        .header(header::IF_NONE_MATCH, &etag)
        .body(())
        .unwrap();
    let response = spa.handle(&req);
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    assert!(response.headers().get(header::EXPIRES).is_none());
    assert!(response.headers().get(header::ETAG).is_none());
    assert!(body(response).await.is_empty());
}

#[tokio::test]
async fn unknown_route_serves_index() {
    let spa = spa("");

    let response = spa.handle(&get("/dashboard"));
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    let expected = generate_etag(&FileMetadata { size: 100, modified: t0() });
    assert_eq!(etag_of(&response), expected);
    assert_eq!(body(response).await.as_ref(), index_html().as_slice());
}

#[tokio::test]
async fn fallback_body_equals_index_body() {
    let spa = spa("");
    let direct = body(spa.handle(&get("/index.html"))).await;
    for path in ["/app/settings", "/users/42/edit", "/missing.js", "/assets", "/%2e%2e/secret"] {
        let fallback = body(spa.handle(&get(path))).await;
        assert_eq!(fallback, direct, "fallback body differs for {path}");
    }
}

#[tokio::test]
async fn fallback_etag_revalidates() {
    let spa = spa("");
    let etag = etag_of(&spa.handle(&get("/settings")));
    let req = Request::get("/profile")
        .header(header::IF_NONE_MATCH, &etag)
        .body(())
        .unwrap();
    assert_eq!(spa.handle(&req).status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn stale_etag_gets_full_response() {
    let spa = spa("");
    let req = Request::get("/main.js")
        .header(header::IF_NONE_MATCH, "0123456789abcdef")
        .body(())
        .unwrap();
    let response = spa.handle(&req);
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body(response).await.len(), 50);
}

#[test]
fn expires_is_seven_days_ahead() {
    let spa = spa("");
    let before = Utc::now();
    let response = spa.handle(&get("/main.js"));
    let after = Utc::now();

    let value = response.headers()[header::EXPIRES].to_str().unwrap();
    assert!(value.ends_with(" GMT"));
    let expires = parse_http_date(value).expect("valid HTTP date");
    // HTTP dates have second precision
    let low = before + Duration::days(7) - Duration::seconds(1);
    let high = after + Duration::days(7);
    assert!(expires >= low && expires <= high, "{expires} not in [{low}, {high}]");
}

#[tokio::test]
async fn prefix_is_stripped() {
    let spa = spa("/app");
    assert_eq!(spa.resolve_path("/app/foo.js"), "foo.js");
    assert_eq!(spa.resolve_path("/app/"), "index.html");

    let response = spa.handle(&get("/app/main.js"));
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body(response).await.as_ref(), main_js().as_slice());

    let response = spa.handle(&get("/app/assets/logo.svg"));
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");

    let root = body(spa.handle(&get("/app/"))).await;
    assert_eq!(root.as_ref(), index_html().as_slice());
}

#[tokio::test]
async fn custom_fingerprint_is_used_verbatim() {
    let config = SpaConfig::builder()
        .index_path("index.html")
        .fingerprint(|path: &str, meta: &FileMetadata| format!("build-7-{}-{path}", meta.size))
        .build();
    let spa = SpaHandler::new(Arc::new(tree()), config);

    let response = spa.handle(&get("/main.js"));
    assert_eq!(etag_of(&response), "build-7-50-/main.js");

    // Fallback requests report the requested path and the index metadata
    let response = spa.handle(&get("/a/../settings"));
    assert_eq!(etag_of(&response), "build-7-100-/settings");
}

#[tokio::test]
async fn missing_index_is_not_found() {
    let tree = MemoryFs::new().with_file("main.js", main_js(), t1());
    let config = SpaConfig::builder().index_path("index.html").build();
    let spa = SpaHandler::new(Arc::new(tree), config);

    assert_eq!(spa.handle(&get("/main.js")).status(), StatusCode::OK);
    assert_eq!(spa.handle(&get("/dashboard")).status(), StatusCode::NOT_FOUND);
    assert_eq!(spa.handle(&get("/")).status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn range_and_head_are_delegated() {
    let spa = spa("");

    let req = Request::get("/main.js")
        .header(header::RANGE, "bytes=0-5")
        .body(())
        .unwrap();
    let response = spa.handle(&req);
    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.headers()[header::CONTENT_RANGE], "bytes 0-5/50");
    assert!(response.headers().get(header::ETAG).is_some());
    assert_eq!(body(response).await.as_ref(), &main_js()[..6]);

    let req = Request::head("/main.js").body(()).unwrap();
    let response = spa.handle(&req);
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "50");
    assert!(body(response).await.is_empty());
}

#[test]
fn default_fingerprint_is_deterministic() {
    let spa = spa("");
    let first = etag_of(&spa.handle(&get("/main.js")));
    let second = etag_of(&spa.handle(&get("/main.js")));
    assert_eq!(first, second);
    assert_ne!(first, etag_of(&spa.handle(&get("/index.html"))));
}
