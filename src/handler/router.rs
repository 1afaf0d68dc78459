//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method check, welcome page at
//! `/`, everything else goes to static file serving.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use percent_encoding::percent_decode_str;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Percent-decoded path, query string removed
    pub path: &'a str,
    pub is_head: bool,
    pub range_header: Option<String>,
    pub access_log: bool,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let uri = req.uri();
    let is_head = *method == Method::HEAD;
    let access_log = state.access_log();

    logger::log_request(method, uri, req.version());

    // 1. Check HTTP method
    let response = if let Some(resp) = check_http_method(method) {
        resp
    } else {
        // 2. Decode path and extract the Range header
        let path = percent_decode_str(uri.path()).decode_utf8_lossy();
        let ctx = RequestContext {
            path: &path,
            is_head,
            // A present header always reaches range handling; bytes outside
            // visible ASCII leave an empty value, which resolves as malformed
            range_header: req
                .headers()
                .get("range")
                .map(|v| v.to_str().unwrap_or_default().to_string()),
            access_log,
        };

        // 3. Dispatch
        if ctx.path == "/" {
            let host = format!("{}:{}", state.config.server.host, state.config.server.port);
            http::build_html_response(static_files::get_welcome_page(&host), is_head)
        } else {
            static_files::serve_file(&ctx, &state.root_dir).await
        }
    };

    if access_log {
        log_access(&req, &response, peer_addr, &state);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    state: &AppState,
) {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format_version(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header("referer");
    entry.range = header("range");
    entry.user_agent = header("user-agent");

    logger::log_access(&entry, &state.config.logging.access_log_format);
}

const fn format_version(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use tempfile::TempDir;

    const FILE_SIZE: usize = 1000;

    fn payload() -> Vec<u8> {
        (0..FILE_SIZE).map(|i| (i % 251) as u8).collect()
    }

    fn setup() -> (TempDir, Arc<AppState>) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("hap")).unwrap();
        std::fs::write(dir.path().join("hap/AppSigned.hap"), payload()).unwrap();
        std::fs::write(
            dir.path().join("hap/manifest-jsdelivr.json5"),
            br#"{"app":{}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("empty.png"), b"").unwrap();

        let mut cfg = Config::load_from("does-not-exist/hap-distribution").unwrap();
        cfg.server.root_dir = dir.path().to_string_lossy().into_owned();
        cfg.logging.access_log = false;
        let state = Arc::new(AppState::new(&cfg).unwrap());
        (dir, state)
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    async fn send(
        state: &Arc<AppState>,
        method: Method,
        uri: &str,
        range: Option<&str>,
    ) -> (Response<Full<Bytes>>, Vec<u8>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(range) = range {
            builder = builder.header("Range", range);
        }
        let req = builder.body(()).unwrap();
        let resp = handle_request(req, Arc::clone(state), peer()).await.unwrap();
        let (parts, body) = resp.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes().to_vec();
        (Response::from_parts(parts, Full::new(Bytes::new())), bytes)
    }

    fn header<'a>(resp: &'a Response<Full<Bytes>>, name: &str) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    async fn get(state: &Arc<AppState>, uri: &str, range: Option<&str>) -> (Response<Full<Bytes>>, Vec<u8>) {
        send(state, Method::GET, uri, range).await
    }

    #[tokio::test]
    async fn test_root_serves_welcome_page() {
        let (_dir, state) = setup();
        for uri in ["/", "/?download=1"] {
            let (resp, body) = get(&state, uri, Some("bytes=0-10")).await;
            assert_eq!(resp.status(), 200);
            assert_eq!(header(&resp, "content-type"), Some("text/html; charset=utf-8"));
            assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
            assert!(String::from_utf8(body).unwrap().contains("AppSigned.hap"));
        }
    }

    #[tokio::test]
    async fn test_welcome_page_ignores_host_header() {
        let (_dir, state) = setup();
        let req = Request::builder()
            .uri("/")
            .header("Host", "x\"><script>alert(1)</script>")
            .body(())
            .unwrap();
        let resp = handle_request(req, Arc::clone(&state), peer()).await.unwrap();
        assert_eq!(resp.status(), 200);
        let body = String::from_utf8(resp.into_body().collect().await.unwrap().to_bytes().to_vec()).unwrap();
        assert!(!body.contains("<script>"));
        let server = &state.config.server;
        assert!(body.contains(&format!(
            "http://{}:{}/hap/AppSigned.hap",
            server.host, server.port
        )));
    }

    #[tokio::test]
    async fn test_non_ascii_range_is_unsatisfiable() {
        let (_dir, state) = setup();
        let req = Request::builder()
            .uri("/hap/AppSigned.hap")
            .header(
                "Range",
                hyper::header::HeaderValue::from_bytes(b"bytes=0-9\xff").unwrap(),
            )
            .body(())
            .unwrap();
        let resp = handle_request(req, Arc::clone(&state), peer()).await.unwrap();
        assert_eq!(resp.status(), 416);
        assert_eq!(header(&resp, "content-range"), Some("bytes */1000"));
    }

    #[tokio::test]
    async fn test_full_file() {
        let (_dir, state) = setup();
        let (resp, body) = get(&state, "/hap/AppSigned.hap", None).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(header(&resp, "content-type"), Some("application/octet-stream"));
        assert_eq!(header(&resp, "content-length"), Some("1000"));
        assert_eq!(header(&resp, "accept-ranges"), Some("bytes"));
        assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));
        assert_eq!(body, payload());
    }

    #[tokio::test]
    async fn test_partial_content() {
        let (_dir, state) = setup();
        for (start, end) in [(0usize, 0usize), (0, 99), (100, 499), (998, 999), (0, 999)] {
            let header_value = format!("bytes={start}-{end}");
            let (resp, body) = get(&state, "/hap/AppSigned.hap", Some(&header_value)).await;
            assert_eq!(resp.status(), 206);
            assert_eq!(body.len(), end - start + 1);
            assert_eq!(body, payload()[start..=end].to_vec());
            let expected_range = format!("bytes {start}-{end}/{FILE_SIZE}");
            assert_eq!(header(&resp, "content-range"), Some(expected_range.as_str()));
            let expected_length = (end - start + 1).to_string();
            assert_eq!(header(&resp, "content-length"), Some(expected_length.as_str()));
            assert_eq!(
                header(&resp, "access-control-expose-headers"),
                Some("Content-Length, Content-Range, Accept-Ranges")
            );
        }
    }

    #[tokio::test]
    async fn test_omitted_bounds() {
        let (_dir, state) = setup();
        let (resp, body) = get(&state, "/hap/AppSigned.hap", Some("bytes=900-")).await;
        assert_eq!(resp.status(), 206);
        assert_eq!(header(&resp, "content-range"), Some("bytes 900-999/1000"));
        assert_eq!(body, payload()[900..].to_vec());

        let (resp, body) = get(&state, "/hap/AppSigned.hap", Some("bytes=-9")).await;
        assert_eq!(resp.status(), 206);
        assert_eq!(header(&resp, "content-range"), Some("bytes 0-9/1000"));
        assert_eq!(body, payload()[..10].to_vec());
    }

    #[tokio::test]
    async fn test_implicit_full_range_matches_full_body() {
        let (_dir, state) = setup();
        let (_, full) = get(&state, "/hap/AppSigned.hap", None).await;
        let (resp, ranged) = get(&state, "/hap/AppSigned.hap", Some("bytes=-")).await;
        assert_eq!(resp.status(), 206);
        assert_eq!(ranged, full);
    }

    #[tokio::test]
    async fn test_unsatisfiable_ranges() {
        let (_dir, state) = setup();
        for range in ["bytes=500-100", "bytes=1000-", "bytes=1000-1001", "bytes=0-1023", "bytes=oops", "pages=1-2"] {
            let (resp, _) = get(&state, "/hap/AppSigned.hap", Some(range)).await;
            assert_eq!(resp.status(), 416, "range {range}");
            assert_eq!(header(&resp, "content-range"), Some("bytes */1000"));
        }
    }

    #[tokio::test]
    async fn test_empty_file_range() {
        let (_dir, state) = setup();
        let (resp, _) = get(&state, "/empty.png", Some("bytes=0-")).await;
        assert_eq!(resp.status(), 416);
        assert_eq!(header(&resp, "content-range"), Some("bytes */0"));

        let (resp, body) = get(&state, "/empty.png", None).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(header(&resp, "content-type"), Some("image/png"));
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let (_dir, state) = setup();
        for range in [None, Some("bytes=0-10")] {
            let (resp, _) = get(&state, "/hap/missing.hap", range).await;
            assert_eq!(resp.status(), 404);
        }
        let (resp, _) = get(&state, "/hap", None).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_percent_encoded_path() {
        let (dir, state) = setup();
        std::fs::write(dir.path().join("hap/my app.json"), b"[]").unwrap();
        let (resp, body) = get(&state, "/hap/my%20app.json", None).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(header(&resp, "content-type"), Some("application/json; charset=utf-8"));
        assert_eq!(body, b"[]");
    }

    #[tokio::test]
    async fn test_partition_reassembles_file() {
        let (_dir, state) = setup();
        let (_, full) = get(&state, "/hap/AppSigned.hap", None).await;

        let mut assembled = Vec::new();
        let mut start = 0;
        while start < FILE_SIZE {
            let end = (start + 299).min(FILE_SIZE - 1);
            let range = format!("bytes={start}-{end}");
            let (resp, body) = get(&state, "/hap/AppSigned.hap", Some(&range)).await;
            assert_eq!(resp.status(), 206);
            assembled.extend(body);
            start = end + 1;
        }
        assert_eq!(assembled, full);
    }

    #[tokio::test]
    async fn test_head_has_headers_without_body() {
        let (_dir, state) = setup();
        let (resp, body) = send(&state, Method::HEAD, "/hap/AppSigned.hap", Some("bytes=0-1")).await;
        assert_eq!(resp.status(), 206);
        assert_eq!(header(&resp, "content-length"), Some("2"));
        assert!(body.is_empty());

        let (resp, body) = send(&state, Method::HEAD, "/hap/AppSigned.hap", None).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(header(&resp, "content-length"), Some("1000"));
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_other_methods() {
        let (_dir, state) = setup();
        let (resp, _) = send(&state, Method::OPTIONS, "/hap/AppSigned.hap", None).await;
        assert_eq!(resp.status(), 204);
        assert_eq!(header(&resp, "access-control-allow-origin"), Some("*"));

        let (resp, _) = send(&state, Method::POST, "/hap/AppSigned.hap", None).await;
        assert_eq!(resp.status(), 405);
        assert_eq!(header(&resp, "allow"), Some("GET, HEAD, OPTIONS"));
    }
}
