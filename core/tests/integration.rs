//! End-to-end test against the live echo server.
//!
//! # Design
//! Starts the echo server on a random port, builds requests with
//! `RequestContext`, executes the resulting `HttpRequest` over real HTTP with
//! ureq, and checks what the server actually received.

use std::time::Duration;

use echo_server::Echo;
use reqctx_core::{HttpMethod, HttpRequest, RequestContext};
use serde_json::json;

/// Execute an `HttpRequest` using ureq and decode the echo server's reply.
///
/// Disables ureq's automatic status-code-as-error behavior so any response
/// is returned as data, and applies the request's own timeouts.
fn execute(req: HttpRequest) -> Echo {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_connect(Some(Duration::from_secs(req.connection_timeout)))
        .timeout_global(Some(Duration::from_secs(req.timeout)))
        .build()
        .new_agent();

    let mut builder = ureq::http::Request::builder()
        .method(req.method.as_str())
        .uri(&req.uri);
    for (name, value) in &req.headers {
        builder = builder.header(name, value);
    }

    let mut response = match req.body {
        Some(body) => agent.run(builder.body(body).unwrap()),
        None => agent.run(builder.body(()).unwrap()),
    }
    .expect("HTTP transport error");

    let body = response.body_mut().read_to_string().unwrap_or_default();
    serde_json::from_str(&body).expect("echo server returned invalid JSON")
}

fn start_server() -> String {
    let _ = env_logger::builder().is_test(true).try_init();

    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            echo_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn requests_arrive_as_described() {
    let base = start_server();

    // Step 1: plain GET with query parameters and synthesized content type.
    let mut ctx = RequestContext::new(format!("{base}/search"));
    ctx.set_request_parameter("q", "rust lang")
        .set_request_parameter("page", 2);
    let echo = execute(ctx.to_http_request());
    assert_eq!(echo.method, "GET");
    assert_eq!(echo.path, "/search");
    assert_eq!(echo.query.as_deref(), Some("q=rust+lang&page=2"));
    assert_eq!(echo.headers["content-type"], "text/plain; charset=UTF-8");
    assert_eq!(echo.body, "");

    // Step 2: POST a JSON body with an explicit content type.
    let mut ctx = RequestContext::new(format!("{base}/items"));
    ctx.set_method_name("POST")
        .unwrap()
        .set_header("Content-Type", "application/json")
        .set_header("X-Request-Id", "42")
        .set_data(json!({"title": "Buy milk", "done": false}));
    let echo = execute(ctx.to_http_request());
    assert_eq!(echo.method, "POST");
    assert_eq!(echo.query, None);
    assert_eq!(echo.headers["content-type"], "application/json");
    assert_eq!(echo.headers["x-request-id"], "42");
    let body: serde_json::Value = serde_json::from_str(&echo.body).unwrap();
    assert_eq!(body, json!({"title": "Buy milk", "done": false}));

    // Step 3: PUT a raw string body to a URI that already has a query.
    let mut ctx = RequestContext::new(format!("{base}/items/7?v=1"));
    ctx.set_method(HttpMethod::Put)
        .set_charset("ISO-8859-1")
        .set_data("replacement")
        .set_request_parameter("force", true);
    let echo = execute(ctx.to_http_request());
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.path, "/items/7");
    assert_eq!(echo.query.as_deref(), Some("v=1&force=1"));
    assert_eq!(echo.headers["content-type"], "text/plain; charset=ISO-8859-1");
    assert_eq!(echo.body, "replacement");

    // Step 4: PATCH and DELETE reach the server with their own method names.
    for method in [HttpMethod::Patch, HttpMethod::Delete] {
        let mut ctx = RequestContext::new(format!("{base}/items/7"));
        ctx.set_method(method);
        let echo = execute(ctx.to_http_request());
        assert_eq!(echo.method, method.as_str());
    }
}
