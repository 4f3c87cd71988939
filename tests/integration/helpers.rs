use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use vericert::handlers::{route, AppState};
use vericert::infrastructure::database::SqliteRepository;
use vericert::infrastructure::gemini::GeminiAnalyzer;

/// Boot the API with a fresh in-memory registry and an analyzer pointed at
/// the given (mock) Gemini base URL. Returns the server's base URL.
pub async fn start_api(gemini_base_url: &str) -> String {
    let repository = SqliteRepository::new_in_memory().expect("in-memory registry");
    let analyzer = GeminiAnalyzer::new(
        "test-key".to_string(),
        None,
        Some(gemini_base_url.to_string()),
    )
    .expect("analyzer");

    let state = AppState::new(Box::new(repository), Arc::new(analyzer));

    let make_svc = make_service_fn(move |_conn| {
        let state = state.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| route(state.clone(), req)))
        }
    });

    // Bind to random port
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let server = hyper::Server::bind(&addr).serve(make_svc);
    let actual_addr = server.local_addr();

    tokio::spawn(async move {
        if let Err(e) = server.await {
            eprintln!("API server error: {}", e);
        }
    });

    format!("http://{}", actual_addr)
}

async fn request(
    method: Method,
    url: &str,
    body: Body,
    content_type: &str,
) -> (StatusCode, serde_json::Value) {
    let client = hyper::Client::new();
    let req = Request::builder()
        .method(method)
        .uri(url)
        .header("content-type", content_type)
        .body(body)
        .expect("request build");

    let response = client.request(req).await.expect("request send");
    let status = response.status();
    let bytes = hyper::body::to_bytes(response).await.expect("body read");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

pub async fn get_json(base: &str, path: &str) -> (StatusCode, serde_json::Value) {
    request(
        Method::GET,
        &format!("{}{}", base, path),
        Body::empty(),
        "application/json",
    )
    .await
}

pub async fn post_json(
    base: &str,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    request(
        Method::POST,
        &format!("{}{}", base, path),
        Body::from(body.to_string()),
        "application/json",
    )
    .await
}

pub async fn post_csv(base: &str, path: &str, csv: &str) -> (StatusCode, serde_json::Value) {
    request(
        Method::POST,
        &format!("{}{}", base, path),
        Body::from(csv.to_string()),
        "text/csv",
    )
    .await
}

pub async fn delete(base: &str, path: &str) -> (StatusCode, serde_json::Value) {
    request(
        Method::DELETE,
        &format!("{}{}", base, path),
        Body::empty(),
        "application/json",
    )
    .await
}
