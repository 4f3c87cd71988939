use hyper::service::{make_service_fn, service_fn};
use hyper::Server;
use std::convert::Infallible;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vericert::handlers::{route, AppState};
use vericert::infrastructure::database::{RecordRepository, SqliteRepository};
use vericert::infrastructure::gemini::GeminiAnalyzer;

const DEFAULT_BIND: &str = "0.0.0.0:3000";

/// Build the registry repository. The registry is in-memory by default,
/// matching the original deployment model (records live for the process
/// lifetime); VERICERT_DB_PATH opts into a file-backed database.
fn build_repository() -> Result<Box<dyn RecordRepository>, Box<dyn std::error::Error>> {
    match env::var("VERICERT_DB_PATH") {
        Ok(path) => {
            tracing::info!(%path, "Using file-backed registry");
            Ok(Box::new(SqliteRepository::new(&path)?))
        }
        Err(_) => Ok(Box::new(SqliteRepository::new_in_memory()?)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting VeriCert server");

    let api_key = env::var("GEMINI_API_KEY")?;
    let model = env::var("GEMINI_MODEL").ok();
    let base_url = env::var("GEMINI_BASE_URL").ok();
    let analyzer = Arc::new(GeminiAnalyzer::new(api_key, model, base_url)?);

    let repository = build_repository()?;
    tracing::info!(
        records = repository.count().unwrap_or(0),
        "Registry initialized"
    );

    let state = AppState::new(repository, analyzer);

    let addr: SocketAddr = env::var("VERICERT_BIND")
        .unwrap_or_else(|_| DEFAULT_BIND.to_string())
        .parse()?;

    let make_svc = make_service_fn(move |_conn| {
        let state = state.clone();
        async move { Ok::<_, Infallible>(service_fn(move |req| route(state.clone(), req))) }
    });

    tracing::info!(%addr, "Listening");
    Server::bind(&addr).serve(make_svc).await?;

    Ok(())
}
