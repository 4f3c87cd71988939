// This module exposes the HTTP routing for integration testing
// In production, it is only used from main.rs

use crate::application::{
    import_csv, ErrorResponse, ImportResponse, NewRecordRequest, RegistryError, RegistryUseCase,
    VerifyError, VerifyRequest, VerifyUseCase,
};
use crate::infrastructure::database::RecordRepository;
use crate::infrastructure::gemini::DocumentAnalyzer;
use base64::Engine;
use hyper::{Body, Method, Request, Response, StatusCode};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Shared per-process state: the registry repository and the AI collaborator.
/// The repository sits behind a mutex only because the hyper service shares
/// it across requests; verification itself never mutates it.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Mutex<Box<dyn RecordRepository>>>,
    pub analyzer: Arc<dyn DocumentAnalyzer>,
}

impl AppState {
    pub fn new(repository: Box<dyn RecordRepository>, analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        Self {
            repository: Arc::new(Mutex::new(repository)),
            analyzer,
        }
    }

    fn registry(&self) -> RegistryUseCase {
        RegistryUseCase::new(self.repository.clone())
    }
}

pub async fn route(state: AppState, req: Request<Body>) -> Result<Response<Body>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    tracing::debug!(%method, %path, "Incoming request");

    let response = match (&method, path.as_str()) {
        (&Method::GET, "/api/records") => list_records(&state),
        (&Method::POST, "/api/records/import") => import_records(&state, req).await?,
        (&Method::POST, "/api/records") => create_record(&state, req).await?,
        (&Method::DELETE, p) if p.starts_with("/api/records/") => {
            delete_record(&state, &p["/api/records/".len()..])
        }
        (&Method::POST, "/api/verify") => verify_document(&state, req).await?,
        _ => json_response(StatusCode::NOT_FOUND, &ErrorResponse::new("Not found")),
    };

    Ok(response)
}

fn list_records(state: &AppState) -> Response<Body> {
    match state.registry().list() {
        Ok(records) => json_response(StatusCode::OK, &records),
        Err(e) => {
            tracing::error!(error = %e, "Failed to list records");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse::new(e.to_string()),
            )
        }
    }
}

async fn create_record(
    state: &AppState,
    req: Request<Body>,
) -> Result<Response<Body>, hyper::Error> {
    let body = hyper::body::to_bytes(req.into_body()).await?;

    let payload: NewRecordRequest = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            return Ok(json_response(
                StatusCode::BAD_REQUEST,
                &ErrorResponse::new(format!("Invalid record payload: {}", e)),
            ))
        }
    };

    let response = match state.registry().add(payload.into_record()) {
        Ok(record) => json_response(StatusCode::CREATED, &record),
        Err(e) => {
            tracing::error!(error = %e, "Failed to add record");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse::new(e.to_string()),
            )
        }
    };

    Ok(response)
}

fn delete_record(state: &AppState, id: &str) -> Response<Body> {
    match state.registry().remove(id) {
        Ok(()) => Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(Body::empty())
            .unwrap_or_default(),
        Err(RegistryError::NotFound) => {
            json_response(StatusCode::NOT_FOUND, &ErrorResponse::new("Record not found"))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete record");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse::new(e.to_string()),
            )
        }
    }
}

async fn import_records(
    state: &AppState,
    req: Request<Body>,
) -> Result<Response<Body>, hyper::Error> {
    let body = hyper::body::to_bytes(req.into_body()).await?;

    let text = match std::str::from_utf8(&body) {
        Ok(text) => text,
        Err(_) => {
            return Ok(json_response(
                StatusCode::BAD_REQUEST,
                &ErrorResponse::new("Import body must be UTF-8 CSV text"),
            ))
        }
    };

    let records = match import_csv(text) {
        Ok(records) => records,
        Err(e) => {
            return Ok(json_response(
                StatusCode::BAD_REQUEST,
                &ErrorResponse::new(e.to_string()),
            ))
        }
    };

    let response = match state.registry().add_all(records) {
        Ok(imported) => json_response(StatusCode::OK, &ImportResponse { imported }),
        Err(e) => {
            tracing::error!(error = %e, "Failed to store imported records");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse::new(e.to_string()),
            )
        }
    };

    Ok(response)
}

async fn verify_document(
    state: &AppState,
    req: Request<Body>,
) -> Result<Response<Body>, hyper::Error> {
    let body = hyper::body::to_bytes(req.into_body()).await?;

    let payload: VerifyRequest = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            return Ok(json_response(
                StatusCode::BAD_REQUEST,
                &ErrorResponse::new(format!("Invalid verify payload: {}", e)),
            ))
        }
    };

    let image = match base64::engine::general_purpose::STANDARD.decode(&payload.content) {
        Ok(image) => image,
        Err(e) => {
            return Ok(json_response(
                StatusCode::BAD_REQUEST,
                &ErrorResponse::new(format!("Invalid base64 content: {}", e)),
            ))
        }
    };

    let usecase = VerifyUseCase::new(state.repository.clone(), state.analyzer.clone());

    let response = match usecase.execute(&image, &payload.mime_type).await {
        Ok(result) => json_response(StatusCode::OK, &result),
        // No verdict could be produced; the caller should retry with a
        // clearer photo. Distinct from a "no match" verdict.
        Err(VerifyError::Extraction(e)) => {
            tracing::warn!(error = %e, "Extraction failed");
            json_response(StatusCode::BAD_GATEWAY, &ErrorResponse::new(e.to_string()))
        }
        Err(e) => {
            tracing::error!(error = %e, "Verification failed");
            json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &ErrorResponse::new(e.to_string()),
            )
        }
    };

    Ok(response)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Body> {
    let json = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());

    Response::builder()
        .status(status)
        .header(hyper::header::CONTENT_TYPE, "application/json")
        .body(Body::from(json))
        .unwrap_or_default()
}
