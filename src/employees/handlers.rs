//! Direct CRUD HTTP handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{MatchedPath, Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::employees::model::Employee;
use crate::employees::store::{EmployeeStore, SearchField};
use crate::http::request::request_id;
use crate::http::response::ApiError;
use crate::observability::metrics;

/// State shared by the CRUD handlers.
#[derive(Clone)]
pub struct ServiceState {
    pub store: Arc<dyn EmployeeStore>,
}

impl ServiceState {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub version: &'static str,
    pub status: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid employee ID".to_string()))
}

fn decode(payload: Result<Json<Employee>, JsonRejection>) -> Result<Employee, ApiError> {
    let Json(employee) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected employee payload");
        ApiError::BadRequest("Invalid request payload".to_string())
    })?;
    employee.validate()?;
    Ok(employee)
}

pub async fn list_employees(
    State(state): State<ServiceState>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

pub async fn get_employee(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.get(id).await?))
}

pub async fn search_employees(
    State(state): State<ServiceState>,
    Path((field, value)): Path<(String, String)>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    if field.trim().is_empty() || value.is_empty() {
        return Err(ApiError::BadRequest(
            "Search field and value are required".to_string(),
        ));
    }
    let field: SearchField = field.parse()?;
    Ok(Json(state.store.search(field, &value).await?))
}

pub async fn create_employee(
    State(state): State<ServiceState>,
    payload: Result<Json<Employee>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = decode(payload)?;
    let created = state.store.create(employee).await?;
    tracing::info!(id = created.id, "Employee created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Employee created successfully",
            "id": created.id,
        })),
    ))
}

pub async fn update_employee(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
    payload: Result<Json<Employee>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    let id = parse_id(&id)?;
    let employee = decode(payload)?;
    let updated = state.store.update(id, employee).await?;
    tracing::info!(id, "Employee updated");
    Ok(Json(updated))
}

pub async fn delete_employee(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    state.store.delete(id).await?;
    tracing::info!(id, "Employee deleted");
    Ok(Json(json!({ "message": "Employee deleted successfully" })))
}

/// Log and count every service request by its matched route.
pub async fn track_request(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let request_id = request_id(request.headers()).to_string();

    let response = next.run(request).await;
    let status = response.status().as_u16();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        route = %route,
        status,
        "Request handled"
    );
    metrics::record_request(&route, &method, status, start_time);
    response
}
