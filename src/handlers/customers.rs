// src/handlers/customers.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::customers::{
        CreateCustomerPayload, CreateLocationPayload, CustomerResponse, ServiceLocation,
        UpdateCustomerPayload, UpdateLocationPayload,
    },
};

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

// =============================================================================
//  ÁREA 1: CLIENTES
// =============================================================================

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    responses(
        (status = 200, description = "Lista de clientes com seus endereços", body = Vec<CustomerResponse>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let customers = app_state.customer_service.get_all_customers().await?;
    Ok(Json(customers))
}

// GET /api/customers/{id}
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente encontrado", body = CustomerResponse),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state.customer_service.get_customer(id).await?;
    Ok(Json(customer))
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CreateCustomerPayload,
    responses(
        (status = 201, description = "Cliente criado", body = CustomerResponse),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_customer(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let customer = app_state.customer_service.create_customer(&payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

// PUT /api/customers/{id}
#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = UpdateCustomerPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = CustomerResponse),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let customer = app_state.customer_service.update_customer(id, &payload).await?;
    Ok(Json(customer))
}

// DELETE /api/customers/{id}, leva os endereços junto (cascata)
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.customer_service.delete_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/customers/by-email?email=...
#[utoipa::path(
    get,
    path = "/api/customers/by-email",
    tag = "Customers",
    params(("email" = String, Query, description = "E-mail do cliente")),
    responses(
        (status = 200, description = "Cliente encontrado", body = CustomerResponse),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_customer_by_email(
    State(app_state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    let customer = app_state
        .customer_service
        .get_customer_by_email(&query.email)
        .await?;
    Ok(Json(customer))
}

// GET /api/customers/check-email?email=...
pub async fn check_email(
    State(app_state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    let available = app_state
        .customer_service
        .is_email_available(&query.email)
        .await?;
    Ok(Json(available))
}

// =============================================================================
//  ÁREA 2: ENDEREÇOS DE ATENDIMENTO
// =============================================================================

// GET /api/customers/{id}/locations
#[utoipa::path(
    get,
    path = "/api/customers/{id}/locations",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Endereços do cliente", body = Vec<ServiceLocation>),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_locations(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let locations = app_state.customer_service.get_locations(id).await?;
    Ok(Json(locations))
}

// POST /api/customers/{id}/locations
#[utoipa::path(
    post,
    path = "/api/customers/{id}/locations",
    tag = "Customers",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = CreateLocationPayload,
    responses(
        (status = 201, description = "Endereço criado", body = ServiceLocation),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_location(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateLocationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let location = app_state.customer_service.add_location(id, &payload).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

// PUT /api/customers/locations/{location_id}
#[utoipa::path(
    put,
    path = "/api/customers/locations/{location_id}",
    tag = "Customers",
    params(("location_id" = Uuid, Path, description = "ID do endereço")),
    request_body = UpdateLocationPayload,
    responses(
        (status = 200, description = "Endereço atualizado", body = ServiceLocation),
        (status = 404, description = "Endereço não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_location(
    State(app_state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Json(payload): Json<UpdateLocationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let location = app_state
        .customer_service
        .update_location(location_id, &payload)
        .await?;
    Ok(Json(location))
}

// DELETE /api/customers/locations/{location_id}
#[utoipa::path(
    delete,
    path = "/api/customers/locations/{location_id}",
    tag = "Customers",
    params(("location_id" = Uuid, Path, description = "ID do endereço")),
    responses(
        (status = 204, description = "Endereço removido"),
        (status = 404, description = "Endereço não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_location(
    State(app_state): State<AppState>,
    Path(location_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.customer_service.delete_location(location_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
