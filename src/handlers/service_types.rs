// src/handlers/service_types.rs

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
    middleware::auth::AdminUser,
    models::catalog::{CreateServiceTypePayload, ServiceType, UpdateServiceTypePayload},
};

#[derive(Debug, Deserialize)]
pub struct ActiveFilter {
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

// GET /api/service-types?active=true
#[utoipa::path(
    get,
    path = "/api/service-types",
    tag = "ServiceTypes",
    params(("active" = Option<bool>, Query, description = "Só os ativos")),
    responses(
        (status = 200, description = "Catálogo de tipos de serviço", body = Vec<ServiceType>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_service_types(
    State(app_state): State<AppState>,
    Query(filter): Query<ActiveFilter>,
) -> Result<impl IntoResponse, AppError> {
    let service_types = if filter.active.unwrap_or(false) {
        app_state.catalog_service.get_active().await?
    } else {
        app_state.catalog_service.get_all().await?
    };
    Ok(Json(service_types))
}

// GET /api/service-types/{id}
#[utoipa::path(
    get,
    path = "/api/service-types/{id}",
    tag = "ServiceTypes",
    params(("id" = Uuid, Path, description = "ID do tipo de serviço")),
    responses(
        (status = 200, description = "Tipo de serviço encontrado", body = ServiceType),
        (status = 404, description = "Tipo de serviço não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_service_type(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let service_type = app_state.catalog_service.get(id).await?;
    Ok(Json(service_type))
}

// POST /api/service-types
#[utoipa::path(
    post,
    path = "/api/service-types",
    tag = "ServiceTypes",
    request_body = CreateServiceTypePayload,
    responses(
        (status = 201, description = "Tipo de serviço criado", body = ServiceType),
        (status = 409, description = "Nome já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_service_type(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<CreateServiceTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let service_type = app_state.catalog_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(service_type)))
}

// PUT /api/service-types/{id}
#[utoipa::path(
    put,
    path = "/api/service-types/{id}",
    tag = "ServiceTypes",
    params(("id" = Uuid, Path, description = "ID do tipo de serviço")),
    request_body = UpdateServiceTypePayload,
    responses(
        (status = 200, description = "Tipo de serviço atualizado", body = ServiceType),
        (status = 404, description = "Tipo de serviço não encontrado"),
        (status = 409, description = "Nome já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_service_type(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let service_type = app_state.catalog_service.update(id, &payload).await?;
    Ok(Json(service_type))
}

// DELETE /api/service-types/{id}: soft delete; id inexistente é no-op
#[utoipa::path(
    delete,
    path = "/api/service-types/{id}",
    tag = "ServiceTypes",
    params(("id" = Uuid, Path, description = "ID do tipo de serviço")),
    responses(
        (status = 204, description = "Desativado (ou já não existia)")
    ),
    security(("api_jwt" = []))
)]
pub async fn deactivate_service_type(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/service-types/{id}/activate: idem, no-op silencioso
#[utoipa::path(
    post,
    path = "/api/service-types/{id}/activate",
    tag = "ServiceTypes",
    params(("id" = Uuid, Path, description = "ID do tipo de serviço")),
    responses(
        (status = 204, description = "Reativado (ou já não existia)")
    ),
    security(("api_jwt" = []))
)]
pub async fn activate_service_type(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.activate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/service-types/by-name?name=...
#[utoipa::path(
    get,
    path = "/api/service-types/by-name",
    tag = "ServiceTypes",
    params(("name" = String, Query, description = "Nome do tipo de serviço")),
    responses(
        (status = 200, description = "Tipo de serviço encontrado", body = ServiceType),
        (status = 404, description = "Tipo de serviço não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_service_type_by_name(
    State(app_state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<impl IntoResponse, AppError> {
    let service_type = app_state.catalog_service.get_by_name(&query.name).await?;
    Ok(Json(service_type))
}

// GET /api/service-types/check-name?name=...
pub async fn check_name(
    State(app_state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<impl IntoResponse, AppError> {
    let available = app_state.catalog_service.is_name_available(&query.name).await?;
    Ok(Json(available))
}
