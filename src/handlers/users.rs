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
    middleware::auth::{AdminUser, AuthenticatedUser},
    models::auth::{RegisterUserPayload, Role, UpdateEmailPayload, UpdateUserPayload},
};

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

// GET /api/users
pub async fn list_users(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_service.get_all().await?;
    Ok(Json(users))
}

// GET /api/users/{id}
pub async fn get_user(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.get(id).await?;
    Ok(Json(user))
}

// POST /api/users: admin cria conta de equipe sem passar pelo register
pub async fn create_user(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.user_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// PUT /api/users/{id} (só admin mexe em papel/atividade de outras contas)
pub async fn update_user(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.user_service.update(id, &payload).await?;
    Ok(Json(user))
}

// DELETE /api/users/{id}, soft delete
pub async fn deactivate_user(
    State(app_state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.user_service.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/users/{id}/email: o próprio dono da conta (ou um admin)
pub async fn update_email(
    State(app_state): State<AppState>,
    AuthenticatedUser(caller): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmailPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    if caller.id != id && caller.role != Role::Admin {
        return Err(AppError::Forbidden);
    }

    let user = app_state.user_service.update_email(id, &payload).await?;
    Ok(Json(user))
}

// GET /api/users/by-email?email=...
pub async fn get_user_by_email(
    State(app_state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.get_by_email(&query.email).await?;
    Ok(Json(user))
}

// GET /api/users/check-email?email=...
pub async fn check_email(
    State(app_state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, AppError> {
    let available = app_state.user_service.is_email_available(&query.email).await?;
    Ok(Json(available))
}
