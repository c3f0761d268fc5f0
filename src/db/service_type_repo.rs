// src/db/service_type_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::catalog::ServiceType};

const SERVICE_TYPE_COLUMNS: &str =
    "id, name, description, base_rate, base_duration_minutes, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct ServiceTypeRepository {
    pool: PgPool,
}

impl ServiceTypeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ServiceType>, AppError> {
        let sql = format!("SELECT {SERVICE_TYPE_COLUMNS} FROM service_types WHERE id = $1");
        let maybe_service_type = sqlx::query_as::<_, ServiceType>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_service_type)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<ServiceType>, AppError> {
        let sql =
            format!("SELECT {SERVICE_TYPE_COLUMNS} FROM service_types WHERE LOWER(name) = LOWER($1)");
        let maybe_service_type = sqlx::query_as::<_, ServiceType>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_service_type)
    }

    pub async fn list_all(&self) -> Result<Vec<ServiceType>, AppError> {
        let sql = format!("SELECT {SERVICE_TYPE_COLUMNS} FROM service_types ORDER BY name ASC");
        let service_types = sqlx::query_as::<_, ServiceType>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(service_types)
    }

    pub async fn list_active(&self) -> Result<Vec<ServiceType>, AppError> {
        let sql = format!(
            "SELECT {SERVICE_TYPE_COLUMNS} FROM service_types WHERE is_active = TRUE ORDER BY name ASC"
        );
        let service_types = sqlx::query_as::<_, ServiceType>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(service_types)
    }

    pub async fn exists_by_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS( \
                 SELECT 1 FROM service_types \
                 WHERE LOWER(name) = LOWER($1) \
                 AND ($2::uuid IS NULL OR id <> $2) \
             )",
        )
        .bind(name)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM service_types")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn insert(
        &self,
        name: &str,
        description: Option<&str>,
        base_rate: Decimal,
        base_duration_minutes: i32,
    ) -> Result<ServiceType, AppError> {
        let sql = format!(
            "INSERT INTO service_types (name, description, base_rate, base_duration_minutes) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SERVICE_TYPE_COLUMNS}"
        );
        let service_type = sqlx::query_as::<_, ServiceType>(&sql)
            .bind(name)
            .bind(description)
            .bind(base_rate)
            .bind(base_duration_minutes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, name))?;

        Ok(service_type)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        base_rate: Decimal,
        base_duration_minutes: i32,
        is_active: bool,
    ) -> Result<ServiceType, AppError> {
        let sql = format!(
            "UPDATE service_types \
             SET name = $2, description = $3, base_rate = $4, base_duration_minutes = $5, \
                 is_active = $6, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {SERVICE_TYPE_COLUMNS}"
        );
        let service_type = sqlx::query_as::<_, ServiceType>(&sql)
            .bind(id)
            .bind(name)
            .bind(description)
            .bind(base_rate)
            .bind(base_duration_minutes)
            .bind(is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, name))?
            .ok_or(AppError::ServiceTypeNotFound)?;

        Ok(service_type)
    }

    // rows_affected = 0 quando o id não existe; o service ignora de
    // propósito (toggle administrativo best-effort).
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE service_types SET is_active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(is_active)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}

fn map_unique_violation(e: sqlx::Error, name: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some("service_types_name_key") = db_err.constraint() {
                return AppError::ServiceTypeNameTaken(name.to_string());
            }
        }
    }
    e.into()
}
