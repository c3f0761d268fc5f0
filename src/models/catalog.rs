// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Tipo de serviço faturável do catálogo. Nunca é removido fisicamente:
// sai de circulação com is_active = false.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceType {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = f64)]
    pub base_rate: Decimal,
    pub base_duration_minutes: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_base_rate(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut err = ValidationError::new("min");
        err.message = Some("A tarifa base não pode ser negativa.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceTypePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "TV Mounting")]
    pub name: String,

    #[schema(example = "Wall mount installation for flat-screen TVs")]
    pub description: Option<String>,

    #[validate(custom(function = validate_base_rate))]
    #[schema(value_type = f64, example = 150.0)]
    pub base_rate: Decimal,

    #[validate(range(min = 1, message = "A duração mínima é 1 minuto."))]
    #[schema(example = 60)]
    pub base_duration_minutes: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceTypePayload {
    pub name: Option<String>,
    pub description: Option<String>,

    #[validate(custom(function = validate_base_rate))]
    #[schema(value_type = Option<f64>)]
    pub base_rate: Option<Decimal>,

    #[validate(range(min = 1, message = "A duração mínima é 1 minuto."))]
    pub base_duration_minutes: Option<i32>,

    pub is_active: Option<bool>,
}
