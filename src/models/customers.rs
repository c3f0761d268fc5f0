// src/models/customers.rs
//
// O cliente e seus endereços de atendimento formam UM agregado: o
// CustomerService é o único escritor de service_locations, e a invariante
// "no máximo um endereço primário por cliente" vale em qualquer estado
// commitado.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLocation {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub access_notes: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Resposta completa: o cliente com o conjunto de endereços que ele possui
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
    pub service_locations: Vec<ServiceLocation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomerResponse {
    pub fn new(customer: Customer, locations: Vec<ServiceLocation>) -> Self {
        Self {
            id: customer.id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            phone_number: customer.phone_number,
            notes: customer.notes,
            service_locations: locations,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationPayload {
    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    #[schema(example = "123 Main Street")]
    pub address_line1: String,

    pub address_line2: Option<String>,

    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    #[schema(example = "Orlando")]
    pub city: String,

    #[validate(length(min = 2, max = 2, message = "A UF deve ter 2 letras."))]
    #[schema(example = "FL")]
    pub state: String,

    #[validate(length(min = 1, message = "O CEP é obrigatório."))]
    #[schema(example = "32063-1234")]
    pub zip_code: String,

    pub access_notes: Option<String>,

    #[serde(default)]
    #[schema(example = true)]
    pub is_primary: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationPayload {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    #[validate(length(min = 2, max = 2, message = "A UF deve ter 2 letras."))]
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub access_notes: Option<String>,
    // Ausente = não mexe no flag. O update nunca "desmarca sem querer".
    pub is_primary: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Jane")]
    pub first_name: String,

    #[validate(length(min = 1, message = "O sobrenome é obrigatório."))]
    #[schema(example = "Doe")]
    pub last_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "jane@example.com")]
    pub email: String,

    #[schema(example = "(555) 123-4567")]
    pub phone_number: Option<String>,

    pub notes: Option<String>,

    // O cliente pode já nascer com endereços anexados
    #[serde(default)]
    #[validate(nested)]
    pub service_locations: Vec<CreateLocationPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
}
