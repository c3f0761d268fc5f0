// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Customers ---
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::get_customer_by_email,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::customers::list_locations,
        handlers::customers::add_location,
        handlers::customers::update_location,
        handlers::customers::delete_location,

        // --- Service Types ---
        handlers::service_types::list_service_types,
        handlers::service_types::get_service_type,
        handlers::service_types::get_service_type_by_name,
        handlers::service_types::create_service_type,
        handlers::service_types::update_service_type,
        handlers::service_types::deactivate_service_type,
        handlers::service_types::activate_service_type,
    ),
    components(
        schemas(
            // --- Customers ---
            models::customers::Customer,
            models::customers::ServiceLocation,
            models::customers::CustomerResponse,
            models::customers::CreateCustomerPayload,
            models::customers::UpdateCustomerPayload,
            models::customers::CreateLocationPayload,
            models::customers::UpdateLocationPayload,

            // --- Service Types ---
            models::catalog::ServiceType,
            models::catalog::CreateServiceTypePayload,
            models::catalog::UpdateServiceTypePayload,
        )
    ),
    tags(
        (name = "Customers", description = "Clientes e Endereços de Atendimento"),
        (name = "ServiceTypes", description = "Catálogo de Tipos de Serviço")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
