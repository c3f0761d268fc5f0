//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::env;
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::db::{ServiceTypeRepository, UserRepository};
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Seed de demonstração (catálogo + usuários padrão), opt-in via env
    if env::var("SEED_DEMO_DATA").map(|v| v == "true").unwrap_or(false) {
        let user_repo = UserRepository::new(app_state.db_pool.clone());
        let service_type_repo = ServiceTypeRepository::new(app_state.db_pool.clone());
        db::seed::run(
            &app_state.db_pool,
            &user_repo,
            &service_type_repo,
            &app_state.password_hasher,
        )
        .await
        .expect("Falha ao rodar o seed do banco de dados.");
    }

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route(
            "/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/me", get(handlers::auth::get_me))
        .route("/by-email", get(handlers::users::get_user_by_email))
        .route("/check-email", get(handlers::users::check_email))
        .route(
            "/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::deactivate_user),
        )
        .route("/{id}/email", put(handlers::users::update_email))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Clientes + endereços de atendimento (um agregado só)
    let customer_routes = Router::new()
        .route(
            "/",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route("/by-email", get(handlers::customers::get_customer_by_email))
        .route("/check-email", get(handlers::customers::check_email))
        .route(
            "/{id}",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        )
        .route(
            "/{id}/locations",
            get(handlers::customers::list_locations).post(handlers::customers::add_location),
        )
        .route(
            "/locations/{location_id}",
            put(handlers::customers::update_location)
                .delete(handlers::customers::delete_location),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Catálogo de tipos de serviço
    let service_type_routes = Router::new()
        .route(
            "/",
            get(handlers::service_types::list_service_types)
                .post(handlers::service_types::create_service_type),
        )
        .route(
            "/by-name",
            get(handlers::service_types::get_service_type_by_name),
        )
        .route("/check-name", get(handlers::service_types::check_name))
        .route(
            "/{id}",
            get(handlers::service_types::get_service_type)
                .put(handlers::service_types::update_service_type)
                .delete(handlers::service_types::deactivate_service_type),
        )
        .route(
            "/{id}/activate",
            post(handlers::service_types::activate_service_type),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/service-types", service_type_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
