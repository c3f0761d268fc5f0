// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    common::password::PasswordHasher,
    db::{CustomerRepository, ServiceTypeRepository, UserRepository},
    services::{
        auth::AuthService, catalog_service::CatalogService, customer_service::CustomerService,
        tokens::TokenService, user_service::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub password_hasher: PasswordHasher,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub customer_service: CustomerService,
    pub catalog_service: CatalogService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        // O segredo é configuração do processo: carregado uma vez, nunca logado.
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let access_minutes: i64 = env::var("ACCESS_TOKEN_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(15);
        let refresh_days: i64 = env::var("REFRESH_TOKEN_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(7);

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o grafo de dependências ---
        // Nada de singletons implícitos: cada service recebe o que usa.
        let password_hasher = PasswordHasher::with_default_cost();
        let tokens = TokenService::new(jwt_secret, access_minutes, refresh_days);

        let user_repo = UserRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let service_type_repo = ServiceTypeRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            tokens,
            password_hasher.clone(),
            db_pool.clone(),
        );
        let user_service = UserService::new(user_repo, password_hasher.clone(), db_pool.clone());
        let customer_service = CustomerService::new(customer_repo, db_pool.clone());
        let catalog_service = CatalogService::new(service_type_repo);

        Ok(Self {
            db_pool,
            password_hasher,
            auth_service,
            user_service,
            customer_service,
            catalog_service,
        })
    }
}
