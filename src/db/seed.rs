// src/db/seed.rs
//
// Popula o banco com dados de demonstração na subida (catálogo + usuários
// padrão). Só roda com SEED_DEMO_DATA=true, e pula qualquer tabela que já
// tenha registros.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{error::AppError, password::PasswordHasher},
    db::{ServiceTypeRepository, UserRepository},
    models::auth::Role,
};

pub async fn run(
    pool: &PgPool,
    user_repo: &UserRepository,
    service_type_repo: &ServiceTypeRepository,
    hasher: &PasswordHasher,
) -> Result<(), AppError> {
    seed_service_types(service_type_repo).await?;
    seed_default_users(pool, user_repo, hasher).await?;
    tracing::info!("✅ Seed do banco de dados concluído!");
    Ok(())
}

// (nome, descrição, tarifa base em centavos, duração em minutos)
const SERVICE_TYPES: &[(&str, &str, i64, i32)] = &[
    ("TV Mounting", "Wall mount installation for flat-screen TVs", 150_00, 60),
    ("TV Mounting With Concealment", "TV mounting with in-wall cable concealment", 250_00, 90),
    ("Surround Sound Installation", "Full surround sound speaker system setup", 300_00, 120),
    ("Soundbar Installation", "Soundbar mounting and configuration", 100_00, 45),
    ("Network Setup", "Home network configuration and optimization", 200_00, 90),
    ("WiFi Optimization", "WiFi coverage analysis and improvement", 150_00, 60),
    ("Smart Home Consultation", "Smart home planning and recommendations", 100_00, 45),
    ("Smart Home Installation", "Smart device installation and setup", 175_00, 60),
    ("Smart Thermostat Install", "Smart thermostat installation and programming", 125_00, 45),
    ("Smart Lighting Setup", "Smart lighting installation and automation", 150_00, 60),
    ("Security Camera Installation", "Security camera mounting and configuration", 200_00, 90),
    ("Video Doorbell Installation", "Video doorbell installation and setup", 100_00, 45),
    ("Home Theater Setup", "Complete home theater system configuration", 400_00, 180),
    ("Projector Installation", "Projector mounting and screen setup", 250_00, 120),
    ("Cable Management", "Cable organization and concealment", 100_00, 60),
    ("Device Configuration", "Setup and configuration of smart devices", 75_00, 30),
    ("Troubleshooting", "Diagnosis and repair of AV/smart home issues", 100_00, 60),
    ("Follow-Up Visit", "Return visit for adjustments or additional work", 75_00, 30),
];

async fn seed_service_types(repo: &ServiceTypeRepository) -> Result<(), AppError> {
    if repo.count().await? > 0 {
        tracing::info!("Tipos de serviço já existem, pulando seed...");
        return Ok(());
    }

    for &(name, description, rate_cents, duration) in SERVICE_TYPES {
        repo.insert(name, Some(description), Decimal::new(rate_cents, 2), duration)
            .await?;
    }

    tracing::info!("🌱 Seed de {} tipos de serviço", SERVICE_TYPES.len());
    Ok(())
}

async fn seed_default_users(
    pool: &PgPool,
    repo: &UserRepository,
    hasher: &PasswordHasher,
) -> Result<(), AppError> {
    if repo.count().await? > 0 {
        tracing::info!("Usuários já existem, pulando seed...");
        return Ok(());
    }

    let users: &[(&str, &str, &str, &str, Role)] = &[
        ("Admin", "User", "admin@techyeah.com", "admin123", Role::Admin),
        ("Tech", "One", "tech1@techyeah.com", "tech123", Role::Technician),
        ("Tech", "Two", "tech2@techyeah.com", "tech123", Role::Technician),
    ];

    for &(first_name, last_name, email, password, role) in users {
        let password_hash = hasher.hash(password).await?;
        repo.create_user(pool, email, &password_hash, first_name, last_name, None, role)
            .await?;
    }

    tracing::info!("🌱 Seed de {} usuários", users.len());
    tracing::info!("📧 Login admin padrão: admin@techyeah.com / admin123");
    Ok(())
}
