// src/services/user_service.rs
//
// Diretório de usuários da equipe. Registro/login moram no AuthService;
// aqui ficam as operações administrativas sobre contas existentes.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, password::PasswordHasher, strings},
    db::UserRepository,
    models::auth::{RegisterUserPayload, UpdateEmailPayload, UpdateUserPayload, User},
};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    hasher: PasswordHasher,
    pool: PgPool,
}

impl UserService {
    pub fn new(repo: UserRepository, hasher: PasswordHasher, pool: PgPool) -> Self {
        Self { repo, hasher, pool }
    }

    pub async fn get_all(&self) -> Result<Vec<User>, AppError> {
        self.repo.list_all().await
    }

    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::UserNotFound)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, AppError> {
        let email = strings::normalize_email(email);
        self.repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    // Conta de equipe criada por um admin, sem emitir tokens (diferente
    // do register, que loga o usuário recém-criado).
    pub async fn create(&self, payload: &RegisterUserPayload) -> Result<User, AppError> {
        let email = strings::normalize_email(&payload.email);

        if self.repo.exists_by_email(&email).await? {
            return Err(AppError::EmailAlreadyExists(email));
        }

        let password_hash = self.hasher.hash(&payload.password).await?;

        let first_name = strings::capitalize_first(&payload.first_name);
        let last_name = strings::capitalize_first(&payload.last_name);
        let phone_number = payload
            .phone_number
            .as_deref()
            .and_then(strings::normalize_phone);

        self.repo
            .create_user(
                &self.pool,
                &email,
                &password_hash,
                &first_name,
                &last_name,
                phone_number.as_deref(),
                payload.role,
            )
            .await
    }

    // Update parcial de perfil/papel/atividade. E-mail e senha ficam de
    // fora: cada um tem fluxo próprio com verificação.
    pub async fn update(&self, id: Uuid, patch: &UpdateUserPayload) -> Result<User, AppError> {
        let existing = self.repo.find_by_id(id).await?.ok_or(AppError::UserNotFound)?;

        let first_name = match patch.first_name.as_deref() {
            Some(v) => strings::capitalize_first(v),
            None => existing.first_name.clone(),
        };
        let last_name = match patch.last_name.as_deref() {
            Some(v) => strings::capitalize_first(v),
            None => existing.last_name.clone(),
        };
        let phone_number = match patch.phone_number.as_deref() {
            Some(v) => strings::normalize_phone(v),
            None => existing.phone_number.clone(),
        };
        let role = patch.role.unwrap_or(existing.role);
        let is_active = patch.is_active.unwrap_or(existing.is_active);

        self.repo
            .update_user(id, &first_name, &last_name, phone_number.as_deref(), role, is_active)
            .await
    }

    // Soft delete: a conta deixa de autenticar mas o registro fica.
    pub async fn deactivate(&self, id: Uuid) -> Result<(), AppError> {
        let updated = self.repo.set_active(id, false).await?;
        if updated == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }

    // Trocar o e-mail exige provar a senha atual.
    pub async fn update_email(
        &self,
        id: Uuid,
        payload: &UpdateEmailPayload,
    ) -> Result<User, AppError> {
        let user = self.repo.find_by_id(id).await?.ok_or(AppError::UserNotFound)?;

        let is_password_valid = self
            .hasher
            .verify(&payload.current_password, &user.password_hash)
            .await?;
        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let new_email = strings::normalize_email(&payload.new_email);

        if new_email == user.email {
            return Err(AppError::EmailUnchanged);
        }

        if self.repo.exists_by_email(&new_email).await? {
            return Err(AppError::EmailAlreadyExists(new_email));
        }

        self.repo.update_email(id, &new_email).await
    }

    pub async fn is_email_available(&self, email: &str) -> Result<bool, AppError> {
        let email = strings::normalize_email(email);
        Ok(!self.repo.exists_by_email(&email).await?)
    }
}
