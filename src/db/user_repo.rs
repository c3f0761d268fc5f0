// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, phone_number, role, is_active, \
     created_at, updated_at";

// O repositório de usuários, responsável por todas as interações com a
// tabela 'users'. Fonte da verdade para sujeitos de autenticação.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca case-insensitive: o service normaliza antes, o LOWER aqui é o
    // cinto de segurança.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // Cria um novo usuário. A checagem de e-mail no service é só o fast
    // path: quem fecha a corrida check-then-insert é o índice único, e o
    // erro dele vira o mesmo Conflict aqui.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
        phone_number: Option<&str>,
        role: Role,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, phone_number, role) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(password_hash)
            .bind(first_name)
            .bind(last_name)
            .bind(phone_number)
            .bind(role)
            .fetch_one(executor)
            .await
            .map_err(|e| map_unique_violation(e, email))?;

        Ok(user)
    }

    // Update parcial já resolvido pelo service: aqui chega a linha inteira.
    // E-mail e senha têm fluxos próprios e ficam fora deste UPDATE.
    pub async fn update_user(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        phone_number: Option<&str>,
        role: Role,
        is_active: bool,
    ) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users \
             SET first_name = $2, last_name = $3, phone_number = $4, role = $5, \
                 is_active = $6, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(first_name)
            .bind(last_name)
            .bind(phone_number)
            .bind(role)
            .bind(is_active)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok(user)
    }

    // Soft delete: usuário nunca some do banco, só deixa de autenticar.
    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(is_active)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    pub async fn update_email(&self, id: Uuid, email: &str) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users SET email = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, email))?
            .ok_or(AppError::UserNotFound)?;

        Ok(user)
    }
}

fn map_unique_violation(e: sqlx::Error, email: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some("users_email_key") = db_err.constraint() {
                return AppError::EmailAlreadyExists(email.to_string());
            }
        }
    }
    e.into()
}
