// src/db/customer_repo.rs
//
// Repositório do agregado cliente + endereços de atendimento. Ninguém mais
// escreve em service_locations: toda mudança passa por aqui, dentro da
// transação que o CustomerService abre.

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::customers::{Customer, ServiceLocation},
};

const CUSTOMER_COLUMNS: &str =
    "id, first_name, last_name, email, phone_number, notes, created_at, updated_at";

const LOCATION_COLUMNS: &str =
    "id, customer_id, address_line1, address_line2, city, state, zip_code, access_notes, \
     is_primary, created_at, updated_at";

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // -------------------------------------------------------------------------
    //  Clientes
    // -------------------------------------------------------------------------

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1");
        let maybe_customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_customer)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE LOWER(email) = LOWER($1)");
        let maybe_customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_customer)
    }

    pub async fn list_all(&self) -> Result<Vec<Customer>, AppError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY created_at ASC");
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(customers)
    }

    // `exclude` serve para o update: o e-mail pode "colidir" com o próprio
    // cliente sendo editado.
    pub async fn exists_by_email(
        &self,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS( \
                 SELECT 1 FROM customers \
                 WHERE LOWER(email) = LOWER($1) \
                 AND ($2::uuid IS NULL OR id <> $2) \
             )",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn insert_customer<'e, E>(
        &self,
        executor: E,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone_number: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO customers (first_name, last_name, email, phone_number, notes) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {CUSTOMER_COLUMNS}"
        );
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(first_name)
            .bind(last_name)
            .bind(email)
            .bind(phone_number)
            .bind(notes)
            .fetch_one(executor)
            .await
            .map_err(|e| map_unique_violation(e, email))?;

        Ok(customer)
    }

    pub async fn update_customer(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone_number: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Customer, AppError> {
        let sql = format!(
            "UPDATE customers \
             SET first_name = $2, last_name = $3, email = $4, phone_number = $5, \
                 notes = $6, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {CUSTOMER_COLUMNS}"
        );
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .bind(first_name)
            .bind(last_name)
            .bind(email)
            .bind(phone_number)
            .bind(notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, email))?
            .ok_or(AppError::CustomerNotFound)?;

        Ok(customer)
    }

    // O ON DELETE CASCADE da migration leva os endereços junto: sem órfãos.
    pub async fn delete_customer(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // Trava a linha do cliente pela duração da transação. É o que
    // serializa duas chamadas concorrentes de "set primary" no mesmo
    // cliente. Retorna None se o cliente não existe.
    pub async fn lock_customer<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM customers WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(locked)
    }

    // -------------------------------------------------------------------------
    //  Endereços de atendimento
    // -------------------------------------------------------------------------

    pub async fn list_locations<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
    ) -> Result<Vec<ServiceLocation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {LOCATION_COLUMNS} FROM service_locations \
             WHERE customer_id = $1 ORDER BY created_at ASC"
        );
        let locations = sqlx::query_as::<_, ServiceLocation>(&sql)
            .bind(customer_id)
            .fetch_all(executor)
            .await?;
        Ok(locations)
    }

    // Uma query só para montar a listagem de clientes com endereços,
    // em vez de N+1.
    pub async fn list_locations_for_customers(
        &self,
        customer_ids: &[Uuid],
    ) -> Result<Vec<ServiceLocation>, AppError> {
        let sql = format!(
            "SELECT {LOCATION_COLUMNS} FROM service_locations \
             WHERE customer_id = ANY($1) ORDER BY created_at ASC"
        );
        let locations = sqlx::query_as::<_, ServiceLocation>(&sql)
            .bind(customer_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(locations)
    }

    pub async fn find_location<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<ServiceLocation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {LOCATION_COLUMNS} FROM service_locations WHERE id = $1");
        let maybe_location = sqlx::query_as::<_, ServiceLocation>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(maybe_location)
    }

    pub async fn insert_location<'e, E>(
        &self,
        executor: E,
        customer_id: Uuid,
        address_line1: &str,
        address_line2: Option<&str>,
        city: &str,
        state: &str,
        zip_code: &str,
        access_notes: Option<&str>,
        is_primary: bool,
    ) -> Result<ServiceLocation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO service_locations \
                 (customer_id, address_line1, address_line2, city, state, zip_code, \
                  access_notes, is_primary) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {LOCATION_COLUMNS}"
        );
        let location = sqlx::query_as::<_, ServiceLocation>(&sql)
            .bind(customer_id)
            .bind(address_line1)
            .bind(address_line2)
            .bind(city)
            .bind(state)
            .bind(zip_code)
            .bind(access_notes)
            .bind(is_primary)
            .fetch_one(executor)
            .await?;
        Ok(location)
    }

    pub async fn update_location<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        address_line1: &str,
        address_line2: Option<&str>,
        city: &str,
        state: &str,
        zip_code: &str,
        access_notes: Option<&str>,
        is_primary: bool,
    ) -> Result<ServiceLocation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE service_locations \
             SET address_line1 = $2, address_line2 = $3, city = $4, state = $5, \
                 zip_code = $6, access_notes = $7, is_primary = $8, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {LOCATION_COLUMNS}"
        );
        let location = sqlx::query_as::<_, ServiceLocation>(&sql)
            .bind(id)
            .bind(address_line1)
            .bind(address_line2)
            .bind(city)
            .bind(state)
            .bind(zip_code)
            .bind(access_notes)
            .bind(is_primary)
            .fetch_one(executor)
            .await?;
        Ok(location)
    }

    pub async fn set_location_primary<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        is_primary: bool,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE service_locations SET is_primary = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(is_primary)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_location<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM service_locations WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

fn map_unique_violation(e: sqlx::Error, email: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some("customers_email_key") = db_err.constraint() {
                return AppError::EmailAlreadyExists(email.to_string());
            }
        }
    }
    e.into()
}
