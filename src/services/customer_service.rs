// src/services/customer_service.rs
//
// O agregado cliente + endereços. A invariante central: para um cliente,
// no máximo UM endereço com is_primary = true em qualquer estado
// commitado. Ela é mantida aqui, lendo o conjunto completo de endereços e
// regravando os flags dentro da transação, porque a fronteira de
// consistência é o cliente, não o endereço individual.
// A linha do cliente fica travada (FOR UPDATE)
// enquanto isso acontece, então dois "set primary" concorrentes no mesmo
// cliente se serializam no banco.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, strings},
    db::CustomerRepository,
    models::customers::{
        CreateCustomerPayload, CreateLocationPayload, CustomerResponse, ServiceLocation,
        UpdateCustomerPayload, UpdateLocationPayload,
    },
};

#[derive(Clone)]
pub struct CustomerService {
    repo: CustomerRepository,
    pool: PgPool,
}

impl CustomerService {
    pub fn new(repo: CustomerRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // -------------------------------------------------------------------------
    //  Clientes
    // -------------------------------------------------------------------------

    pub async fn create_customer(
        &self,
        payload: &CreateCustomerPayload,
    ) -> Result<CustomerResponse, AppError> {
        let email = strings::normalize_email(&payload.email);

        if self.repo.exists_by_email(&email, None).await? {
            return Err(AppError::EmailAlreadyExists(email));
        }

        let first_name = strings::capitalize_first(&payload.first_name);
        let last_name = strings::capitalize_first(&payload.last_name);
        let phone_number = payload
            .phone_number
            .as_deref()
            .and_then(strings::normalize_phone);
        let notes = payload.notes.as_deref().map(str::trim);

        let mut tx = self.pool.begin().await?;

        let customer = self
            .repo
            .insert_customer(
                &mut *tx,
                &first_name,
                &last_name,
                &email,
                phone_number.as_deref(),
                notes,
            )
            .await?;

        // Se o payload trouxer mais de um endereço marcado como primário,
        // o primeiro vence: a invariante já nasce valendo.
        let flags: Vec<bool> = payload.service_locations.iter().map(|l| l.is_primary).collect();
        let resolved = resolve_primary_flags(&flags);

        let mut locations = Vec::with_capacity(payload.service_locations.len());
        for (loc, is_primary) in payload.service_locations.iter().zip(resolved) {
            let location = self
                .insert_normalized_location(&mut tx, customer.id, loc, is_primary)
                .await?;
            locations.push(location);
        }

        tx.commit().await?;

        Ok(CustomerResponse::new(customer, locations))
    }

    pub async fn get_all_customers(&self) -> Result<Vec<CustomerResponse>, AppError> {
        let customers = self.repo.list_all().await?;

        let ids: Vec<Uuid> = customers.iter().map(|c| c.id).collect();
        let mut by_customer: HashMap<Uuid, Vec<ServiceLocation>> = HashMap::new();
        for location in self.repo.list_locations_for_customers(&ids).await? {
            by_customer.entry(location.customer_id).or_default().push(location);
        }

        Ok(customers
            .into_iter()
            .map(|c| {
                let locations = by_customer.remove(&c.id).unwrap_or_default();
                CustomerResponse::new(c, locations)
            })
            .collect())
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<CustomerResponse, AppError> {
        let customer = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;
        let locations = self.repo.list_locations(&self.pool, id).await?;
        Ok(CustomerResponse::new(customer, locations))
    }

    pub async fn get_customer_by_email(&self, email: &str) -> Result<CustomerResponse, AppError> {
        let email = strings::normalize_email(email);
        let customer = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AppError::CustomerNotFound)?;
        let locations = self.repo.list_locations(&self.pool, customer.id).await?;
        Ok(CustomerResponse::new(customer, locations))
    }

    pub async fn update_customer(
        &self,
        id: Uuid,
        patch: &UpdateCustomerPayload,
    ) -> Result<CustomerResponse, AppError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        // Só re-checa unicidade se o e-mail estiver de fato mudando.
        let email = match patch.email.as_deref() {
            Some(new_email) => {
                let normalized = strings::normalize_email(new_email);
                if normalized != existing.email
                    && self.repo.exists_by_email(&normalized, Some(id)).await?
                {
                    return Err(AppError::EmailAlreadyExists(normalized));
                }
                normalized
            }
            None => existing.email.clone(),
        };

        // Campo ausente no patch = mantém o valor atual.
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
        let notes = match patch.notes.as_deref() {
            Some(v) => Some(v.trim().to_string()),
            None => existing.notes.clone(),
        };

        let customer = self
            .repo
            .update_customer(
                id,
                &first_name,
                &last_name,
                &email,
                phone_number.as_deref(),
                notes.as_deref(),
            )
            .await?;

        let locations = self.repo.list_locations(&self.pool, id).await?;
        Ok(CustomerResponse::new(customer, locations))
    }

    // Deleta o cliente e, por cascata, todos os endereços dele.
    pub async fn delete_customer(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = self.repo.delete_customer(id).await?;
        if deleted == 0 {
            return Err(AppError::CustomerNotFound);
        }
        Ok(())
    }

    pub async fn is_email_available(&self, email: &str) -> Result<bool, AppError> {
        let email = strings::normalize_email(email);
        Ok(!self.repo.exists_by_email(&email, None).await?)
    }

    // -------------------------------------------------------------------------
    //  Endereços de atendimento
    // -------------------------------------------------------------------------

    pub async fn get_locations(&self, customer_id: Uuid) -> Result<Vec<ServiceLocation>, AppError> {
        self.repo
            .find_by_id(customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;
        self.repo.list_locations(&self.pool, customer_id).await
    }

    pub async fn add_location(
        &self,
        customer_id: Uuid,
        payload: &CreateLocationPayload,
    ) -> Result<ServiceLocation, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava a linha do cliente: serializa mudanças de primário.
        self.repo
            .lock_customer(&mut *tx, customer_id)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        // Endereço novo chegando como primário: limpa o flag de TODOS os
        // existentes antes do insert, para o commit sair com um só.
        if payload.is_primary {
            let locations = self.repo.list_locations(&mut *tx, customer_id).await?;
            for id in ids_to_demote(&locations, None) {
                self.repo.set_location_primary(&mut *tx, id, false).await?;
            }
        }

        let location = self
            .insert_normalized_location(&mut tx, customer_id, payload, payload.is_primary)
            .await?;

        tx.commit().await?;

        Ok(location)
    }

    pub async fn update_location(
        &self,
        location_id: Uuid,
        patch: &UpdateLocationPayload,
    ) -> Result<ServiceLocation, AppError> {
        let mut tx = self.pool.begin().await?;

        // Primeira leitura só descobre o dono; depois do lock relemos,
        // porque outra transação pode ter mexido no flag nesse meio tempo.
        let owner = self
            .repo
            .find_location(&mut *tx, location_id)
            .await?
            .ok_or(AppError::LocationNotFound)?
            .customer_id;

        self.repo
            .lock_customer(&mut *tx, owner)
            .await?
            .ok_or(AppError::CustomerNotFound)?;

        let location = self
            .repo
            .find_location(&mut *tx, location_id)
            .await?
            .ok_or(AppError::LocationNotFound)?;

        // Ausente no patch = flag fica como está.
        let is_primary = patch.is_primary.unwrap_or(location.is_primary);

        // Virando primário: demove os irmãos antes de gravar.
        if is_primary && !location.is_primary {
            let locations = self.repo.list_locations(&mut *tx, location.customer_id).await?;
            for id in ids_to_demote(&locations, Some(location.id)) {
                self.repo.set_location_primary(&mut *tx, id, false).await?;
            }
        }

        let address_line1 = match patch.address_line1.as_deref() {
            Some(v) => strings::normalize_address(v),
            None => location.address_line1.clone(),
        };
        let address_line2 = match patch.address_line2.as_deref() {
            Some(v) => Some(strings::normalize_address(v)),
            None => location.address_line2.clone(),
        };
        let city = match patch.city.as_deref() {
            Some(v) => strings::normalize_city(v),
            None => location.city.clone(),
        };
        let state = match patch.state.as_deref() {
            Some(v) => strings::normalize_state(v),
            None => location.state.clone(),
        };
        let zip_code = match patch.zip_code.as_deref() {
            Some(v) => strings::normalize_zip_code(v),
            None => location.zip_code.clone(),
        };
        let access_notes = match patch.access_notes.as_deref() {
            Some(v) => Some(v.trim().to_string()),
            None => location.access_notes.clone(),
        };

        let updated = self
            .repo
            .update_location(
                &mut *tx,
                location.id,
                &address_line1,
                address_line2.as_deref(),
                &city,
                &state,
                &zip_code,
                access_notes.as_deref(),
                is_primary,
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    // Deletar o primário NÃO elege outro automaticamente: a invariante é
    // "no máximo um", não "exatamente um".
    pub async fn delete_location(&self, location_id: Uuid) -> Result<(), AppError> {
        let deleted = self.repo.delete_location(&self.pool, location_id).await?;
        if deleted == 0 {
            return Err(AppError::LocationNotFound);
        }
        Ok(())
    }

    async fn insert_normalized_location(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        customer_id: Uuid,
        payload: &CreateLocationPayload,
        is_primary: bool,
    ) -> Result<ServiceLocation, AppError> {
        let address_line1 = strings::normalize_address(&payload.address_line1);
        let address_line2 = payload
            .address_line2
            .as_deref()
            .map(strings::normalize_address);
        let city = strings::normalize_city(&payload.city);
        let state = strings::normalize_state(&payload.state);
        let zip_code = strings::normalize_zip_code(&payload.zip_code);
        let access_notes = payload.access_notes.as_deref().map(str::trim);

        self.repo
            .insert_location(
                &mut **tx,
                customer_id,
                &address_line1,
                address_line2.as_deref(),
                &city,
                &state,
                &zip_code,
                access_notes,
                is_primary,
            )
            .await
    }
}

// Quais endereços precisam perder o flag para sobrar no máximo um
// primário (`keep` = o que vai virar/continuar primário, se houver).
fn ids_to_demote(locations: &[ServiceLocation], keep: Option<Uuid>) -> Vec<Uuid> {
    locations
        .iter()
        .filter(|l| l.is_primary && Some(l.id) != keep)
        .map(|l| l.id)
        .collect()
}

// Num lote de criação, o primeiro marcado como primário vence; os demais
// entram demovidos.
fn resolve_primary_flags(flags: &[bool]) -> Vec<bool> {
    let mut primary_seen = false;
    flags
        .iter()
        .map(|&wants_primary| {
            let grant = wants_primary && !primary_seen;
            if grant {
                primary_seen = true;
            }
            grant
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn location(is_primary: bool) -> ServiceLocation {
        ServiceLocation {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            address_line1: "123 Main Street".into(),
            address_line2: None,
            city: "Orlando".into(),
            state: "FL".into(),
            zip_code: "32063".into(),
            access_notes: None,
            is_primary,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn demotes_current_primary_when_new_one_arrives() {
        let a = location(true);
        let b = location(false);

        let demote = ids_to_demote(&[a.clone(), b], None);
        assert_eq!(demote, vec![a.id]);
    }

    #[test]
    fn nothing_to_demote_when_no_primary_exists() {
        // Cliente com [A(false), B(false)] + novo C primário: ninguém é
        // demovido e o conjunto final tem exatamente um primário.
        let a = location(false);
        let b = location(false);

        assert!(ids_to_demote(&[a, b], None).is_empty());
    }

    #[test]
    fn keep_excludes_the_location_being_promoted() {
        let a = location(true);
        let demote = ids_to_demote(std::slice::from_ref(&a), Some(a.id));
        assert!(demote.is_empty());
    }

    #[test]
    fn first_primary_wins_in_creation_batch() {
        assert_eq!(
            resolve_primary_flags(&[false, true, true]),
            vec![false, true, false]
        );
    }

    #[test]
    fn batch_without_primary_stays_without_primary() {
        assert_eq!(resolve_primary_flags(&[false, false]), vec![false, false]);
        assert!(resolve_primary_flags(&[]).is_empty());
    }

    #[test]
    fn at_most_one_primary_survives_any_batch() {
        let cases: &[&[bool]] = &[
            &[true, true, true],
            &[false, true, false, true],
            &[true],
            &[],
        ];
        for flags in cases {
            let granted = resolve_primary_flags(flags).iter().filter(|g| **g).count();
            assert!(granted <= 1);
        }
    }
}
