// src/services/catalog_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ServiceTypeRepository,
    models::catalog::{CreateServiceTypePayload, ServiceType, UpdateServiceTypePayload},
};

#[derive(Clone)]
pub struct CatalogService {
    repo: ServiceTypeRepository,
}

impl CatalogService {
    pub fn new(repo: ServiceTypeRepository) -> Self {
        Self { repo }
    }

    pub async fn get_all(&self) -> Result<Vec<ServiceType>, AppError> {
        self.repo.list_all().await
    }

    pub async fn get_active(&self) -> Result<Vec<ServiceType>, AppError> {
        self.repo.list_active().await
    }

    pub async fn get(&self, id: Uuid) -> Result<ServiceType, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ServiceTypeNotFound)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<ServiceType, AppError> {
        self.repo
            .find_by_name(name)
            .await?
            .ok_or(AppError::ServiceTypeNotFound)
    }

    pub async fn create(&self, payload: &CreateServiceTypePayload) -> Result<ServiceType, AppError> {
        let name = payload.name.trim();

        // Unicidade case-insensitive: "tv mounting" colide com "TV Mounting".
        if self.repo.exists_by_name(name, None).await? {
            return Err(AppError::ServiceTypeNameTaken(name.to_string()));
        }

        self.repo
            .insert(
                name,
                payload.description.as_deref().map(str::trim),
                payload.base_rate,
                payload.base_duration_minutes,
            )
            .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: &UpdateServiceTypePayload,
    ) -> Result<ServiceType, AppError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ServiceTypeNotFound)?;

        // Nome só é re-checado quando está de fato mudando (comparação
        // case-insensitive: renomear "TV Mounting" para "tv mounting" não
        // colide consigo mesmo).
        let name = match patch.name.as_deref() {
            Some(new_name) => {
                let new_name = new_name.trim();
                if !new_name.eq_ignore_ascii_case(&existing.name)
                    && self.repo.exists_by_name(new_name, Some(id)).await?
                {
                    return Err(AppError::ServiceTypeNameTaken(new_name.to_string()));
                }
                new_name.to_string()
            }
            None => existing.name.clone(),
        };

        let description = match patch.description.as_deref() {
            Some(v) => Some(v.trim().to_string()),
            None => existing.description.clone(),
        };
        let base_rate = patch.base_rate.unwrap_or(existing.base_rate);
        let base_duration_minutes = patch
            .base_duration_minutes
            .unwrap_or(existing.base_duration_minutes);
        let is_active = patch.is_active.unwrap_or(existing.is_active);

        self.repo
            .update(id, &name, description.as_deref(), base_rate, base_duration_minutes, is_active)
            .await
    }

    // Toggle administrativo best-effort: id inexistente é no-op silencioso,
    // de propósito. Diferente de todo o resto, aqui não tem NotFound.
    pub async fn deactivate(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.set_active(id, false).await?;
        Ok(())
    }

    pub async fn activate(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.set_active(id, true).await?;
        Ok(())
    }

    pub async fn is_name_available(&self, name: &str) -> Result<bool, AppError> {
        Ok(!self.repo.exists_by_name(name.trim(), None).await?)
    }
}
