use uuid::Uuid;

use crate::domain::entities::{PackageTemplate, UNLIMITED_PACKAGE_ID};
use crate::domain::errors::CatalogError;
use crate::domain::ports::CatalogStore;
use crate::interface_adapters::protocol::{CreatePackageRequest, UpdatePackageRequest};

// Catalog administration: list, read, create, edit and delete templates.
pub struct ManageCatalogUseCase<K> {
    pub catalog: K,
}

impl<K> ManageCatalogUseCase<K>
where
    K: CatalogStore,
{
    pub async fn list(&self) -> Result<Vec<PackageTemplate>, CatalogError> {
        self.catalog.list().await.map_err(storage_failure("list"))
    }

    pub async fn get(&self, template_id: &str) -> Result<PackageTemplate, CatalogError> {
        self.catalog
            .get(template_id)
            .await
            .map_err(storage_failure("get"))?
            .ok_or(CatalogError::NotFound)
    }

    pub async fn create(
        &self,
        payload: CreatePackageRequest,
    ) -> Result<PackageTemplate, CatalogError> {
        let name = payload
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| CatalogError::InvalidArgument("name is required".to_string()))?;
        let session_count = count(payload.session_count, "sessionCount")?
            .ok_or_else(|| CatalogError::InvalidArgument("sessionCount is required".to_string()))?;
        let duration_days = count(payload.duration_days, "durationDays")?;

        let template = PackageTemplate {
            id: Uuid::new_v4().to_string(),
            name,
            session_count: Some(session_count),
            duration_days,
            description: payload.description,
        };

        self.catalog
            .insert(template.clone())
            .await
            .map_err(storage_failure("insert"))?;
        tracing::info!(template_id = %template.id, "package template created");

        Ok(template)
    }

    pub async fn update(
        &self,
        template_id: &str,
        payload: UpdatePackageRequest,
    ) -> Result<PackageTemplate, CatalogError> {
        reject_sentinel(template_id)?;
        let session_count = count(payload.session_count, "sessionCount")?;
        let duration_days = count(payload.duration_days, "durationDays")?;
        let stored = self.get(template_id).await?;

        // Empty strings keep the stored text, matching how clients clear forms.
        let updated = PackageTemplate {
            id: stored.id,
            name: payload
                .name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(stored.name),
            session_count: session_count.or(stored.session_count),
            duration_days: duration_days.or(stored.duration_days),
            description: payload
                .description
                .filter(|description| !description.is_empty())
                .or(stored.description),
        };

        let found = self
            .catalog
            .update(updated.clone())
            .await
            .map_err(storage_failure("update"))?;
        if !found {
            return Err(CatalogError::NotFound);
        }
        tracing::info!(template_id, "package template updated");

        Ok(updated)
    }

    pub async fn delete(&self, template_id: &str) -> Result<(), CatalogError> {
        reject_sentinel(template_id)?;
        let removed = self
            .catalog
            .remove(template_id)
            .await
            .map_err(storage_failure("remove"))?;
        if !removed {
            return Err(CatalogError::NotFound);
        }
        tracing::info!(template_id, "package template deleted");

        Ok(())
    }
}

// Counts must be whole, non-negative and fit the stored width.
fn count(value: Option<i64>, field: &str) -> Result<Option<u32>, CatalogError> {
    value
        .map(|value| {
            u32::try_from(value).map_err(|_| {
                CatalogError::InvalidArgument(format!("{field} must be a non-negative integer"))
            })
        })
        .transpose()
}

// Assignments of unlimited passes depend on the seeded template staying put.
fn reject_sentinel(template_id: &str) -> Result<(), CatalogError> {
    if template_id == UNLIMITED_PACKAGE_ID {
        return Err(CatalogError::InvalidArgument(
            "the unlimited package cannot be modified".to_string(),
        ));
    }
    Ok(())
}

fn storage_failure(operation: &'static str) -> impl Fn(String) -> CatalogError {
    move |err| {
        tracing::error!(error = %err, operation, "catalog store failed");
        CatalogError::StorageFailure
    }
}
