use uuid::Uuid;

use crate::domain::entities::LedgerEntry;
use crate::domain::errors::LedgerError;
use crate::domain::ledger;
use crate::domain::ports::{CatalogStore, Clock, LedgerStore};

// Assigns a catalog package to a guest by appending a snapshot entry.
pub struct AssignPackageUseCase<C, K, L> {
    pub clock: C,
    pub catalog: K,
    pub ledgers: L,
}

impl<C, K, L> AssignPackageUseCase<C, K, L>
where
    C: Clock,
    K: CatalogStore,
    L: LedgerStore,
{
    pub async fn execute(
        &self,
        guest_id: &str,
        template_id: &str,
    ) -> Result<LedgerEntry, LedgerError> {
        if guest_id.trim().is_empty() {
            return Err(LedgerError::InvalidArgument("guestId is required".to_string()));
        }
        if template_id.trim().is_empty() {
            return Err(LedgerError::InvalidArgument("packageId is required".to_string()));
        }

        let template = self
            .catalog
            .get(template_id)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, template_id, "failed to load package template");
                LedgerError::StorageFailure
            })?
            .ok_or(LedgerError::TemplateNotFound)?;

        let entry_id = Uuid::new_v4().to_string();
        let entry = ledger::new_entry(entry_id, &template, self.clock.now_epoch_seconds());

        self.ledgers
            .append(guest_id, entry.clone())
            .await
            .map_err(|err| {
                tracing::error!(error = %err, guest_id, "failed to append ledger entry");
                LedgerError::StorageFailure
            })?;

        tracing::info!(
            guest_id,
            template_id,
            entry_id = %entry.id,
            "package assigned"
        );

        Ok(entry)
    }
}
