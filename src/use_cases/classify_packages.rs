use crate::domain::entities::Classification;
use crate::domain::errors::LedgerError;
use crate::domain::ledger;
use crate::domain::ports::{Clock, LedgerStore};

// Read-only split of a guest's packages into active and expired.
pub struct ClassifyPackagesUseCase<C, L> {
    pub clock: C,
    pub ledgers: L,
}

impl<C, L> ClassifyPackagesUseCase<C, L>
where
    C: Clock,
    L: LedgerStore,
{
    pub async fn execute(&self, guest_id: &str) -> Result<Classification, LedgerError> {
        let ledger = self
            .ledgers
            .get(guest_id)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, guest_id, "failed to load guest ledger");
                LedgerError::StorageFailure
            })?
            .ok_or(LedgerError::LedgerNotFound)?;

        let classification = ledger::classify(&ledger.entries, self.clock.now_epoch_seconds());
        tracing::debug!(
            guest_id,
            active = classification.active.len(),
            expired = classification.expired.len(),
            "guest packages classified"
        );

        Ok(classification)
    }
}
