use crate::domain::entities::LedgerEntry;
use crate::domain::errors::LedgerError;
use crate::domain::ledger;
use crate::domain::ports::LedgerStore;

// Picks the ledger entry a new appointment is attributed to.
pub struct SelectPackageUseCase<L> {
    pub ledgers: L,
}

impl<L> SelectPackageUseCase<L>
where
    L: LedgerStore,
{
    // Ok(None) covers both walk-in guests without a ledger and guests whose
    // ledger has no eligible entry.
    pub async fn execute(&self, guest_id: &str) -> Result<Option<LedgerEntry>, LedgerError> {
        let Some(ledger) = self.ledgers.get(guest_id).await.map_err(|err| {
            tracing::error!(error = %err, guest_id, "failed to load guest ledger");
            LedgerError::StorageFailure
        })?
        else {
            return Ok(None);
        };

        let selected = ledger::select_for_appointment(&ledger.entries).cloned();
        match &selected {
            Some(entry) => tracing::debug!(guest_id, entry_id = %entry.id, "package selected"),
            None => tracing::warn!(
                guest_id,
                "guest has no usable package; appointment will not be attributed"
            ),
        }

        Ok(selected)
    }
}
