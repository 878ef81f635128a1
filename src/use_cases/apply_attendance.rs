use crate::domain::entities::LedgerEntry;
use crate::domain::errors::LedgerError;
use crate::domain::ledger;
use crate::domain::ports::LedgerStore;

// Adjusts remaining sessions when attendance is marked or un-marked.
pub struct ApplyAttendanceUseCase<L> {
    pub ledgers: L,
}

impl<L> ApplyAttendanceUseCase<L>
where
    L: LedgerStore,
{
    pub async fn execute(
        &self,
        guest_id: &str,
        entry_id: &str,
        attended: bool,
    ) -> Result<LedgerEntry, LedgerError> {
        if entry_id.trim().is_empty() {
            return Err(LedgerError::InvalidArgument("packageId is required".to_string()));
        }

        let mut guest_ledger = self
            .ledgers
            .get(guest_id)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, guest_id, "failed to load guest ledger");
                LedgerError::StorageFailure
            })?
            .ok_or(LedgerError::LedgerNotFound)?;

        let entry = guest_ledger
            .entries
            .iter_mut()
            .find(|entry| entry.id == entry_id)
            .ok_or(LedgerError::EntryNotFound)?;
        entry.remaining_sessions = ledger::adjust_remaining(entry, attended);
        let updated = entry.clone();

        let written = self
            .ledgers
            .replace(guest_id, guest_ledger.version, guest_ledger.entries)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, guest_id, "failed to write guest ledger");
                LedgerError::StorageFailure
            })?;
        if !written {
            tracing::warn!(guest_id, entry_id, "ledger changed during attendance update");
            return Err(LedgerError::Conflict);
        }

        tracing::info!(
            guest_id,
            entry_id,
            attended,
            remaining = ?updated.remaining_sessions,
            "attendance applied"
        );

        Ok(updated)
    }
}
