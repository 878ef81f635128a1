use uuid::Uuid;

use crate::domain::entities::Appointment;
use crate::domain::errors::{AppointmentError, LedgerError};
use crate::domain::ports::{AppointmentStore, GuestStore, LedgerStore};
use crate::interface_adapters::protocol::{CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::use_cases::select_package::SelectPackageUseCase;

// Appointment booking and editing on behalf of the calling trainer.
pub struct AppointmentsUseCase<A, L, G> {
    pub appointments: A,
    pub ledgers: L,
    pub guests: G,
}

impl<A, L, G> AppointmentsUseCase<A, L, G>
where
    A: AppointmentStore,
    L: LedgerStore + Clone,
    G: GuestStore,
{
    pub async fn create(
        &self,
        caller_id: &str,
        payload: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let client_name = required(payload.client_name, "client_name")?;
        let date = required(payload.date, "date")?;
        let guest_id = payload.guest_id.filter(|id| !id.trim().is_empty());

        let package_id = match &guest_id {
            Some(guest_id) => {
                let selector = SelectPackageUseCase {
                    ledgers: self.ledgers.clone(),
                };
                selector
                    .execute(guest_id)
                    .await
                    .map_err(map_ledger_error)?
                    .map(|entry| entry.id)
            }
            None => None,
        };

        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            user_id: caller_id.to_string(),
            client_name,
            date,
            notes: payload.notes.unwrap_or_default(),
            guest_id,
            attended: false,
            package_id,
        };

        self.appointments
            .insert(appointment.clone())
            .await
            .map_err(storage_failure("insert"))?;
        tracing::info!(
            appointment_id = %appointment.id,
            guest_id = ?appointment.guest_id,
            package_id = ?appointment.package_id,
            "appointment created"
        );

        Ok(appointment)
    }

    pub async fn list(
        &self,
        caller_id: &str,
        user_id: &str,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        if caller_id != user_id {
            return Err(AppointmentError::Forbidden);
        }

        self.appointments
            .list_for_user(user_id)
            .await
            .map_err(storage_failure("list"))
    }

    pub async fn update(
        &self,
        caller_id: &str,
        appointment_id: &str,
        payload: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let stored = self.owned(caller_id, appointment_id).await?;

        // The package attribution only moves together with a guest change,
        // and an empty guest turns the booking into a walk-in.
        let (guest_id, package_id) = match payload.guest_id {
            Some(guest_id) if guest_id.trim().is_empty() => (None, None),
            Some(guest_id) => (Some(guest_id), payload.package_id.or(stored.package_id)),
            None => (stored.guest_id, stored.package_id),
        };

        let updated = Appointment {
            id: stored.id,
            user_id: stored.user_id,
            client_name: payload.client_name.unwrap_or(stored.client_name),
            date: payload.date.unwrap_or(stored.date),
            notes: payload.notes.unwrap_or(stored.notes),
            guest_id,
            attended: payload.attended.unwrap_or(stored.attended),
            package_id,
        };

        let found = self
            .appointments
            .update(updated.clone())
            .await
            .map_err(storage_failure("update"))?;
        if !found {
            return Err(AppointmentError::NotFound);
        }
        tracing::info!(appointment_id, attended = updated.attended, "appointment updated");

        Ok(updated)
    }

    pub async fn delete(&self, caller_id: &str, appointment_id: &str) -> Result<(), AppointmentError> {
        let stored = self.owned(caller_id, appointment_id).await?;

        // Prune the guest's date list first so a failed prune leaves the
        // appointment in place for a retry.
        if let Some(guest_id) = &stored.guest_id {
            let found = self
                .guests
                .remove_appointment_date(guest_id, &stored.date)
                .await
                .map_err(storage_failure("remove_appointment_date"))?;
            if !found {
                tracing::warn!(appointment_id, guest_id = %guest_id, "booked guest no longer exists");
            }
        }

        let removed = self
            .appointments
            .remove(appointment_id)
            .await
            .map_err(storage_failure("remove"))?;
        if !removed {
            return Err(AppointmentError::NotFound);
        }
        tracing::info!(appointment_id, "appointment deleted");

        Ok(())
    }

    async fn owned(
        &self,
        caller_id: &str,
        appointment_id: &str,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .appointments
            .get(appointment_id)
            .await
            .map_err(storage_failure("get"))?
            .ok_or(AppointmentError::NotFound)?;

        if appointment.user_id != caller_id {
            return Err(AppointmentError::Forbidden);
        }

        Ok(appointment)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppointmentError> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppointmentError::InvalidArgument(format!("{field} is required")))
}

fn map_ledger_error(err: LedgerError) -> AppointmentError {
    match err {
        LedgerError::InvalidArgument(message) => AppointmentError::InvalidArgument(message),
        _ => AppointmentError::StorageFailure,
    }
}

fn storage_failure(operation: &'static str) -> impl Fn(String) -> AppointmentError {
    move |err| {
        tracing::error!(error = %err, operation, "appointment store failed");
        AppointmentError::StorageFailure
    }
}
