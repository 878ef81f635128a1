use uuid::Uuid;

use crate::domain::entities::Guest;
use crate::domain::errors::GuestError;
use crate::domain::ports::GuestStore;
use crate::interface_adapters::protocol::{
    CreateGuestRequest, GuestAppointmentDate, GuestAppointmentsResponse,
    MoveGuestAppointmentRequest, UpdateGuestRequest,
};

// Guest records owned by the calling trainer, including their booked dates.
pub struct ManageGuestsUseCase<G> {
    pub guests: G,
}

impl<G> ManageGuestsUseCase<G>
where
    G: GuestStore,
{
    pub async fn create(&self, caller_id: &str, payload: CreateGuestRequest) -> Result<Guest, GuestError> {
        let (Some(name), Some(email)) = (non_empty(payload.name), non_empty(payload.email)) else {
            return Err(GuestError::InvalidArgument(
                "name and email are required".to_string(),
            ));
        };

        let guest = Guest {
            id: Uuid::new_v4().to_string(),
            user_id: caller_id.to_string(),
            name,
            email,
            phone: payload.phone.unwrap_or_default(),
            notes: payload.notes.unwrap_or_default(),
            is_active: true,
            appointments: Vec::new(),
        };

        self.guests
            .insert(guest.clone())
            .await
            .map_err(storage_failure("insert"))?;
        tracing::info!(guest_id = %guest.id, "guest created");

        Ok(guest)
    }

    pub async fn get(&self, caller_id: &str, guest_id: &str) -> Result<Guest, GuestError> {
        self.owned(caller_id, guest_id).await
    }

    // Active and deactivated guests alike, so clients can offer restore.
    pub async fn list(&self, caller_id: &str) -> Result<Vec<Guest>, GuestError> {
        self.guests
            .list_for_user(caller_id)
            .await
            .map_err(storage_failure("list"))
    }

    pub async fn update(
        &self,
        caller_id: &str,
        guest_id: &str,
        payload: UpdateGuestRequest,
    ) -> Result<Guest, GuestError> {
        let stored = self.owned(caller_id, guest_id).await?;

        let updated = Guest {
            name: non_empty(payload.name).unwrap_or(stored.name),
            email: non_empty(payload.email).unwrap_or(stored.email),
            phone: non_empty(payload.phone).unwrap_or(stored.phone),
            notes: non_empty(payload.notes).unwrap_or(stored.notes),
            ..stored
        };
        self.write(updated, "update").await
    }

    pub async fn deactivate(&self, caller_id: &str, guest_id: &str) -> Result<Guest, GuestError> {
        self.set_active(caller_id, guest_id, false).await
    }

    pub async fn restore(&self, caller_id: &str, guest_id: &str) -> Result<Guest, GuestError> {
        self.set_active(caller_id, guest_id, true).await
    }

    pub async fn appointments(
        &self,
        caller_id: &str,
        guest_id: &str,
    ) -> Result<GuestAppointmentsResponse, GuestError> {
        let guest = self.owned(caller_id, guest_id).await?;

        let appointments = guest
            .appointments
            .into_iter()
            .map(|date| GuestAppointmentDate {
                date,
                notes: guest.notes.clone(),
            })
            .collect();

        Ok(GuestAppointmentsResponse {
            guest_id: guest.id,
            guest_name: guest.name,
            appointments,
        })
    }

    pub async fn add_appointment(
        &self,
        caller_id: &str,
        guest_id: &str,
        date: Option<String>,
    ) -> Result<(), GuestError> {
        let date = non_empty(date)
            .ok_or_else(|| GuestError::InvalidArgument("date is required".to_string()))?;
        self.owned(caller_id, guest_id).await?;

        let found = self
            .guests
            .add_appointment_date(guest_id, &date)
            .await
            .map_err(storage_failure("add_appointment_date"))?;
        if !found {
            return Err(GuestError::NotFound);
        }
        tracing::info!(guest_id, date = %date, "guest appointment added");

        Ok(())
    }

    pub async fn move_appointment(
        &self,
        caller_id: &str,
        guest_id: &str,
        payload: MoveGuestAppointmentRequest,
    ) -> Result<(), GuestError> {
        let (Some(old_date), Some(new_date)) =
            (non_empty(payload.old_date), non_empty(payload.new_date))
        else {
            return Err(GuestError::InvalidArgument(
                "oldDate and newDate are required".to_string(),
            ));
        };
        self.owned(caller_id, guest_id).await?;

        let found = self
            .guests
            .replace_appointment_date(guest_id, &old_date, &new_date)
            .await
            .map_err(storage_failure("replace_appointment_date"))?;
        if !found {
            return Err(GuestError::NotFound);
        }
        tracing::info!(guest_id, old_date = %old_date, new_date = %new_date, "guest appointment moved");

        Ok(())
    }

    pub async fn remove_appointment(
        &self,
        caller_id: &str,
        guest_id: &str,
        date: Option<String>,
    ) -> Result<(), GuestError> {
        let date = non_empty(date)
            .ok_or_else(|| GuestError::InvalidArgument("date is required".to_string()))?;
        self.owned(caller_id, guest_id).await?;

        let found = self
            .guests
            .remove_appointment_date(guest_id, &date)
            .await
            .map_err(storage_failure("remove_appointment_date"))?;
        if !found {
            return Err(GuestError::NotFound);
        }
        tracing::info!(guest_id, date = %date, "guest appointment removed");

        Ok(())
    }

    async fn set_active(
        &self,
        caller_id: &str,
        guest_id: &str,
        is_active: bool,
    ) -> Result<Guest, GuestError> {
        let stored = self.owned(caller_id, guest_id).await?;
        self.write(Guest { is_active, ..stored }, "set_active").await
    }

    async fn write(&self, guest: Guest, operation: &'static str) -> Result<Guest, GuestError> {
        let found = self
            .guests
            .update(guest.clone())
            .await
            .map_err(storage_failure(operation))?;
        if !found {
            return Err(GuestError::NotFound);
        }
        tracing::info!(guest_id = %guest.id, is_active = guest.is_active, "guest updated");

        Ok(guest)
    }

    async fn owned(&self, caller_id: &str, guest_id: &str) -> Result<Guest, GuestError> {
        let guest = self
            .guests
            .get(guest_id)
            .await
            .map_err(storage_failure("get"))?
            .ok_or(GuestError::NotFound)?;

        if guest.user_id != caller_id {
            return Err(GuestError::Forbidden);
        }

        Ok(guest)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn storage_failure(operation: &'static str) -> impl Fn(String) -> GuestError {
    move |err| {
        tracing::error!(error = %err, operation, "guest store failed");
        GuestError::StorageFailure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{guest, FailureFlags, RecordingGuestStore};

    fn use_case(guests: RecordingGuestStore) -> ManageGuestsUseCase<RecordingGuestStore> {
        ManageGuestsUseCase { guests }
    }

    #[tokio::test]
    async fn when_name_and_email_are_given_then_guest_is_created_active() {
        let guests = RecordingGuestStore::new();

        let created = use_case(guests.clone())
            .create(
                "trainer-1",
                CreateGuestRequest {
                    name: Some("Anna".to_string()),
                    email: Some("anna@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("expected create to succeed");

        assert!(created.is_active);
        assert!(created.appointments.is_empty());
        assert_eq!(created.user_id, "trainer-1");
        assert_eq!(guests.get_test_guest(&created.id), Some(created));
    }

    #[tokio::test]
    async fn when_email_is_missing_then_create_returns_invalid_argument() {
        let result = use_case(RecordingGuestStore::new())
            .create(
                "trainer-1",
                CreateGuestRequest {
                    name: Some("Anna".to_string()),
                    email: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(
            result,
            Err(GuestError::InvalidArgument(
                "name and email are required".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn when_other_trainer_reads_guest_then_returns_forbidden() {
        let guests = RecordingGuestStore::new();
        guests.insert_test_guest(guest("g1", "trainer-1"));

        let result = use_case(guests).get("trainer-2", "g1").await;

        assert_eq!(result, Err(GuestError::Forbidden));
    }

    #[tokio::test]
    async fn when_listing_then_only_callers_guests_are_returned_including_inactive() {
        let guests = RecordingGuestStore::new();
        guests.insert_test_guest(guest("g1", "trainer-1"));
        guests.insert_test_guest(guest("g2", "trainer-2"));
        guests.insert_test_guest(Guest {
            is_active: false,
            ..guest("g3", "trainer-1")
        });

        let listed = use_case(guests).list("trainer-1").await.unwrap();

        let ids: Vec<_> = listed.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["g1", "g3"]);
    }

    #[tokio::test]
    async fn when_update_has_empty_fields_then_stored_values_are_kept() {
        let guests = RecordingGuestStore::new();
        guests.insert_test_guest(guest("g1", "trainer-1"));

        let updated = use_case(guests.clone())
            .update(
                "trainer-1",
                "g1",
                UpdateGuestRequest {
                    name: Some(String::new()),
                    phone: Some("555-0100".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "g1 name");
        assert_eq!(updated.phone, "555-0100");
        assert_eq!(guests.get_test_guest("g1"), Some(updated));
    }

    #[tokio::test]
    async fn when_guest_is_deactivated_then_restore_brings_it_back() {
        let guests = RecordingGuestStore::new();
        guests.insert_test_guest(guest("g1", "trainer-1"));
        let use_case = use_case(guests.clone());

        use_case.deactivate("trainer-1", "g1").await.unwrap();
        assert_eq!(guests.get_test_guest("g1").map(|g| g.is_active), Some(false));

        use_case.restore("trainer-1", "g1").await.unwrap();
        assert_eq!(guests.get_test_guest("g1").map(|g| g.is_active), Some(true));
    }

    #[tokio::test]
    async fn when_other_trainer_deactivates_then_returns_forbidden_and_guest_stays_active() {
        let guests = RecordingGuestStore::new();
        guests.insert_test_guest(guest("g1", "trainer-1"));

        let result = use_case(guests.clone()).deactivate("trainer-2", "g1").await;

        assert_eq!(result, Err(GuestError::Forbidden));
        assert_eq!(guests.get_test_guest("g1").map(|g| g.is_active), Some(true));
    }

    #[tokio::test]
    async fn when_same_date_is_added_twice_then_it_is_listed_once() {
        let guests = RecordingGuestStore::new();
        guests.insert_test_guest(guest("g1", "trainer-1"));
        let use_case = use_case(guests);

        for _ in 0..2 {
            use_case
                .add_appointment("trainer-1", "g1", Some("2026-10-20".to_string()))
                .await
                .unwrap();
        }
        let listed = use_case.appointments("trainer-1", "g1").await.unwrap();

        assert_eq!(listed.guest_name, "g1 name");
        assert_eq!(listed.appointments.len(), 1);
        assert_eq!(listed.appointments[0].date, "2026-10-20");
        assert_eq!(listed.appointments[0].notes, "likes mornings");
    }

    #[tokio::test]
    async fn when_appointment_is_moved_then_old_date_is_replaced() {
        let guests = RecordingGuestStore::new();
        guests.insert_test_guest(Guest {
            appointments: vec!["2026-10-20".to_string(), "2026-10-22".to_string()],
            ..guest("g1", "trainer-1")
        });

        use_case(guests.clone())
            .move_appointment(
                "trainer-1",
                "g1",
                MoveGuestAppointmentRequest {
                    old_date: Some("2026-10-20".to_string()),
                    new_date: Some("2026-10-21".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(
            guests.get_test_guest("g1").map(|g| g.appointments),
            Some(vec!["2026-10-22".to_string(), "2026-10-21".to_string()])
        );
    }

    #[tokio::test]
    async fn when_move_lacks_new_date_then_returns_invalid_argument() {
        let guests = RecordingGuestStore::new();
        guests.insert_test_guest(guest("g1", "trainer-1"));

        let result = use_case(guests)
            .move_appointment(
                "trainer-1",
                "g1",
                MoveGuestAppointmentRequest {
                    old_date: Some("2026-10-20".to_string()),
                    new_date: None,
                },
            )
            .await;

        assert!(matches!(result, Err(GuestError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn when_appointment_is_removed_then_date_disappears() {
        let guests = RecordingGuestStore::new();
        guests.insert_test_guest(Guest {
            appointments: vec!["2026-10-20".to_string()],
            ..guest("g1", "trainer-1")
        });

        use_case(guests.clone())
            .remove_appointment("trainer-1", "g1", Some("2026-10-20".to_string()))
            .await
            .unwrap();

        assert_eq!(
            guests.get_test_guest("g1").map(|g| g.appointments),
            Some(Vec::new())
        );
    }

    #[tokio::test]
    async fn when_profile_is_updated_then_booked_dates_are_untouched() {
        let guests = RecordingGuestStore::new();
        guests.insert_test_guest(Guest {
            appointments: vec!["2026-10-20".to_string()],
            ..guest("g1", "trainer-1")
        });

        use_case(guests.clone())
            .update(
                "trainer-1",
                "g1",
                UpdateGuestRequest {
                    notes: Some("new notes".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            guests.get_test_guest("g1").map(|g| g.appointments),
            Some(vec!["2026-10-20".to_string()])
        );
    }

    #[tokio::test]
    async fn when_guest_is_unknown_then_date_edits_return_not_found() {
        let result = use_case(RecordingGuestStore::new())
            .add_appointment("trainer-1", "missing", Some("2026-10-20".to_string()))
            .await;

        assert_eq!(result, Err(GuestError::NotFound));
    }

    #[tokio::test]
    async fn when_guest_store_fails_then_returns_storage_failure() {
        let guests = RecordingGuestStore::new().with_failures(FailureFlags {
            read: true,
            ..Default::default()
        });

        let result = use_case(guests).list("trainer-1").await;

        assert_eq!(result, Err(GuestError::StorageFailure));
    }
}
