use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::{
    Appointment, ExercisePlan, Guest, GuestLedger, LedgerEntry, PackageTemplate,
    VerifiedIdentity,
};
use crate::domain::errors::IdentityError;

// Port for the package catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list(&self) -> Result<Vec<PackageTemplate>, String>;
    async fn get(&self, template_id: &str) -> Result<Option<PackageTemplate>, String>;
    async fn insert(&self, template: PackageTemplate) -> Result<(), String>;
    // Returns false when the template does not exist.
    async fn update(&self, template: PackageTemplate) -> Result<bool, String>;
    async fn remove(&self, template_id: &str) -> Result<bool, String>;
}

// Port for per-guest ledgers.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get(&self, guest_id: &str) -> Result<Option<GuestLedger>, String>;
    // Appends atomically, creating the ledger when the guest has none.
    async fn append(&self, guest_id: &str, entry: LedgerEntry) -> Result<(), String>;
    // Full replace guarded by the version read earlier. Returns false when
    // the stored version moved (or the ledger vanished) and nothing was written.
    async fn replace(
        &self,
        guest_id: &str,
        expected_version: i64,
        entries: Vec<LedgerEntry>,
    ) -> Result<bool, String>;
}

// Port for appointment records.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, appointment: Appointment) -> Result<(), String>;
    async fn get(&self, appointment_id: &str) -> Result<Option<Appointment>, String>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Appointment>, String>;
    async fn update(&self, appointment: Appointment) -> Result<bool, String>;
    async fn remove(&self, appointment_id: &str) -> Result<bool, String>;
}

// Port for trainer-owned guest records.
#[async_trait]
pub trait GuestStore: Send + Sync {
    async fn insert(&self, guest: Guest) -> Result<(), String>;
    async fn get(&self, guest_id: &str) -> Result<Option<Guest>, String>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Guest>, String>;
    // Writes profile fields and the active flag; the date list is left alone.
    async fn update(&self, guest: Guest) -> Result<bool, String>;
    // Date list edits are single store operations. All return false when the
    // guest does not exist.
    async fn add_appointment_date(&self, guest_id: &str, date: &str) -> Result<bool, String>;
    async fn replace_appointment_date(
        &self,
        guest_id: &str,
        old_date: &str,
        new_date: &str,
    ) -> Result<bool, String>;
    async fn remove_appointment_date(&self, guest_id: &str, date: &str) -> Result<bool, String>;
}

// Port for exercise plans.
#[async_trait]
pub trait ExercisePlanStore: Send + Sync {
    async fn insert(&self, plan: ExercisePlan) -> Result<(), String>;
    async fn get(&self, plan_id: &str) -> Result<Option<ExercisePlan>, String>;
    // Plans of one trainer in creation order, optionally narrowed by guest and day.
    async fn list(
        &self,
        user_id: &str,
        guest_id: Option<&str>,
        workout_day: Option<&str>,
    ) -> Result<Vec<ExercisePlan>, String>;
    async fn update(&self, plan: ExercisePlan) -> Result<bool, String>;
    async fn remove(&self, plan_id: &str) -> Result<bool, String>;
}

// Port for bearer-token verification against the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}

// Shared handles in AppState are Arc<dyn Port>; let use cases take them directly.
#[async_trait]
impl<T: CatalogStore + ?Sized> CatalogStore for Arc<T> {
    async fn list(&self) -> Result<Vec<PackageTemplate>, String> {
        (**self).list().await
    }

    async fn get(&self, template_id: &str) -> Result<Option<PackageTemplate>, String> {
        (**self).get(template_id).await
    }

    async fn insert(&self, template: PackageTemplate) -> Result<(), String> {
        (**self).insert(template).await
    }

    async fn update(&self, template: PackageTemplate) -> Result<bool, String> {
        (**self).update(template).await
    }

    async fn remove(&self, template_id: &str) -> Result<bool, String> {
        (**self).remove(template_id).await
    }
}

#[async_trait]
impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    async fn get(&self, guest_id: &str) -> Result<Option<GuestLedger>, String> {
        (**self).get(guest_id).await
    }

    async fn append(&self, guest_id: &str, entry: LedgerEntry) -> Result<(), String> {
        (**self).append(guest_id, entry).await
    }

    async fn replace(
        &self,
        guest_id: &str,
        expected_version: i64,
        entries: Vec<LedgerEntry>,
    ) -> Result<bool, String> {
        (**self).replace(guest_id, expected_version, entries).await
    }
}

#[async_trait]
impl<T: AppointmentStore + ?Sized> AppointmentStore for Arc<T> {
    async fn insert(&self, appointment: Appointment) -> Result<(), String> {
        (**self).insert(appointment).await
    }

    async fn get(&self, appointment_id: &str) -> Result<Option<Appointment>, String> {
        (**self).get(appointment_id).await
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Appointment>, String> {
        (**self).list_for_user(user_id).await
    }

    async fn update(&self, appointment: Appointment) -> Result<bool, String> {
        (**self).update(appointment).await
    }

    async fn remove(&self, appointment_id: &str) -> Result<bool, String> {
        (**self).remove(appointment_id).await
    }
}

#[async_trait]
impl<T: GuestStore + ?Sized> GuestStore for Arc<T> {
    async fn insert(&self, guest: Guest) -> Result<(), String> {
        (**self).insert(guest).await
    }

    async fn get(&self, guest_id: &str) -> Result<Option<Guest>, String> {
        (**self).get(guest_id).await
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Guest>, String> {
        (**self).list_for_user(user_id).await
    }

    async fn update(&self, guest: Guest) -> Result<bool, String> {
        (**self).update(guest).await
    }

    async fn add_appointment_date(&self, guest_id: &str, date: &str) -> Result<bool, String> {
        (**self).add_appointment_date(guest_id, date).await
    }

    async fn replace_appointment_date(
        &self,
        guest_id: &str,
        old_date: &str,
        new_date: &str,
    ) -> Result<bool, String> {
        (**self)
            .replace_appointment_date(guest_id, old_date, new_date)
            .await
    }

    async fn remove_appointment_date(&self, guest_id: &str, date: &str) -> Result<bool, String> {
        (**self).remove_appointment_date(guest_id, date).await
    }
}

#[async_trait]
impl<T: ExercisePlanStore + ?Sized> ExercisePlanStore for Arc<T> {
    async fn insert(&self, plan: ExercisePlan) -> Result<(), String> {
        (**self).insert(plan).await
    }

    async fn get(&self, plan_id: &str) -> Result<Option<ExercisePlan>, String> {
        (**self).get(plan_id).await
    }

    async fn list(
        &self,
        user_id: &str,
        guest_id: Option<&str>,
        workout_day: Option<&str>,
    ) -> Result<Vec<ExercisePlan>, String> {
        (**self).list(user_id, guest_id, workout_day).await
    }

    async fn update(&self, plan: ExercisePlan) -> Result<bool, String> {
        (**self).update(plan).await
    }

    async fn remove(&self, plan_id: &str) -> Result<bool, String> {
        (**self).remove(plan_id).await
    }
}

#[async_trait]
impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        (**self).verify_token(token).await
    }
}
