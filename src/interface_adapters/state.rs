use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::domain::entities::{
    Appointment, ExercisePlan, Guest, GuestLedger, LedgerEntry, PackageTemplate,
};
use crate::domain::ports::{
    AppointmentStore, CatalogStore, Clock, ExercisePlanStore, GuestStore, IdentityProvider,
    LedgerStore,
};

#[derive(Clone)]
pub struct AppState {
    // We use Arc<dyn Trait> so the memory and postgres backends are interchangeable.
    pub catalog: Arc<dyn CatalogStore>,
    pub ledgers: Arc<dyn LedgerStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub guests: Arc<dyn GuestStore>,
    pub plans: Arc<dyn ExercisePlanStore>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    // State backed entirely by process memory.
    pub fn in_memory(identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            catalog: Arc::new(InMemoryCatalogStore::seeded()),
            ledgers: Arc::new(InMemoryLedgerStore::default()),
            appointments: Arc::new(InMemoryAppointmentStore::default()),
            guests: Arc::new(InMemoryGuestStore::default()),
            plans: Arc::new(InMemoryExercisePlanStore::default()),
            identity,
        }
    }
}

// In-memory package catalog; keeps insertion order for listing.
#[derive(Clone, Default)]
pub struct InMemoryCatalogStore {
    pub templates: Arc<Mutex<Vec<PackageTemplate>>>,
}

impl InMemoryCatalogStore {
    // Catalog holding only the unlimited sentinel template.
    pub fn seeded() -> Self {
        Self {
            templates: Arc::new(Mutex::new(vec![PackageTemplate::unlimited()])),
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn list(&self) -> Result<Vec<PackageTemplate>, String> {
        let templates = self.templates.lock().await;
        Ok(templates.clone())
    }

    async fn get(&self, template_id: &str) -> Result<Option<PackageTemplate>, String> {
        let templates = self.templates.lock().await;
        Ok(templates.iter().find(|t| t.id == template_id).cloned())
    }

    async fn insert(&self, template: PackageTemplate) -> Result<(), String> {
        let mut templates = self.templates.lock().await;
        templates.push(template);
        Ok(())
    }

    async fn update(&self, template: PackageTemplate) -> Result<bool, String> {
        let mut templates = self.templates.lock().await;
        match templates.iter_mut().find(|t| t.id == template.id) {
            Some(stored) => {
                *stored = template;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, template_id: &str) -> Result<bool, String> {
        let mut templates = self.templates.lock().await;
        let before = templates.len();
        templates.retain(|t| t.id != template_id);
        Ok(templates.len() != before)
    }
}

// In-memory guest ledgers keyed by guest id.
#[derive(Clone, Default)]
pub struct InMemoryLedgerStore {
    pub ledgers: Arc<Mutex<HashMap<String, GuestLedger>>>,
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn get(&self, guest_id: &str) -> Result<Option<GuestLedger>, String> {
        let ledgers = self.ledgers.lock().await;
        Ok(ledgers.get(guest_id).cloned())
    }

    async fn append(&self, guest_id: &str, entry: LedgerEntry) -> Result<(), String> {
        let mut ledgers = self.ledgers.lock().await;
        let ledger = ledgers
            .entry(guest_id.to_string())
            .or_insert_with(|| GuestLedger {
                guest_id: guest_id.to_string(),
                version: 0,
                entries: Vec::new(),
            });
        ledger.entries.push(entry);
        ledger.version += 1;
        Ok(())
    }

    async fn replace(
        &self,
        guest_id: &str,
        expected_version: i64,
        entries: Vec<LedgerEntry>,
    ) -> Result<bool, String> {
        let mut ledgers = self.ledgers.lock().await;
        match ledgers.get_mut(guest_id) {
            Some(ledger) if ledger.version == expected_version => {
                ledger.entries = entries;
                ledger.version += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// In-memory appointment records in booking order.
#[derive(Clone, Default)]
pub struct InMemoryAppointmentStore {
    pub appointments: Arc<Mutex<Vec<Appointment>>>,
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn insert(&self, appointment: Appointment) -> Result<(), String> {
        let mut appointments = self.appointments.lock().await;
        appointments.push(appointment);
        Ok(())
    }

    async fn get(&self, appointment_id: &str) -> Result<Option<Appointment>, String> {
        let appointments = self.appointments.lock().await;
        Ok(appointments.iter().find(|a| a.id == appointment_id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Appointment>, String> {
        let appointments = self.appointments.lock().await;
        Ok(appointments
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, appointment: Appointment) -> Result<bool, String> {
        let mut appointments = self.appointments.lock().await;
        match appointments.iter_mut().find(|a| a.id == appointment.id) {
            Some(stored) => {
                *stored = appointment;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, appointment_id: &str) -> Result<bool, String> {
        let mut appointments = self.appointments.lock().await;
        let before = appointments.len();
        appointments.retain(|a| a.id != appointment_id);
        Ok(appointments.len() != before)
    }
}

// In-memory guest records in registration order.
#[derive(Clone, Default)]
pub struct InMemoryGuestStore {
    pub guests: Arc<Mutex<Vec<Guest>>>,
}

impl InMemoryGuestStore {
    async fn with_dates<F>(&self, guest_id: &str, edit: F) -> Result<bool, String>
    where
        F: FnOnce(&mut Vec<String>),
    {
        let mut guests = self.guests.lock().await;
        match guests.iter_mut().find(|g| g.id == guest_id) {
            Some(guest) => {
                edit(&mut guest.appointments);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl GuestStore for InMemoryGuestStore {
    async fn insert(&self, guest: Guest) -> Result<(), String> {
        let mut guests = self.guests.lock().await;
        guests.push(guest);
        Ok(())
    }

    async fn get(&self, guest_id: &str) -> Result<Option<Guest>, String> {
        let guests = self.guests.lock().await;
        Ok(guests.iter().find(|g| g.id == guest_id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Guest>, String> {
        let guests = self.guests.lock().await;
        Ok(guests
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, guest: Guest) -> Result<bool, String> {
        let mut guests = self.guests.lock().await;
        match guests.iter_mut().find(|g| g.id == guest.id) {
            Some(stored) => {
                stored.name = guest.name;
                stored.email = guest.email;
                stored.phone = guest.phone;
                stored.notes = guest.notes;
                stored.is_active = guest.is_active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_appointment_date(&self, guest_id: &str, date: &str) -> Result<bool, String> {
        self.with_dates(guest_id, |dates| {
            if !dates.iter().any(|d| d == date) {
                dates.push(date.to_string());
            }
        })
        .await
    }

    async fn replace_appointment_date(
        &self,
        guest_id: &str,
        old_date: &str,
        new_date: &str,
    ) -> Result<bool, String> {
        self.with_dates(guest_id, |dates| {
            dates.retain(|d| d != old_date);
            dates.push(new_date.to_string());
        })
        .await
    }

    async fn remove_appointment_date(&self, guest_id: &str, date: &str) -> Result<bool, String> {
        self.with_dates(guest_id, |dates| dates.retain(|d| d != date))
            .await
    }
}

// In-memory exercise plans in creation order.
#[derive(Clone, Default)]
pub struct InMemoryExercisePlanStore {
    pub plans: Arc<Mutex<Vec<ExercisePlan>>>,
}

#[async_trait]
impl ExercisePlanStore for InMemoryExercisePlanStore {
    async fn insert(&self, plan: ExercisePlan) -> Result<(), String> {
        let mut plans = self.plans.lock().await;
        plans.push(plan);
        Ok(())
    }

    async fn get(&self, plan_id: &str) -> Result<Option<ExercisePlan>, String> {
        let plans = self.plans.lock().await;
        Ok(plans.iter().find(|p| p.id == plan_id).cloned())
    }

    async fn list(
        &self,
        user_id: &str,
        guest_id: Option<&str>,
        workout_day: Option<&str>,
    ) -> Result<Vec<ExercisePlan>, String> {
        let plans = self.plans.lock().await;
        Ok(plans
            .iter()
            .filter(|p| p.user_id == user_id)
            .filter(|p| guest_id.map_or(true, |id| p.guest_id == id))
            .filter(|p| workout_day.map_or(true, |day| p.workout_day == day))
            .cloned()
            .collect())
    }

    async fn update(&self, plan: ExercisePlan) -> Result<bool, String> {
        let mut plans = self.plans.lock().await;
        match plans.iter_mut().find(|p| p.id == plan.id) {
            Some(stored) => {
                *stored = plan;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, plan_id: &str) -> Result<bool, String> {
        let mut plans = self.plans.lock().await;
        let before = plans.len();
        plans.retain(|p| p.id != plan_id);
        Ok(plans.len() != before)
    }
}

// System clock adapter used by ledger use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
