use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::entities::{
    Appointment, Exercise, ExercisePlan, Guest, GuestLedger, LedgerEntry, PackageTemplate,
};
use crate::domain::ports::{
    AppointmentStore, CatalogStore, Clock, ExercisePlanStore, GuestStore, LedgerStore,
};

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

// Clock that tests can move forward between calls.
#[derive(Clone)]
pub(crate) struct ManualClock(Arc<Mutex<u64>>);

impl ManualClock {
    pub(crate) fn new(now: u64) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    pub(crate) fn advance(&self, seconds: u64) {
        let mut guard = self.0.lock().expect("clock mutex poisoned");
        *guard += seconds;
    }
}

impl Clock for ManualClock {
    fn now_epoch_seconds(&self) -> u64 {
        *self.0.lock().expect("clock mutex poisoned")
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub read: bool,
    pub write: bool,
}

pub(crate) fn template(id: &str, sessions: Option<u32>, days: Option<u32>) -> PackageTemplate {
    PackageTemplate {
        id: id.to_string(),
        name: format!("{id} pack"),
        session_count: sessions,
        duration_days: days,
        description: Some("test package".to_string()),
    }
}

pub(crate) fn bounded_entry(id: &str, sessions: u32, remaining: u32) -> LedgerEntry {
    LedgerEntry {
        id: id.to_string(),
        package_id: "tpl".to_string(),
        name: "tpl pack".to_string(),
        session_count: Some(sessions),
        duration_days: None,
        description: None,
        start_date: 0,
        end_date: None,
        remaining_sessions: Some(remaining),
    }
}

#[derive(Clone)]
pub(crate) struct RecordingCatalog {
    templates: Arc<Mutex<Vec<PackageTemplate>>>,
    failures: FailureFlags,
}

impl RecordingCatalog {
    pub(crate) fn new() -> Self {
        Self {
            templates: Arc::new(Mutex::new(Vec::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_template(&self, template: PackageTemplate) {
        let mut guard = self.templates.lock().expect("catalog mutex poisoned");
        guard.push(template);
    }

    pub(crate) fn get_test_template(&self, id: &str) -> Option<PackageTemplate> {
        let guard = self.templates.lock().expect("catalog mutex poisoned");
        guard.iter().find(|template| template.id == id).cloned()
    }
}

#[async_trait]
impl CatalogStore for RecordingCatalog {
    async fn list(&self) -> Result<Vec<PackageTemplate>, String> {
        if self.failures.read {
            return Err("list failed".to_string());
        }
        let guard = self.templates.lock().expect("catalog mutex poisoned");
        Ok(guard.clone())
    }

    async fn get(&self, template_id: &str) -> Result<Option<PackageTemplate>, String> {
        if self.failures.read {
            return Err("get failed".to_string());
        }
        Ok(self.get_test_template(template_id))
    }

    async fn insert(&self, template: PackageTemplate) -> Result<(), String> {
        if self.failures.write {
            return Err("insert failed".to_string());
        }
        self.insert_test_template(template);
        Ok(())
    }

    async fn update(&self, template: PackageTemplate) -> Result<bool, String> {
        if self.failures.write {
            return Err("update failed".to_string());
        }
        let mut guard = self.templates.lock().expect("catalog mutex poisoned");
        match guard.iter_mut().find(|stored| stored.id == template.id) {
            Some(stored) => {
                *stored = template;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, template_id: &str) -> Result<bool, String> {
        if self.failures.write {
            return Err("remove failed".to_string());
        }
        let mut guard = self.templates.lock().expect("catalog mutex poisoned");
        let before = guard.len();
        guard.retain(|template| template.id != template_id);
        Ok(guard.len() != before)
    }
}

#[derive(Clone)]
pub(crate) struct RecordingLedgerStore {
    ledgers: Arc<Mutex<HashMap<String, GuestLedger>>>,
    failures: FailureFlags,
}

impl RecordingLedgerStore {
    pub(crate) fn new() -> Self {
        Self {
            ledgers: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_ledger(&self, guest_id: &str, entries: Vec<LedgerEntry>) {
        let mut guard = self.ledgers.lock().expect("ledgers mutex poisoned");
        guard.insert(
            guest_id.to_string(),
            GuestLedger {
                guest_id: guest_id.to_string(),
                version: 1,
                entries,
            },
        );
    }

    pub(crate) fn get_test_ledger(&self, guest_id: &str) -> Option<GuestLedger> {
        let guard = self.ledgers.lock().expect("ledgers mutex poisoned");
        guard.get(guest_id).cloned()
    }

    // Simulates another request writing between our read and our write.
    pub(crate) fn bump_test_version(&self, guest_id: &str) {
        let mut guard = self.ledgers.lock().expect("ledgers mutex poisoned");
        if let Some(ledger) = guard.get_mut(guest_id) {
            ledger.version += 1;
        }
    }
}

#[async_trait]
impl LedgerStore for RecordingLedgerStore {
    async fn get(&self, guest_id: &str) -> Result<Option<GuestLedger>, String> {
        if self.failures.read {
            return Err("get failed".to_string());
        }
        Ok(self.get_test_ledger(guest_id))
    }

    async fn append(&self, guest_id: &str, entry: LedgerEntry) -> Result<(), String> {
        if self.failures.write {
            return Err("append failed".to_string());
        }
        let mut guard = self.ledgers.lock().expect("ledgers mutex poisoned");
        let ledger = guard
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
        if self.failures.write {
            return Err("replace failed".to_string());
        }
        let mut guard = self.ledgers.lock().expect("ledgers mutex poisoned");
        match guard.get_mut(guest_id) {
            Some(ledger) if ledger.version == expected_version => {
                ledger.entries = entries;
                ledger.version += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Clone)]
pub(crate) struct RecordingAppointmentStore {
    appointments: Arc<Mutex<Vec<Appointment>>>,
    failures: FailureFlags,
}

impl RecordingAppointmentStore {
    pub(crate) fn new() -> Self {
        Self {
            appointments: Arc::new(Mutex::new(Vec::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_appointment(&self, appointment: Appointment) {
        let mut guard = self.appointments.lock().expect("appointments mutex poisoned");
        guard.push(appointment);
    }

    pub(crate) fn get_test_appointment(&self, id: &str) -> Option<Appointment> {
        let guard = self.appointments.lock().expect("appointments mutex poisoned");
        guard.iter().find(|appointment| appointment.id == id).cloned()
    }
}

#[async_trait]
impl AppointmentStore for RecordingAppointmentStore {
    async fn insert(&self, appointment: Appointment) -> Result<(), String> {
        if self.failures.write {
            return Err("insert failed".to_string());
        }
        self.insert_test_appointment(appointment);
        Ok(())
    }

    async fn get(&self, appointment_id: &str) -> Result<Option<Appointment>, String> {
        if self.failures.read {
            return Err("get failed".to_string());
        }
        Ok(self.get_test_appointment(appointment_id))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Appointment>, String> {
        if self.failures.read {
            return Err("list failed".to_string());
        }
        let guard = self.appointments.lock().expect("appointments mutex poisoned");
        Ok(guard
            .iter()
            .filter(|appointment| appointment.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, appointment: Appointment) -> Result<bool, String> {
        if self.failures.write {
            return Err("update failed".to_string());
        }
        let mut guard = self.appointments.lock().expect("appointments mutex poisoned");
        match guard.iter_mut().find(|stored| stored.id == appointment.id) {
            Some(stored) => {
                *stored = appointment;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, appointment_id: &str) -> Result<bool, String> {
        if self.failures.write {
            return Err("remove failed".to_string());
        }
        let mut guard = self.appointments.lock().expect("appointments mutex poisoned");
        let before = guard.len();
        guard.retain(|appointment| appointment.id != appointment_id);
        Ok(guard.len() != before)
    }
}

pub(crate) fn guest(id: &str, owner: &str) -> Guest {
    Guest {
        id: id.to_string(),
        user_id: owner.to_string(),
        name: format!("{id} name"),
        email: format!("{id}@example.com"),
        phone: String::new(),
        notes: "likes mornings".to_string(),
        is_active: true,
        appointments: Vec::new(),
    }
}

pub(crate) fn exercise(name: &str) -> Exercise {
    Exercise {
        exercise_name: name.to_string(),
        sets: Some(3),
        reps: Some(10),
        weight: None,
        notes: String::new(),
    }
}

pub(crate) fn plan(id: &str, owner: &str, guest_id: &str, workout_day: &str) -> ExercisePlan {
    ExercisePlan {
        id: id.to_string(),
        user_id: owner.to_string(),
        guest_id: guest_id.to_string(),
        guest_name: format!("{guest_id} name"),
        workout_day: workout_day.to_string(),
        exercises: vec![exercise("squat")],
        created_at: 0,
    }
}

#[derive(Clone)]
pub(crate) struct RecordingGuestStore {
    guests: Arc<Mutex<Vec<Guest>>>,
    failures: FailureFlags,
}

impl RecordingGuestStore {
    pub(crate) fn new() -> Self {
        Self {
            guests: Arc::new(Mutex::new(Vec::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_guest(&self, guest: Guest) {
        let mut guard = self.guests.lock().expect("guests mutex poisoned");
        guard.push(guest);
    }

    pub(crate) fn get_test_guest(&self, id: &str) -> Option<Guest> {
        let guard = self.guests.lock().expect("guests mutex poisoned");
        guard.iter().find(|guest| guest.id == id).cloned()
    }

    fn edit_dates(&self, guest_id: &str, edit: impl FnOnce(&mut Vec<String>)) -> bool {
        let mut guard = self.guests.lock().expect("guests mutex poisoned");
        match guard.iter_mut().find(|guest| guest.id == guest_id) {
            Some(guest) => {
                edit(&mut guest.appointments);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl GuestStore for RecordingGuestStore {
    async fn insert(&self, guest: Guest) -> Result<(), String> {
        if self.failures.write {
            return Err("insert failed".to_string());
        }
        self.insert_test_guest(guest);
        Ok(())
    }

    async fn get(&self, guest_id: &str) -> Result<Option<Guest>, String> {
        if self.failures.read {
            return Err("get failed".to_string());
        }
        Ok(self.get_test_guest(guest_id))
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Guest>, String> {
        if self.failures.read {
            return Err("list failed".to_string());
        }
        let guard = self.guests.lock().expect("guests mutex poisoned");
        Ok(guard
            .iter()
            .filter(|guest| guest.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, guest: Guest) -> Result<bool, String> {
        if self.failures.write {
            return Err("update failed".to_string());
        }
        let mut guard = self.guests.lock().expect("guests mutex poisoned");
        match guard.iter_mut().find(|stored| stored.id == guest.id) {
            Some(stored) => {
                let appointments = std::mem::take(&mut stored.appointments);
                *stored = Guest {
                    appointments,
                    ..guest
                };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn add_appointment_date(&self, guest_id: &str, date: &str) -> Result<bool, String> {
        if self.failures.write {
            return Err("add date failed".to_string());
        }
        Ok(self.edit_dates(guest_id, |dates| {
            if !dates.iter().any(|stored| stored == date) {
                dates.push(date.to_string());
            }
        }))
    }

    async fn replace_appointment_date(
        &self,
        guest_id: &str,
        old_date: &str,
        new_date: &str,
    ) -> Result<bool, String> {
        if self.failures.write {
            return Err("replace date failed".to_string());
        }
        Ok(self.edit_dates(guest_id, |dates| {
            dates.retain(|stored| stored != old_date);
            dates.push(new_date.to_string());
        }))
    }

    async fn remove_appointment_date(&self, guest_id: &str, date: &str) -> Result<bool, String> {
        if self.failures.write {
            return Err("remove date failed".to_string());
        }
        Ok(self.edit_dates(guest_id, |dates| dates.retain(|stored| stored != date)))
    }
}

#[derive(Clone)]
pub(crate) struct RecordingPlanStore {
    plans: Arc<Mutex<Vec<ExercisePlan>>>,
    failures: FailureFlags,
}

impl RecordingPlanStore {
    pub(crate) fn new() -> Self {
        Self {
            plans: Arc::new(Mutex::new(Vec::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_plan(&self, plan: ExercisePlan) {
        let mut guard = self.plans.lock().expect("plans mutex poisoned");
        guard.push(plan);
    }

    pub(crate) fn get_test_plan(&self, id: &str) -> Option<ExercisePlan> {
        let guard = self.plans.lock().expect("plans mutex poisoned");
        guard.iter().find(|plan| plan.id == id).cloned()
    }
}

#[async_trait]
impl ExercisePlanStore for RecordingPlanStore {
    async fn insert(&self, plan: ExercisePlan) -> Result<(), String> {
        if self.failures.write {
            return Err("insert failed".to_string());
        }
        self.insert_test_plan(plan);
        Ok(())
    }

    async fn get(&self, plan_id: &str) -> Result<Option<ExercisePlan>, String> {
        if self.failures.read {
            return Err("get failed".to_string());
        }
        Ok(self.get_test_plan(plan_id))
    }

    async fn list(
        &self,
        user_id: &str,
        guest_id: Option<&str>,
        workout_day: Option<&str>,
    ) -> Result<Vec<ExercisePlan>, String> {
        if self.failures.read {
            return Err("list failed".to_string());
        }
        let guard = self.plans.lock().expect("plans mutex poisoned");
        Ok(guard
            .iter()
            .filter(|plan| plan.user_id == user_id)
            .filter(|plan| guest_id.map_or(true, |id| plan.guest_id == id))
            .filter(|plan| workout_day.map_or(true, |day| plan.workout_day == day))
            .cloned()
            .collect())
    }

    async fn update(&self, plan: ExercisePlan) -> Result<bool, String> {
        if self.failures.write {
            return Err("update failed".to_string());
        }
        let mut guard = self.plans.lock().expect("plans mutex poisoned");
        match guard.iter_mut().find(|stored| stored.id == plan.id) {
            Some(stored) => {
                *stored = plan;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, plan_id: &str) -> Result<bool, String> {
        if self.failures.write {
            return Err("remove failed".to_string());
        }
        let mut guard = self.plans.lock().expect("plans mutex poisoned");
        let before = guard.len();
        guard.retain(|plan| plan.id != plan_id);
        Ok(guard.len() != before)
    }
}
