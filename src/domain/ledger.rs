// Pure package accounting rules. Storage and time are supplied by callers.

use crate::domain::entities::{Classification, LedgerEntry, PackageTemplate, SECONDS_PER_DAY};

// Build a ledger entry snapshotting the template at `now`.
pub fn new_entry(entry_id: String, template: &PackageTemplate, now: u64) -> LedgerEntry {
    LedgerEntry {
        id: entry_id,
        package_id: template.id.clone(),
        name: template.name.clone(),
        session_count: template.session_count,
        duration_days: template.duration_days,
        description: template.description.clone(),
        start_date: now,
        end_date: end_date(now, template.duration_days),
        remaining_sessions: template.session_count,
    }
}

// A zero or missing duration means no expiry by date.
pub fn end_date(start: u64, duration_days: Option<u32>) -> Option<u64> {
    match duration_days {
        Some(days) if days > 0 => {
            Some(start.saturating_add(u64::from(days).saturating_mul(SECONDS_PER_DAY)))
        }
        _ => None,
    }
}

pub fn is_expired(entry: &LedgerEntry, now: u64) -> bool {
    let expired_by_date = matches!(entry.end_date, Some(end) if end <= now);
    if entry.is_unlimited() {
        return expired_by_date;
    }

    // Entries without a recorded remaining count never expire by sessions.
    let expired_by_sessions = matches!(entry.remaining_sessions, Some(0));
    expired_by_date || expired_by_sessions
}

// Split entries into active and expired, keeping ledger order in each bucket.
pub fn classify(entries: &[LedgerEntry], now: u64) -> Classification {
    let (expired, active): (Vec<_>, Vec<_>) = entries
        .iter()
        .cloned()
        .partition(|entry| is_expired(entry, now));

    Classification { active, expired }
}

// Appointment attribution: first bounded entry with sessions left, then the
// first unlimited entry. Dates are deliberately not consulted here, so an
// entry can be picked after its end date while `classify` reports it expired.
pub fn select_for_appointment(entries: &[LedgerEntry]) -> Option<&LedgerEntry> {
    let with_sessions =
        |entry: &&LedgerEntry| !entry.is_unlimited() && entry.has_remaining_sessions();
    let unlimited = |entry: &&LedgerEntry| entry.is_unlimited();

    entries
        .iter()
        .find(with_sessions)
        .or_else(|| entries.iter().find(unlimited))
}

// Remaining sessions after marking (or un-marking) one attendance.
pub fn adjust_remaining(entry: &LedgerEntry, attended: bool) -> Option<u32> {
    if entry.is_unlimited() {
        return entry.remaining_sessions;
    }

    let remaining = entry.remaining_sessions?;
    if attended {
        Some(remaining.saturating_sub(1))
    } else {
        let cap = entry.session_count.unwrap_or(remaining);
        Some(remaining.saturating_add(1).min(cap))
    }
}
