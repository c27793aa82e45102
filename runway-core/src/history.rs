//! Runway history: one snapshot per calendar day, newest first.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One dated row of the history log.
///
/// Only the date is required. Rows written before the "Last Until" column
/// existed carry no exhaustion date and are kept as they are.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunwayHistoryEntry {
    pub snapshot_date: NaiveDate,
    pub runway_days: Option<i64>,
    pub exhaustion_date: Option<NaiveDate>,
}

impl RunwayHistoryEntry {
    pub fn new(snapshot_date: NaiveDate, runway_days: i64, exhaustion_date: NaiveDate) -> Self {
        Self {
            snapshot_date,
            runway_days: Some(runway_days),
            exhaustion_date: Some(exhaustion_date),
        }
    }
}

/// Replace every item sharing `item`'s key, then append `item`.
///
/// Items with other keys are kept untouched and in their original order.
pub fn upsert_by_key<T, K, F>(items: &mut Vec<T>, item: T, key: F)
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let new_key = key(&item);
    items.retain(|existing| key(existing) != new_key);
    items.push(item);
}

/// Insert today's snapshot and return the log sorted descending by date.
///
/// Existing rows that share a date collapse to the last one seen. Running
/// this twice on the same day leaves a single entry with the latest values.
pub fn record_snapshot(
    mut entries: Vec<RunwayHistoryEntry>,
    snapshot: RunwayHistoryEntry,
) -> Vec<RunwayHistoryEntry> {
    upsert_by_key(&mut entries, snapshot, |e| e.snapshot_date);

    let mut by_date: HashMap<NaiveDate, RunwayHistoryEntry> = HashMap::with_capacity(entries.len());
    for entry in entries {
        by_date.insert(entry.snapshot_date, entry);
    }

    let mut log: Vec<_> = by_date.into_values().collect();
    log.sort_by(|a, b| b.snapshot_date.cmp(&a.snapshot_date));
    log
}
