use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::replication::StandbyInfo;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StandbyRecord {
    pub id: u64,
    pub address: String,
    pub last_seen_at: Instant,
}

/// Last successful contact per standby. Owned by the standby cleaner only: created on the
/// first successful probe, refreshed on each next one, dropped on eviction or when the
/// standby leaves the topology listing.
#[derive(Clone, Debug, Default)]
pub struct LivenessTracker {
    records: HashMap<u64, StandbyRecord>,
}

impl LivenessTracker {
    pub fn new() -> LivenessTracker {
        LivenessTracker::default()
    }

    pub fn mark_seen(&mut self, standby: &StandbyInfo, now: Instant) {
        let record = self.records.entry(standby.id).or_insert_with(|| StandbyRecord {
            id: standby.id,
            address: standby.address.clone(),
            last_seen_at: now,
        });

        record.address = standby.address.clone();
        record.last_seen_at = now;
    }

    /// Starts tracking without a successful probe. Keeps an existing record unchanged.
    pub fn seed(&mut self, standby: &StandbyInfo, now: Instant) {
        if !self.records.contains_key(&standby.id) {
            self.mark_seen(standby, now);
        }
    }

    pub fn last_seen(&self, id: u64) -> Option<Instant> {
        self.records.get(&id).map(|record| record.last_seen_at)
    }

    pub fn unreachable_for(&self, id: u64, now: Instant) -> Option<Duration> {
        self.last_seen(id).map(|last_seen| now.saturating_duration_since(last_seen))
    }

    pub fn forget(&mut self, id: u64) -> bool {
        self.records.remove(&id).is_some()
    }

    /// Drops records of the standbys missing from `listed`. Returns the dropped ids.
    pub fn retain_listed(&mut self, listed: &[StandbyInfo]) -> Vec<u64> {
        let mut dropped: Vec<u64> = self.records.keys()
            .filter(|id| !listed.iter().any(|standby| standby.id == **id))
            .cloned()
            .collect();
        dropped.sort();

        for id in &dropped {
            self.records.remove(id);
        }

        dropped
    }

    pub fn record(&self, id: u64) -> Option<&StandbyRecord> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
