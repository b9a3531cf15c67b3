use std::collections::BTreeMap;
use core::fmt;

mod observation;


pub use observation::PeerReport;

/// Candidate primary identity -> number of peers naming it as primary.
/// Ordered map: equal counts resolve to the lexicographically smallest identity.
pub type ConflictVotes = BTreeMap<String, u32>;

/// Cluster state as seen by the local node during one diagnosis cycle.
/// Self is excluded from both `inactive_count` and `active_count`.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct ClusterObservation {
    pub self_identity: String,
    pub total_members: u32,
    pub inactive_count: u32,
    pub active_count: u32,
    pub conflict_votes: ConflictVotes,
}

/// Outcome of the zombie diagnosis.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Diagnosis {
    /// Local node may keep acting as primary.
    ConfirmedPrimary(String),

    /// Local node is a suspected zombie. `best_guess` holds a majority-backed primary
    /// to rejoin under. It can be the local node itself.
    UnresolvedZombie { best_guess: String },

    /// Local node is a suspected zombie and no node holds a majority.
    ConfirmedZombieNoCandidate,
}

impl Diagnosis {
    pub fn is_primary(&self) -> bool {
        match self {
            Diagnosis::ConfirmedPrimary(_) => true,
            _ => false,
        }
    }

    pub fn is_zombie(&self) -> bool {
        !self.is_primary()
    }

    /// Primary identity carried by the verdict, if any.
    pub fn candidate(&self) -> Option<&str> {
        match self {
            Diagnosis::ConfirmedPrimary(identity) => Some(identity.as_str()),
            Diagnosis::UnresolvedZombie { best_guess } => Some(best_guess.as_str()),
            Diagnosis::ConfirmedZombieNoCandidate => None,
        }
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Diagnosis::ConfirmedPrimary(identity) => write!(f, "confirmed primary {}", identity),
            Diagnosis::UnresolvedZombie { best_guess } => write!(f, "zombie, best guess primary {}", best_guess),
            Diagnosis::ConfirmedZombieNoCandidate => write!(f, "zombie, no primary candidate"),
        }
    }
}

/// Majority of the cluster members.
pub fn quorum_size(total_members: u32) -> u32 {
    total_members / 2 + 1
}

/// Decides whether the local node may act as primary. Pure function: rules are
/// evaluated in order and the first match wins.
pub fn diagnose(observation: &ClusterObservation) -> Diagnosis {
    let myself = &observation.self_identity;
    let total = observation.total_members;
    let inactive = observation.inactive_count;
    let active = observation.active_count;
    let votes = &observation.conflict_votes;

    if total == 1 {
        return Diagnosis::ConfirmedPrimary(myself.clone());
    }

    // no meaningful quorum with two members
    if total == 2 {
        if !votes.is_empty() || inactive == 1 {
            return Diagnosis::ConfirmedZombieNoCandidate;
        }
        return Diagnosis::ConfirmedPrimary(myself.clone());
    }

    // every peer is unreachable: likely a network split, not a cluster outage
    if total == inactive + 1 {
        return Diagnosis::ConfirmedZombieNoCandidate;
    }

    let quorum = quorum_size(total);

    if votes.is_empty() && active >= quorum {
        return Diagnosis::ConfirmedPrimary(myself.clone());
    }

    if active < quorum {
        return Diagnosis::ConfirmedZombieNoCandidate;
    }

    let (mut top_candidate, mut top_count) = top_conflict_candidate(votes);

    // Peers neither inactive nor voting for someone else are implicit votes for self.
    let total_conflicts: i64 = votes.values().map(|count| i64::from(*count)).sum();
    let my_count = i64::from(total) - i64::from(inactive) - total_conflicts;

    if my_count > top_count {
        top_count = my_count;
        top_candidate = myself.as_str();
    }

    if top_count < i64::from(quorum) {
        return Diagnosis::ConfirmedZombieNoCandidate;
    }

    Diagnosis::UnresolvedZombie { best_guess: top_candidate.to_string() }
}

// Strict comparison over the ordered map keeps the smallest identity on ties.
fn top_conflict_candidate(votes: &ConflictVotes) -> (&str, i64) {
    let mut top_candidate = "";
    let mut top_count = 0;
    for (identity, count) in votes {
        let count = i64::from(*count);
        if count > top_count {
            top_count = count;
            top_candidate = identity.as_str();
        }
    }

    (top_candidate, top_count)
}
