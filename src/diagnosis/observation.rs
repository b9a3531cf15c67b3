use super::{ClusterObservation, ConflictVotes};

/// What polling a single peer revealed.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum PeerReport {
    Unreachable,
    Reachable { primary: String },
}

impl ClusterObservation {
    /// Aggregates per-peer reports into the counts used by the diagnosis.
    /// `total_members` includes the local node; `reports` must not.
    pub fn from_peer_reports(self_identity: &str, total_members: u32, reports: &[PeerReport]) -> ClusterObservation {
        let mut inactive_count = 0;
        let mut active_count = 0;
        let mut conflict_votes = ConflictVotes::new();

        for report in reports {
            match report {
                PeerReport::Unreachable => inactive_count += 1,
                PeerReport::Reachable { primary } => {
                    active_count += 1;
                    if primary != self_identity {
                        *conflict_votes.entry(primary.clone()).or_insert(0) += 1;
                    }
                }
            }
        }

        trace!("Cluster observation for {}: total={} inactive={} active={} conflicts={:?}",
               self_identity, total_members, inactive_count, active_count, conflict_votes);

        ClusterObservation {
            self_identity: self_identity.to_string(),
            total_members,
            inactive_count,
            active_count,
            conflict_votes,
        }
    }
}
