use core::fmt;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

use crate::common::termination_requested;
use crate::errors::{new_err, ErrorKind, Result};
use crate::replication::{NodeConnection, NodeRole, ReplicationManager, StandbyInfo};
use super::liveness::LivenessTracker;
use super::{CleanerConfiguration, CleanerTimings, Clock, UnseenStandbyPolicy};

/// Result of a single cleanup cycle.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CycleReport {
    RoleCheckFailed,
    NotPrimary,
    TopologyFailed,

    /// Shutdown requested in the middle of the cycle.
    Cancelled,
    Completed(ProbeSummary),
}

/// Standby ids grouped by what happened to them during a completed cycle.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct ProbeSummary {
    pub reachable: Vec<u64>,
    pub unreachable: Vec<u64>,
    pub evicted: Vec<u64>,
    pub eviction_failed: Vec<u64>,

    /// Tracked standbys gone from the topology listing.
    pub forgotten: Vec<u64>,
}

pub struct StandbyCleaner<Rm, Clk>
    where Rm: ReplicationManager,
          Clk: Clock {
    replication_manager: Rm,
    local_connection: Rm::Connection,
    clock: Clk,
    timings: CleanerTimings,
    unseen_policy: UnseenStandbyPolicy,
    tracker: LivenessTracker,
}

impl <Rm, Clk> fmt::Debug for StandbyCleaner<Rm, Clk>
    where Rm: ReplicationManager,
          Clk: Clock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StandbyCleaner")
            .field("timings", &self.timings)
            .field("unseen_policy", &self.unseen_policy)
            .field("tracker", &self.tracker)
            .finish()
    }
}

impl <Rm, Clk> StandbyCleaner<Rm, Clk>
    where Rm: ReplicationManager,
          Clk: Clock {
    /// Opens the local connection. Failure here is fatal for the host process.
    pub fn new(config: CleanerConfiguration<Rm, Clk>) -> Result<StandbyCleaner<Rm, Clk>> {
        if config.timings.tick_interval == Duration::from_secs(0) {
            return new_err(ErrorKind::Configuration, "Invalid cleaner timings".to_string(),
                           "tick interval must be positive".to_string());
        }

        let local_connection = match config.replication_manager.local_connection() {
            Ok(connection) => connection,
            Err(err) => return new_err(ErrorKind::Replication,
                                       "Failed to open local connection".to_string(), err.to_string()),
        };

        Ok(StandbyCleaner {
            replication_manager: config.replication_manager,
            local_connection,
            clock: config.clock,
            timings: config.timings,
            unseen_policy: config.unseen_policy,
            tracker: LivenessTracker::new(),
        })
    }

    pub fn timings(&self) -> CleanerTimings {
        self.timings
    }

    pub fn tracker(&self) -> &LivenessTracker {
        &self.tracker
    }

    /// Runs one cleanup pass: role check, topology listing, sequential probing.
    /// Termination is checked before every replication manager call.
    pub fn run_cycle(&mut self, terminate_worker_rx: &Receiver<()>) -> CycleReport {
        if termination_requested(terminate_worker_rx) {
            return CycleReport::Cancelled;
        }
        match self.replication_manager.current_role(&self.local_connection) {
            Err(err) => {
                error!("Failed to check role: {}", err);
                return CycleReport::RoleCheckFailed;
            },
            Ok(NodeRole::Standby) => {
                trace!("Not a primary, standby cleanup skipped");
                return CycleReport::NotPrimary;
            },
            Ok(NodeRole::Primary) => {},
        }

        if termination_requested(terminate_worker_rx) {
            return CycleReport::Cancelled;
        }
        let standbys = match self.replication_manager.standbys(&self.local_connection) {
            Ok(standbys) => standbys,
            Err(err) => {
                error!("Failed to get standbys: {}", err);
                return CycleReport::TopologyFailed;
            },
        };

        let mut summary = ProbeSummary::default();
        for standby in &standbys {
            if termination_requested(terminate_worker_rx) {
                return CycleReport::Cancelled;
            }

            match self.replication_manager.remote_connection(&standby.address) {
                Ok(connection) => {
                    self.tracker.mark_seen(standby, self.clock.now());
                    connection.close();
                    trace!("{} is reachable", standby);
                    summary.reachable.push(standby.id);
                },
                Err(err) => {
                    trace!("{} is unreachable: {}", standby, err);
                    summary.unreachable.push(standby.id);

                    if !self.eviction_due(standby, self.clock.now()) {
                        continue;
                    }
                    if termination_requested(terminate_worker_rx) {
                        return CycleReport::Cancelled;
                    }
                    self.evict(standby, &mut summary);
                },
            }
        }

        summary.forgotten = self.tracker.retain_listed(&standbys);
        for id in &summary.forgotten {
            info!("Standby {} left the topology, no longer tracked", id);
        }

        CycleReport::Completed(summary)
    }

    fn eviction_due(&mut self, standby: &StandbyInfo, now: Instant) -> bool {
        if self.tracker.last_seen(standby.id).is_none() {
            match self.unseen_policy {
                UnseenStandbyPolicy::NeverEvict => return false,
                UnseenStandbyPolicy::StartGraceOnFirstFailure => self.tracker.seed(standby, now),
            }
        }

        match self.tracker.unreachable_for(standby.id, now) {
            Some(unreachable_for) => unreachable_for >= self.timings.grace_period,
            None => false,
        }
    }

    fn evict(&mut self, standby: &StandbyInfo, summary: &mut ProbeSummary) {
        match self.replication_manager.unregister_standby(standby.id) {
            Ok(()) => {
                self.tracker.forget(standby.id);
                info!("{} unregistered: unreachable longer than {:?}", standby, self.timings.grace_period);
                summary.evicted.push(standby.id);
            },
            Err(err) => {
                error!("Failed to unregister {}: {}", standby.id, err);
                summary.eviction_failed.push(standby.id);
            },
        }
    }

    /// Closes the local connection.
    pub fn shutdown(self) {
        self.local_connection.close();
    }
}

pub fn run_standby_cleaner<Rm, Clk>(mut cleaner: StandbyCleaner<Rm, Clk>, terminate_worker_rx: Receiver<()>)
    where Rm: ReplicationManager,
          Clk: Clock {
    info!("Standby cleaner worker started");

    // bounded ticker: ticks missed by an overrunning cycle are dropped
    let ticker = crossbeam_channel::tick(cleaner.timings.tick_interval);
    loop {
        select!(
            recv(terminate_worker_rx) -> res  => {
                if res.is_err() {
                    error!("Abnormal exit for standby cleaner worker");
                }
                break
            },
            recv(ticker) -> _  => {
                let report = cleaner.run_cycle(&terminate_worker_rx);
                trace!("Standby cleanup cycle: {:?}", report);
                if let CycleReport::Cancelled = report {
                    break
                }
            },
        );
    }

    cleaner.shutdown();
    info!("Standby cleaner worker stopped");
}
