use std::time::{Duration, Instant};

use crate::replication::ReplicationManager;

pub mod liveness;
pub mod standby_cleaner;


#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct CleanerTimings {
    /// Period between cleanup cycles.
    pub tick_interval: Duration,

    /// Minimal unreachable time, counted from the last successful probe, before eviction.
    pub grace_period: Duration,
}

impl Default for CleanerTimings {
    fn default() -> Self {
        CleanerTimings {
            tick_interval: Duration::from_secs(5),
            grace_period: Duration::from_secs(10 * 60),
        }
    }
}

/// Treatment of standbys that fail before their first successful probe.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
pub enum UnseenStandbyPolicy {
    /// The grace period starts with the first successful probe only. A standby that
    /// never answers is never evicted.
    NeverEvict,

    /// The first failed probe starts the grace period.
    StartGraceOnFirstFailure,
}

impl Default for UnseenStandbyPolicy {
    fn default() -> Self {
        UnseenStandbyPolicy::NeverEvict
    }
}

/// Time source for the liveness bookkeeping.
pub trait Clock: Send + 'static {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Clone, Debug)]
pub struct CleanerConfiguration<Rm, Clk>
    where Rm: ReplicationManager,
          Clk: Clock {
    pub replication_manager: Rm,
    pub clock: Clk,
    pub timings: CleanerTimings,
    pub unseen_policy: UnseenStandbyPolicy,
}
