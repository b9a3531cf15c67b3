#![warn(missing_debug_implementations, unsafe_code)]

#[macro_use] extern crate log;
#[macro_use] extern crate crossbeam_channel;
#[macro_use] extern crate derive_more;


mod common;
mod errors;
mod diagnosis;
mod zombie_lock;
mod replication;
mod cleaner;


pub use diagnosis::{diagnose, quorum_size, ClusterObservation, ConflictVotes, Diagnosis, PeerReport};
pub use zombie_lock::{FileZombieLock, ZombieLockState, ZombieLockStore, DEFAULT_ZOMBIE_LOCK_PATH};
pub use zombie_lock::resolution::{StartupAction, ZombieResolver};
pub use replication::{NodeConnection, NodeRole, ReplicationManager, StandbyInfo};
pub use cleaner::{CleanerConfiguration, CleanerTimings, Clock, SystemClock, UnseenStandbyPolicy};
pub use cleaner::liveness::{LivenessTracker, StandbyRecord};
pub use cleaner::standby_cleaner::{CycleReport, ProbeSummary, StandbyCleaner};
pub use errors::{GuardError, ErrorKind, new_err};
pub use common::termination_requested;
pub type CleanerWorker = common::Worker;


/// Opens the local connection and starts the standby cleaner on its own thread.
/// Only the local connection failure is reported; cycle errors are logged by the worker.
pub fn start_standby_cleaner<Rm, Clk>(config : CleanerConfiguration<Rm, Clk>) -> Result<CleanerWorker, GuardError>
where Rm : ReplicationManager,
	  Clk : Clock{

	let cleaner = StandbyCleaner::new(config)?;

	Ok(common::run_worker(cleaner::standby_cleaner::run_standby_cleaner, cleaner))
}
