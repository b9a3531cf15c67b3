use crossbeam_channel::{Receiver, Sender};
use repguard::{CleanerConfiguration, CleanerTimings, CycleReport, ProbeSummary, StandbyCleaner, StandbyInfo, UnseenStandbyPolicy};
use repguard_modules::{ManualClock, MemoryReplicationManager};
use std::thread;
use std::time::Duration;


pub type MemoryCleaner = StandbyCleaner<MemoryReplicationManager, ManualClock>;

pub fn sleep_ms(milliseconds : u64) {
	thread::sleep(Duration::from_millis(milliseconds));
}

pub fn standby(id: u64) -> StandbyInfo {
	StandbyInfo { id, address: format!("10.0.0.{}:5433", id) }
}

pub fn fast_timings() -> CleanerTimings {
	CleanerTimings {
		tick_interval: Duration::from_millis(50),
		grace_period: Duration::from_millis(400),
	}
}

/// Cleaner driven cycle by cycle with the manual clock, reference timings.
pub fn create_manual_cleaner(manager: &MemoryReplicationManager, clock: &ManualClock, unseen_policy: UnseenStandbyPolicy)
	-> MemoryCleaner {
	let config = CleanerConfiguration {
		replication_manager: manager.clone(),
		clock: clock.clone(),
		timings: CleanerTimings::default(),
		unseen_policy,
	};

	StandbyCleaner::new(config).expect("local connection opened")
}

pub fn termination_channel() -> (Sender<()>, Receiver<()>) {
	crossbeam_channel::unbounded()
}

/// Advances the clock by one tick and runs a cycle that must complete.
pub fn tick(cleaner: &mut MemoryCleaner, clock: &ManualClock, terminate_rx: &Receiver<()>) -> ProbeSummary {
	clock.advance(cleaner.timings().tick_interval);

	match cleaner.run_cycle(terminate_rx) {
		CycleReport::Completed(summary) => summary,
		other => panic!("cleanup cycle not completed: {:?}", other),
	}
}
