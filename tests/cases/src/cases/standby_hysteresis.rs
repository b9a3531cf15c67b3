use crate::steps;
use repguard::{NodeRole, UnseenStandbyPolicy};
use repguard_modules::{ManualClock, MemoryReplicationManager};

pub fn run() {
	flapping_standby_is_kept();
	dead_standby_is_evicted_once();
	never_seen_standby_is_kept();
	first_failure_starts_grace_period();
	failed_eviction_is_retried();
}

fn flapping_standby_is_kept() {
	let manager = MemoryReplicationManager::new(NodeRole::Primary, vec![steps::standby(1)]);
	let clock = ManualClock::new();
	let mut cleaner = steps::create_manual_cleaner(&manager, &clock, UnseenStandbyPolicy::NeverEvict);
	let (_terminate_tx, terminate_rx) = steps::termination_channel();

	// reachable every 100th cycle: 495 seconds between answers, below the grace period
	for cycle in 0..1000 {
		let reachable = cycle % 100 == 0;
		manager.set_reachable(&steps::standby(1).address, reachable);

		let summary = steps::tick(&mut cleaner, &clock, &terminate_rx);
		assert!(summary.evicted.is_empty(), "flapping standby evicted on cycle {}", cycle);
	}

	assert!(manager.unregistered().is_empty());
}

fn dead_standby_is_evicted_once() {
	let manager = MemoryReplicationManager::new(NodeRole::Primary, vec![steps::standby(1), steps::standby(2)]);
	let clock = ManualClock::new();
	let mut cleaner = steps::create_manual_cleaner(&manager, &clock, UnseenStandbyPolicy::NeverEvict);
	let timings = cleaner.timings();
	let (_terminate_tx, terminate_rx) = steps::termination_channel();

	steps::tick(&mut cleaner, &clock, &terminate_rx);
	manager.set_reachable(&steps::standby(2).address, false);

	let cycles_to_eviction = (timings.grace_period.as_millis() / timings.tick_interval.as_millis()) as usize;
	for cycle in 1..cycles_to_eviction {
		let summary = steps::tick(&mut cleaner, &clock, &terminate_rx);
		assert!(summary.evicted.is_empty(), "evicted early on cycle {}", cycle);
	}

	let summary = steps::tick(&mut cleaner, &clock, &terminate_rx);
	assert_eq!(vec![2], summary.evicted);

	for _ in 0..10 {
		steps::tick(&mut cleaner, &clock, &terminate_rx);
	}
	assert_eq!(vec![2], manager.unregistered());
	assert_eq!(1, cleaner.tracker().len());
}

fn never_seen_standby_is_kept() {
	let manager = MemoryReplicationManager::new(NodeRole::Primary, vec![steps::standby(3)]);
	manager.set_reachable(&steps::standby(3).address, false);
	let clock = ManualClock::new();
	let mut cleaner = steps::create_manual_cleaner(&manager, &clock, UnseenStandbyPolicy::NeverEvict);
	let (_terminate_tx, terminate_rx) = steps::termination_channel();

	for _ in 0..500 {
		steps::tick(&mut cleaner, &clock, &terminate_rx);
	}

	assert!(manager.unregistered().is_empty());
	assert!(cleaner.tracker().is_empty());
}

fn first_failure_starts_grace_period() {
	let manager = MemoryReplicationManager::new(NodeRole::Primary, vec![steps::standby(3)]);
	manager.set_reachable(&steps::standby(3).address, false);
	let clock = ManualClock::new();
	let mut cleaner = steps::create_manual_cleaner(&manager, &clock, UnseenStandbyPolicy::StartGraceOnFirstFailure);
	let (_terminate_tx, terminate_rx) = steps::termination_channel();

	for _ in 0..500 {
		steps::tick(&mut cleaner, &clock, &terminate_rx);
	}

	assert_eq!(vec![3], manager.unregistered());
}

fn failed_eviction_is_retried() {
	let manager = MemoryReplicationManager::new(NodeRole::Primary, vec![steps::standby(4)]);
	let clock = ManualClock::new();
	let mut cleaner = steps::create_manual_cleaner(&manager, &clock, UnseenStandbyPolicy::NeverEvict);
	let timings = cleaner.timings();
	let (_terminate_tx, terminate_rx) = steps::termination_channel();

	steps::tick(&mut cleaner, &clock, &terminate_rx);
	manager.set_reachable(&steps::standby(4).address, false);
	manager.set_unregister_fails(4, true);

	clock.advance(timings.grace_period);
	let summary = steps::tick(&mut cleaner, &clock, &terminate_rx);
	assert_eq!(vec![4], summary.eviction_failed);
	assert!(cleaner.tracker().last_seen(4).is_some());

	manager.set_unregister_fails(4, false);
	let summary = steps::tick(&mut cleaner, &clock, &terminate_rx);
	assert_eq!(vec![4], summary.evicted);
	assert!(cleaner.tracker().is_empty());
}

#[cfg(test)]
mod tests {
	#[test]
	fn test_standby_hysteresis() {
		crate::cases::standby_hysteresis::run()
	}
}
