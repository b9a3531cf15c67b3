use crate::steps::cluster::CaseCluster;
use repguard::{diagnose, Diagnosis, StartupAction, ZombieResolver};
use repguard_modules::MemoryZombieLock;

pub fn run() {
	isolated_primary_blocks();
	minority_side_blocks();
	two_node_cluster_blocks_on_lost_peer();
	split_votes_without_majority();
}

fn isolated_primary_blocks() {
	let mut cluster = CaseCluster::new(&["pg-1", "pg-2", "pg-3", "pg-4", "pg-5"], "pg-1");
	cluster.isolate("pg-1");

	let diagnosis = diagnose(&cluster.observe("pg-1"));
	assert_eq!(Diagnosis::ConfirmedZombieNoCandidate, diagnosis);

	let resolver = ZombieResolver::new("pg-1", MemoryZombieLock::new());
	resolver.record(&diagnosis).expect("zombie lock written");
	assert_eq!(StartupAction::AwaitManualIntervention, resolver.startup_action().expect("zombie lock state"));

	cluster.heal();
	assert_eq!(Diagnosis::ConfirmedPrimary("pg-1".to_string()), diagnose(&cluster.observe("pg-1")));
}

fn minority_side_blocks() {
	let mut cluster = CaseCluster::new(&["pg-1", "pg-2", "pg-3", "pg-4", "pg-5"], "pg-1");
	for majority in &["pg-3", "pg-4", "pg-5"] {
		cluster.cut_link("pg-1", majority);
		cluster.cut_link("pg-2", majority);
	}

	let observation = cluster.observe("pg-1");
	assert_eq!(3, observation.inactive_count);
	assert_eq!(Diagnosis::ConfirmedZombieNoCandidate, diagnose(&observation));
}

fn two_node_cluster_blocks_on_lost_peer() {
	let mut cluster = CaseCluster::new(&["pg-1", "pg-2"], "pg-1");
	assert!(diagnose(&cluster.observe("pg-1")).is_primary());

	cluster.isolate("pg-1");
	assert_eq!(Diagnosis::ConfirmedZombieNoCandidate, diagnose(&cluster.observe("pg-1")));

	cluster.heal();
	cluster.set_believed_primary("pg-2", "pg-2");
	assert_eq!(Diagnosis::ConfirmedZombieNoCandidate, diagnose(&cluster.observe("pg-1")));
}

fn split_votes_without_majority() {
	let mut cluster = CaseCluster::new(&["pg-1", "pg-2", "pg-3", "pg-4", "pg-5", "pg-6", "pg-7"], "pg-1");
	cluster.set_believed_primary("pg-2", "pg-2");
	cluster.set_believed_primary("pg-3", "pg-2");
	cluster.set_believed_primary("pg-4", "pg-4");
	cluster.set_believed_primary("pg-5", "pg-4");

	// pg-1 keeps 3 implied votes, pg-2 and pg-4 two each, quorum is 4
	let diagnosis = diagnose(&cluster.observe("pg-1"));
	assert_eq!(Diagnosis::ConfirmedZombieNoCandidate, diagnosis);
	assert_eq!(None, diagnosis.candidate());
}

#[cfg(test)]
mod tests {
	#[test]
	fn test_network_split() {
		crate::cases::network_split::run()
	}
}
