use crate::diagnosis::Diagnosis;
use crate::errors::Result;
use super::{ZombieLockState, ZombieLockStore};

/// What the node does on startup given the persisted zombie status.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Display)]
pub enum StartupAction {
	/// Not a zombie: regular startup.
	Proceed,

	/// Zombie with a known primary: rejoin as its standby.
	#[display(fmt = "Rejoin under {}", _0)]
	Rejoin(String),

	/// Zombie without another primary to follow: block until an operator intervenes.
	AwaitManualIntervention,
}

/// Drives zombie status transitions over a lock store.
#[derive(Debug)]
pub struct ZombieResolver<S: ZombieLockStore> {
	self_identity: String,
	store: S,
}

impl <S: ZombieLockStore> ZombieResolver<S> {
	pub fn new<I: Into<String>>(self_identity: I, store: S) -> ZombieResolver<S> {
		ZombieResolver { self_identity: self_identity.into(), store }
	}

	pub fn self_identity(&self) -> &str {
		&self.self_identity
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	/// Persists a zombie verdict with its best guess primary (empty when none).
	/// A confirmed primary verdict leaves the storage untouched.
	pub fn record(&self, diagnosis: &Diagnosis) -> Result<()> {
		if diagnosis.is_primary() {
			trace!("Diagnosis: {}", diagnosis);
			return Ok(());
		}

		warn!("Zombie discovered: {}", diagnosis);
		self.store.write(diagnosis.candidate().unwrap_or(""))
	}

	/// A marker naming the local node itself never yields `Rejoin`: a node cannot
	/// follow itself as a standby.
	pub fn startup_action(&self) -> Result<StartupAction> {
		let action = match self.store.state()? {
			ZombieLockState::Absent => StartupAction::Proceed,
			ZombieLockState::Present(ref identity) if identity.is_empty() => StartupAction::AwaitManualIntervention,
			ZombieLockState::Present(ref identity) if *identity == self.self_identity => {
				warn!("Zombie lock names the local node {} as primary", identity);
				StartupAction::AwaitManualIntervention
			},
			ZombieLockState::Present(identity) => StartupAction::Rejoin(identity),
		};

		info!("Startup action: {}", action);
		Ok(action)
	}

	/// Clears the zombie status once the node runs as a standby of the resolved primary.
	pub fn complete_rejoin(&self) -> Result<()> {
		self.store.remove()
	}
}
