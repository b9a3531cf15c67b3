use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{new_err, ErrorKind, Result};

pub mod resolution;

/// Well-known location of the zombie marker.
pub const DEFAULT_ZOMBIE_LOCK_PATH: &str = "/data/zombie.lock";

/// Persisted zombie status. `Present` carries the primary believed legitimate when the
/// zombie verdict was recorded; the identity can be empty.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ZombieLockState {
	Absent,
	Present(String),
}

/// Durable single-slot zombie marker. Called from the startup/diagnosis path only.
pub trait ZombieLockStore {
	fn exists(&self) -> bool;

	/// Creates or overwrites the marker.
	fn write(&self, identity: &str) -> Result<()>;

	/// Fails with `ErrorKind::NotFound` when the marker is absent and with
	/// `ErrorKind::Storage` when it cannot be read.
	fn read(&self) -> Result<String>;

	/// Fails with `ErrorKind::NotFound` when the marker is absent.
	fn remove(&self) -> Result<()>;

	fn state(&self) -> Result<ZombieLockState> {
		match self.read() {
			Ok(identity) => Ok(ZombieLockState::Present(identity)),
			Err(ref err) if err.is_not_found() => Ok(ZombieLockState::Absent),
			Err(err) => Err(err),
		}
	}
}

/// File-backed marker: the file content is the identity, nothing else.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FileZombieLock {
	path: PathBuf,
}

impl FileZombieLock {
	pub fn new<P: AsRef<Path>>(path: P) -> FileZombieLock {
		FileZombieLock { path: path.as_ref().to_path_buf() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn io_err<T>(&self, action: &str, err: io::Error) -> Result<T> {
		let kind = if err.kind() == io::ErrorKind::NotFound {
			ErrorKind::NotFound
		} else {
			ErrorKind::Storage
		};

		new_err(kind, format!("cannot {} zombie lock {}", action, self.path.display()), err.to_string())
	}
}

impl Default for FileZombieLock {
	fn default() -> Self {
		FileZombieLock::new(DEFAULT_ZOMBIE_LOCK_PATH)
	}
}

impl ZombieLockStore for FileZombieLock {
	// Any stat failure except "not found" counts as present.
	fn exists(&self) -> bool {
		match fs::metadata(&self.path) {
			Ok(_) => true,
			Err(err) => err.kind() != io::ErrorKind::NotFound,
		}
	}

	fn write(&self, identity: &str) -> Result<()> {
		if let Err(err) = fs::write(&self.path, identity.as_bytes()) {
			return new_err(ErrorKind::Storage,
						   format!("cannot write zombie lock {}", self.path.display()), err.to_string());
		}

		info!("Zombie lock written: {}", identity);
		Ok(())
	}

	fn read(&self) -> Result<String> {
		let body = match fs::read(&self.path) {
			Ok(body) => body,
			Err(err) => return self.io_err("read", err),
		};

		match String::from_utf8(body) {
			Ok(identity) => Ok(identity),
			Err(err) => new_err(ErrorKind::Storage,
								format!("corrupted zombie lock {}", self.path.display()), err.to_string()),
		}
	}

	fn remove(&self) -> Result<()> {
		if let Err(err) = fs::remove_file(&self.path) {
			return self.io_err("remove", err);
		}

		info!("Zombie lock removed");
		Ok(())
	}
}
