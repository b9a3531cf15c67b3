use std::error::Error;
use std::fmt::Display;
use core::fmt;

/// Error category. Lets callers branch on the failure without parsing the text.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
pub enum ErrorKind {
	/// Zombie marker is absent.
	NotFound,

	/// Zombie marker exists but cannot be read, written or removed.
	Storage,

	/// Replication manager call failed.
	Replication,

	/// Invalid settings.
	Configuration,
}

pub(crate) type Result<T> = std::result::Result<T, GuardError>;

#[derive (Debug)]
pub struct GuardError {
	kind : ErrorKind,
	text : String,
	cause: String
}

pub fn new_err<T>(kind : ErrorKind, text : String, cause : String) -> Result<T>{
	Err(GuardError {kind, text, cause})
}

impl GuardError {
	pub fn kind(&self) -> ErrorKind {
		self.kind
	}

	pub fn is_not_found(&self) -> bool {
		self.kind == ErrorKind::NotFound
	}
}

impl Display for GuardError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let cause_word = {
			if !self.cause.is_empty() {
				" Cause: ".to_string()
			} else {
				String::new()
			}
		};
		write!(f, "{}.{}{}", self.text, cause_word, self.cause)
	}
}

impl Error for GuardError {}
