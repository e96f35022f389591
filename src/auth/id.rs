//! Repository and installation identifiers.

// self
use crate::{_prelude::*, error::ConfigError};

/// Repository addressed as `owner/name`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryRef {
	owner: String,
	name: String,
}
impl RepositoryRef {
	/// Parses `owner/name`; exactly one `/` with both halves non-empty.
	pub fn parse(value: impl AsRef<str>) -> Result<Self, ConfigError> {
		let view = value.as_ref();
		let invalid = || ConfigError::InvalidRepository { value: view.to_owned() };
		let (owner, name) = view.split_once('/').ok_or_else(invalid)?;

		if owner.is_empty() || name.is_empty() || name.contains('/') {
			return Err(invalid());
		}

		Ok(Self { owner: owner.to_owned(), name: name.to_owned() })
	}

	/// Account that owns the repository.
	pub fn owner(&self) -> &str {
		&self.owner
	}

	/// Repository name without the owner.
	pub fn name(&self) -> &str {
		&self.name
	}
}
impl FromStr for RepositoryRef {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
impl TryFrom<String> for RepositoryRef {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}
impl From<RepositoryRef> for String {
	fn from(value: RepositoryRef) -> Self {
		value.to_string()
	}
}
impl Debug for RepositoryRef {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Repository({}/{})", self.owner, self.name)
	}
}
impl Display for RepositoryRef {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}/{}", self.owner, self.name)
	}
}

/// Installation of the App on an account or repository.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstallationRef {
	/// Numeric installation identifier.
	pub id: u64,
}
impl InstallationRef {
	/// Wraps a numeric installation identifier.
	pub const fn new(id: u64) -> Self {
		Self { id }
	}
}
impl Display for InstallationRef {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.id)
	}
}
