use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// String prefix carried by identifiers of items that have no catalog entry.
pub const EPHEMERAL_PREFIX: &str = "eph:";

/// Identifier of a recommendation candidate.
///
/// Catalog identifiers address a stored vector point and may be persisted;
/// ephemeral identifiers are minted for items fabricated by discovery and are
/// neither similarity-searchable nor persistable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaId {
	Catalog(String),
	Ephemeral(String),
}
impl MediaId {
	pub fn catalog(id: impl Into<String>) -> Self {
		Self::Catalog(id.into())
	}

	/// Mints a fresh ephemeral identifier.
	pub fn ephemeral() -> Self {
		Self::Ephemeral(Uuid::new_v4().simple().to_string())
	}

	pub fn parse(raw: &str) -> Self {
		match raw.strip_prefix(EPHEMERAL_PREFIX) {
			Some(rest) => Self::Ephemeral(rest.to_string()),
			None => Self::Catalog(raw.to_string()),
		}
	}

	pub fn is_ephemeral(&self) -> bool {
		matches!(self, Self::Ephemeral(_))
	}
}
impl fmt::Display for MediaId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Catalog(id) => f.write_str(id),
			Self::Ephemeral(id) => write!(f, "{EPHEMERAL_PREFIX}{id}"),
		}
	}
}
impl Serialize for MediaId {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.collect_str(self)
	}
}
impl<'de> Deserialize<'de> for MediaId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		Ok(Self::parse(&raw))
	}
}
