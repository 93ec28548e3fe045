use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::media_id::MediaId;

/// Upper bound of the per-request confidence scale.
pub const MAX_SCORE: u8 = 100;

/// Converts a raw similarity in [0, 1] to an integer percentage score.
///
/// Values outside the range are clamped; non-finite input maps to zero.
pub fn score_from_similarity(similarity: f32) -> u8 {
	if !similarity.is_finite() {
		return 0;
	}

	(similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
	Movie,
	Tv,
	Anime,
	Documentary,
	StandUp,
	#[default]
	Other,
}
impl MediaKind {
	pub fn from_label(label: &str) -> Self {
		let lower = label.trim().to_lowercase();

		if lower.contains("documentary") {
			Self::Documentary
		} else if lower.contains("anime") {
			Self::Anime
		} else if lower.contains("stand-up") || lower.contains("stand up") || lower.contains("standup") {
			Self::StandUp
		} else if lower.contains("tv") || lower.contains("show") || lower.contains("series") {
			Self::Tv
		} else if lower.contains("movie") || lower.contains("film") {
			Self::Movie
		} else {
			Self::Other
		}
	}

	/// Kinds that genre text can force regardless of the declared type column.
	pub fn from_genre(genre: &str) -> Option<Self> {
		let lower = genre.to_lowercase();

		if lower.contains("documentary") || lower.contains("doc") {
			Some(Self::Documentary)
		} else if lower.contains("anime") {
			Some(Self::Anime)
		} else if lower.contains("stand-up") {
			Some(Self::StandUp)
		} else {
			None
		}
	}

	pub fn as_label(&self) -> &'static str {
		match self {
			Self::Movie => "Movie",
			Self::Tv => "TV",
			Self::Anime => "Anime",
			Self::Documentary => "Documentary",
			Self::StandUp => "Stand-Up",
			Self::Other => "Other",
		}
	}
}
impl Serialize for MediaKind {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.as_label())
	}
}
impl<'de> Deserialize<'de> for MediaKind {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		Ok(Self::from_label(&raw))
	}
}

/// Catalog-sourced attributes of an item, minus identity and score.
///
/// This is the typed boundary for heterogeneous upstream payloads; fields the
/// store carries beyond these are dropped at decode time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaPayload {
	pub title: String,
	#[serde(default)]
	pub description: String,
	#[serde(default, rename = "type")]
	pub kind: MediaKind,
	#[serde(default)]
	pub rating: Option<f32>,
	#[serde(default)]
	pub image: Option<String>,
}
impl MediaPayload {
	pub fn into_item(self, id: MediaId, score: u8) -> MediaItem {
		MediaItem {
			id,
			title: self.title,
			description: self.description,
			kind: self.kind,
			rating: self.rating,
			image: self.image,
			score,
		}
	}
}

/// A recommendation candidate as returned to callers.
///
/// Request-scoped: `score` is assigned fresh per call and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
	pub id: MediaId,
	pub title: String,
	pub description: String,
	#[serde(rename = "type")]
	pub kind: MediaKind,
	pub rating: Option<f32>,
	pub image: Option<String>,
	pub score: u8,
}

/// Everything but the RFC 3986 unreserved set is escaped. Spaces stay
/// literal here and become `+` afterwards, the form placehold.co renders.
const PLACEHOLDER_TEXT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'~')
	.remove(b' ');

/// Synthesizes a poster URL for an item the catalog has no image for.
pub fn placeholder_image(title: &str) -> String {
	let text = utf8_percent_encode(title, PLACEHOLDER_TEXT).to_string().replace(' ', "+");

	format!("https://placehold.co/300x450?text={text}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn escapes_reserved_characters_and_keeps_plus_spaces() {
		assert_eq!(placeholder_image("Spirited Away"), "https://placehold.co/300x450?text=Spirited+Away");
		assert_eq!(placeholder_image("WALL·E"), "https://placehold.co/300x450?text=WALL%C2%B7E");
		assert_eq!(placeholder_image("M*A*S*H"), "https://placehold.co/300x450?text=M%2AA%2AS%2AH");
	}
}
