use std::collections::HashSet;

use serde_json::{Value, json};
use tracing::{debug, warn};

use reel_domain::{MAX_SCORE, MediaId, MediaItem, MediaKind, placeholder_image};
use reel_storage::models::Neighbor;

use crate::RecService;

/// One candidate as reported by the language model, before it is resolved
/// against the catalog.
#[derive(Debug)]
struct DiscoveredRecord {
	title: String,
	description: Option<String>,
	rating: Option<f32>,
	kind: Option<MediaKind>,
}

impl RecService {
	/// Asks the language model for candidates and resolves each one to a
	/// catalog identity where possible. Degrades to an empty list on any
	/// upstream trouble; the caller backfills from the vector index.
	pub(crate) async fn discover(&self, query: &str) -> Vec<MediaItem> {
		let cfg = &self.cfg.providers.discovery;

		if cfg.api_key.is_none() {
			debug!("Discovery credential not configured; skipping discovery.");

			return Vec::new();
		}

		let messages = build_discovery_messages(query, cfg.candidate_count);
		let content = match self.backends.discovery.complete(cfg, &messages).await {
			Ok(content) => content,
			Err(err) => {
				warn!(error = %err, "Discovery call failed; continuing without it.");

				return Vec::new();
			},
		};
		let records = parse_discovery_records(&content);

		if records.is_empty() {
			warn!("Discovery output contained no usable records.");

			return Vec::new();
		}

		let mut items = Vec::new();
		let mut seen: HashSet<MediaId> = HashSet::new();

		for record in records {
			let item = self.resolve_record(record).await;

			if seen.insert(item.id.clone()) {
				items.push(item);
			}
		}

		items
	}

	/// Keyword-resolves one candidate title. A miss fabricates an ephemeral
	/// item so the suggestion still reaches the caller.
	async fn resolve_record(&self, record: DiscoveredRecord) -> MediaItem {
		match self.backends.catalog.match_text(&record.title, 1).await {
			Ok(hits) => match hits.into_iter().next() {
				Some(Neighbor { id, payload, .. }) => payload.into_item(id, MAX_SCORE),
				None => fabricate_item(record),
			},
			Err(err) => {
				warn!(error = %err, title = %record.title, "Title resolution failed.");

				fabricate_item(record)
			},
		}
	}
}

fn fabricate_item(record: DiscoveredRecord) -> MediaItem {
	let image = placeholder_image(&record.title);

	MediaItem {
		id: MediaId::ephemeral(),
		title: record.title,
		description: record.description.unwrap_or_default(),
		kind: record.kind.unwrap_or_default(),
		rating: record.rating,
		image: Some(image),
		score: MAX_SCORE,
	}
}

fn build_discovery_messages(query: &str, candidate_count: u32) -> Vec<Value> {
	let system = "You are a recommendation engine for movies, TV shows, and anime. \
Reply with a raw JSON array and nothing else: no prose, no markdown fences. \
Each element is an object with the keys title, description, rating, and type.";
	let user = format!(
		"Return a JSON array of {candidate_count} recommendations closely matching: {query}"
	);

	vec![
		json!({ "role": "system", "content": system }),
		json!({ "role": "user", "content": user }),
	]
}

/// Tolerant parse of the model reply. Fences and surrounding prose are
/// stripped; elements that are bare strings become title-only records;
/// anything unusable is dropped.
fn parse_discovery_records(content: &str) -> Vec<DiscoveredRecord> {
	let cleaned = content.replace("```json", "").replace("```", "");
	let Some(array_text) = extract_bracketed_array(&cleaned) else {
		return Vec::new();
	};
	let Ok(value) = serde_json::from_str::<Value>(array_text) else {
		return Vec::new();
	};
	let Some(elements) = value.as_array() else {
		return Vec::new();
	};

	elements.iter().filter_map(record_from_value).collect()
}

fn extract_bracketed_array(text: &str) -> Option<&str> {
	let start = text.find('[')?;
	let end = text.rfind(']')?;

	(end > start).then(|| &text[start..=end])
}

fn record_from_value(value: &Value) -> Option<DiscoveredRecord> {
	match value {
		Value::String(title) => {
			let title = title.trim();

			(!title.is_empty()).then(|| DiscoveredRecord {
				title: title.to_string(),
				description: None,
				rating: None,
				kind: None,
			})
		},
		Value::Object(fields) => {
			let title = fields.get("title")?.as_str()?.trim();

			if title.is_empty() {
				return None;
			}

			Some(DiscoveredRecord {
				title: title.to_string(),
				description: fields
					.get("description")
					.and_then(Value::as_str)
					.map(str::to_string),
				rating: fields.get("rating").and_then(rating_from_value),
				kind: fields
					.get("type")
					.and_then(Value::as_str)
					.map(MediaKind::from_label),
			})
		},
		_ => None,
	}
}

fn rating_from_value(value: &Value) -> Option<f32> {
	match value {
		Value::Number(num) => num.as_f64().map(|rating| rating as f32),
		Value::String(text) => text.trim().parse().ok(),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_fences_and_surrounding_prose() {
		let content = "Sure! Here you go:\n```json\n[{\"title\": \"Akira\"}]\n```\nEnjoy.";
		let records = parse_discovery_records(content);

		assert_eq!(records.len(), 1);
		assert_eq!(records[0].title, "Akira");
	}

	#[test]
	fn accepts_bare_title_strings() {
		let records = parse_discovery_records(r#"["Akira", "  ", "Paprika"]"#);

		assert_eq!(records.len(), 2);
		assert_eq!(records[0].title, "Akira");
		assert_eq!(records[1].title, "Paprika");
	}

	#[test]
	fn parses_full_records_with_string_ratings() {
		let content = r#"[{"title": "Dark", "description": "Time travel.", "rating": "8.7", "type": "TV Show"}]"#;
		let records = parse_discovery_records(content);

		assert_eq!(records.len(), 1);
		assert_eq!(records[0].description.as_deref(), Some("Time travel."));
		assert_eq!(records[0].rating, Some(8.7));
		assert_eq!(records[0].kind, Some(MediaKind::Tv));
	}

	#[test]
	fn unusable_replies_parse_to_nothing() {
		assert!(parse_discovery_records("I cannot help with that.").is_empty());
		assert!(parse_discovery_records("[not json]").is_empty());
		assert!(parse_discovery_records("{\"title\": \"Akira\"}").is_empty());
	}

	#[test]
	fn prompt_carries_the_query_and_count() {
		let messages = build_discovery_messages("slow sci-fi", 7);

		assert_eq!(messages.len(), 2);
		assert_eq!(messages[0]["role"], "system");

		let user = messages[1]["content"].as_str().unwrap();

		assert!(user.contains('7'));
		assert!(user.contains("slow sci-fi"));
	}
}
