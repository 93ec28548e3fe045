use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use reel_domain::{MediaId, MediaItem, score_from_similarity};
use reel_storage::models::Neighbor;

use crate::{RecService, ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendMode {
	#[default]
	Internal,
	Api,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
	pub text: String,
	#[serde(default)]
	pub top_k: Option<u32>,
	#[serde(default)]
	pub mode: RecommendMode,
}

impl RecService {
	/// Assembles one ranked result list for a free-text query.
	///
	/// In `api` mode discovery candidates fill the list first; the vector
	/// index backfills whatever slots remain. When embedding is unavailable
	/// the keyword index stands in at a flat confidence. Every tier is
	/// deduplicated by identity and the final list never exceeds the quota.
	pub async fn recommend(&self, req: RecommendRequest) -> ServiceResult<Vec<MediaItem>> {
		let query = req.text.trim();

		if query.is_empty() {
			return Err(ServiceError::InvalidRequest { message: "text is required.".to_string() });
		}

		let quota = req.top_k.unwrap_or(self.cfg.recommend.quota).max(1) as usize;
		let mut results: Vec<MediaItem> = Vec::new();
		let mut seen: HashSet<MediaId> = HashSet::new();

		if req.mode == RecommendMode::Api {
			for item in self.discover(query).await {
				if results.len() >= quota {
					break;
				}
				if seen.insert(item.id.clone()) {
					results.push(item);
				}
			}
		}

		let slots_needed = quota - results.len();

		if slots_needed == 0 {
			return Ok(results);
		}

		match self.backends.embedding.embed(&self.cfg.providers.embedding, query).await {
			Ok(vector) => {
				let limit = (slots_needed + self.cfg.recommend.neighbor_overfetch as usize) as u64;
				let neighbors = match self.backends.catalog.nearest(&vector, limit).await {
					Ok(neighbors) => neighbors,
					Err(err) => {
						warn!(error = %err, "Vector search failed; treating as no matches.");

						Vec::new()
					},
				};

				for neighbor in neighbors {
					if results.len() >= quota {
						break;
					}

					let score = neighbor
						.similarity
						.map(score_from_similarity)
						.unwrap_or(self.cfg.recommend.missing_similarity_score);

					push_unique(&mut results, &mut seen, neighbor, score);
				}
			},
			Err(err) => {
				if err.is_missing_credential() {
					debug!("Embedding credential not configured; using the keyword index.");
				} else {
					warn!(error = %err, "Embedding failed; using the keyword index.");
				}

				let hits = match self.backends.catalog.match_text(query, quota as u32).await {
					Ok(hits) => hits,
					Err(err) => {
						warn!(error = %err, "Keyword search failed; treating as no matches.");

						Vec::new()
					},
				};

				for hit in hits {
					if results.len() >= quota {
						break;
					}

					push_unique(&mut results, &mut seen, hit, self.cfg.recommend.keyword_fallback_score);
				}
			},
		}

		Ok(results)
	}
}

fn push_unique(
	results: &mut Vec<MediaItem>,
	seen: &mut HashSet<MediaId>,
	neighbor: Neighbor,
	score: u8,
) {
	let Neighbor { id, payload, .. } = neighbor;

	if seen.insert(id.clone()) {
		results.push(payload.into_item(id, score));
	}
}
