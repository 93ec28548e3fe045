use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use reel_domain::{MediaId, MediaItem};
use reel_storage::models::Neighbor;

use crate::{RecService, ServiceResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarRequest {
	pub id: MediaId,
}

impl RecService {
	/// Nearest catalog neighbors of a stored item, the item itself excluded.
	///
	/// Unknown and ephemeral identifiers resolve to an empty list, as does
	/// any storage trouble along the way.
	pub async fn similar_to(&self, req: SimilarRequest) -> ServiceResult<Vec<MediaItem>> {
		if req.id.is_ephemeral() {
			debug!(id = %req.id, "Similarity lookup on an ephemeral item.");

			return Ok(Vec::new());
		}

		let quota = self.cfg.recommend.quota as usize;
		let point = match self.backends.catalog.fetch(&req.id).await {
			Ok(point) => point,
			Err(err) => {
				warn!(error = %err, "Point retrieval failed; treating the id as unknown.");

				None
			},
		};
		let Some(vector) = point.and_then(|point| point.vector) else {
			return Ok(Vec::new());
		};

		// One extra slot because the anchor itself comes back as its own
		// closest neighbor.
		let neighbors = match self.backends.catalog.nearest(&vector, (quota + 1) as u64).await {
			Ok(neighbors) => neighbors,
			Err(err) => {
				warn!(error = %err, "Neighbor search failed; treating as no matches.");

				Vec::new()
			},
		};
		let mut items = Vec::new();

		for Neighbor { id, payload, .. } in neighbors {
			if id == req.id {
				continue;
			}
			if items.len() >= quota {
				break;
			}

			items.push(payload.into_item(id, self.cfg.recommend.similar_score));
		}

		Ok(items)
	}
}
