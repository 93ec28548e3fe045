use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use reel_domain::{MediaId, MediaItem};
use reel_storage::models::CatalogPoint;

use crate::{RecService, ServiceError, ServiceResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItemRequest {
	pub user_id: String,
	pub id: MediaId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistListRequest {
	pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistAck {
	pub status: String,
}
impl WishlistAck {
	pub fn ok() -> Self {
		Self { status: "ok".to_string() }
	}
}

impl RecService {
	/// Saves a catalog item. Ephemeral identifiers are refused outright:
	/// they address nothing that survives the request.
	pub async fn wishlist_add(&self, req: WishlistItemRequest) -> ServiceResult<WishlistAck> {
		let user_id = validated_user(&req.user_id)?;

		if req.id.is_ephemeral() {
			return Err(ServiceError::InvalidRequest {
				message: "Ephemeral items cannot be saved to a wishlist.".to_string(),
			});
		}

		self.db.add_wishlist(user_id, &req.id.to_string()).await?;

		Ok(WishlistAck::ok())
	}

	/// Removing an absent pair is a no-op success.
	pub async fn wishlist_remove(&self, req: WishlistItemRequest) -> ServiceResult<WishlistAck> {
		let user_id = validated_user(&req.user_id)?;

		self.db.remove_wishlist(user_id, &req.id.to_string()).await?;

		Ok(WishlistAck::ok())
	}

	/// Saved items hydrated from the catalog, oldest first. Entries the
	/// catalog no longer carries are silently omitted; scores are zero since
	/// no ranking question was asked.
	pub async fn wishlist_list(&self, req: WishlistListRequest) -> ServiceResult<Vec<MediaItem>> {
		let user_id = validated_user(&req.user_id)?;
		let rows = self.db.list_wishlist(user_id).await?;
		let ids: Vec<MediaId> = rows.iter().map(|row| MediaId::parse(&row.media_id)).collect();

		if ids.is_empty() {
			return Ok(Vec::new());
		}

		let points = match self.backends.catalog.fetch_many(&ids).await {
			Ok(points) => points,
			Err(err) => {
				warn!(error = %err, "Wishlist hydration failed; returning an empty list.");

				Vec::new()
			},
		};

		Ok(hydrate_in_order(&ids, points))
	}
}

/// The store answers batched lookups in its own order; reimpose the rows'
/// `added_at` order here.
fn hydrate_in_order(ids: &[MediaId], points: Vec<CatalogPoint>) -> Vec<MediaItem> {
	let mut by_id: HashMap<MediaId, CatalogPoint> =
		points.into_iter().map(|point| (point.id.clone(), point)).collect();

	ids.iter()
		.filter_map(|id| by_id.remove(id))
		.map(|point| point.payload.into_item(point.id, 0))
		.collect()
}

fn validated_user(user_id: &str) -> ServiceResult<&str> {
	let trimmed = user_id.trim();

	if trimmed.is_empty() {
		return Err(ServiceError::InvalidRequest { message: "user_id is required.".to_string() });
	}

	Ok(trimmed)
}
