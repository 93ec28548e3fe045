use reel_domain::{MediaId, MediaPayload};
use time::OffsetDateTime;

/// One nearest-neighbor or keyword hit from the catalog store.
///
/// `similarity` is absent for keyword hits and for points whose reported
/// score is unusable; the assembler substitutes its configured fallback.
#[derive(Debug, Clone)]
pub struct Neighbor {
	pub id: MediaId,
	pub similarity: Option<f32>,
	pub payload: MediaPayload,
}

/// A stored vector-indexed catalog record.
#[derive(Debug, Clone)]
pub struct CatalogPoint {
	pub id: MediaId,
	pub vector: Option<Vec<f32>>,
	pub payload: MediaPayload,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WishlistRow {
	pub user_id: String,
	pub media_id: String,
	pub added_at: OffsetDateTime,
}
