use std::collections::HashMap;

use qdrant_client::qdrant::{
	Condition, CreateCollectionBuilder, Distance, Filter, GetPointsBuilder, PointId, PointStruct,
	Query, QueryPointsBuilder, RetrievedPoint, ScoredPoint, ScrollPointsBuilder,
	UpsertPointsBuilder, Value, VectorParamsBuilder, VectorsOutput, point_id::PointIdOptions,
	value::Kind, vectors_output::VectorsOptions,
};
use tracing::warn;

use reel_domain::{MediaId, MediaKind, MediaPayload};

use crate::{
	Result,
	models::{CatalogPoint, Neighbor},
};

/// Read-mostly access to the vector-indexed media catalog.
pub struct CatalogStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl CatalogStore {
	pub fn new(cfg: &reel_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Nearest neighbors of `vector` in descending similarity order.
	pub async fn nearest(&self, vector: &[f32], limit: u64) -> Result<Vec<Neighbor>> {
		let request = QueryPointsBuilder::new(&self.collection)
			.query(Query::new_nearest(vector.to_vec()))
			.limit(limit)
			.with_payload(true);
		let response = self.client.query(request).await?;

		Ok(response.result.into_iter().filter_map(scored_neighbor).collect())
	}

	/// Full-text match against the `title` payload field.
	pub async fn match_text(&self, text: &str, limit: u32) -> Result<Vec<Neighbor>> {
		let filter = Filter::should([Condition::matches_text("title", text)]);
		let request = ScrollPointsBuilder::new(&self.collection)
			.filter(filter)
			.limit(limit)
			.with_payload(true);
		let response = self.client.scroll(request).await?;

		Ok(response.result.into_iter().filter_map(retrieved_neighbor).collect())
	}

	/// Retrieves one stored point, vector included. Ephemeral identifiers
	/// address nothing in the catalog and resolve to `None` without a call.
	pub async fn fetch(&self, id: &MediaId) -> Result<Option<CatalogPoint>> {
		let Some(point_id) = media_to_point_id(id) else {
			return Ok(None);
		};
		let request = GetPointsBuilder::new(&self.collection, vec![point_id])
			.with_vectors(true)
			.with_payload(true);
		let response = self.client.get_points(request).await?;

		Ok(response.result.into_iter().filter_map(retrieved_catalog_point).next())
	}

	/// Retrieves several stored points by id, payload only.
	pub async fn fetch_many(&self, ids: &[MediaId]) -> Result<Vec<CatalogPoint>> {
		let point_ids: Vec<PointId> = ids.iter().filter_map(media_to_point_id).collect();

		if point_ids.is_empty() {
			return Ok(Vec::new());
		}

		let request =
			GetPointsBuilder::new(&self.collection, point_ids).with_payload(true);
		let response = self.client.get_points(request).await?;

		Ok(response.result.into_iter().filter_map(retrieved_catalog_point).collect())
	}

	/// Drops and recreates the collection with the configured dimension.
	pub async fn recreate_collection(&self) -> Result<()> {
		if self.client.collection_exists(&self.collection).await? {
			self.client.delete_collection(&self.collection).await?;
		}

		self.client
			.create_collection(
				CreateCollectionBuilder::new(&self.collection).vectors_config(
					VectorParamsBuilder::new(self.vector_dim as u64, Distance::Cosine),
				),
			)
			.await?;

		Ok(())
	}

	pub async fn upsert_batch(&self, points: Vec<PointStruct>) -> Result<()> {
		self.client
			.upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
			.await?;

		Ok(())
	}
}

/// Maps a catalog identifier onto a Qdrant point id. Numeric identifiers come
/// from CSV ingestion; everything else is treated as a UUID string.
pub fn media_to_point_id(id: &MediaId) -> Option<PointId> {
	match id {
		MediaId::Catalog(raw) => Some(match raw.parse::<u64>() {
			Ok(num) => PointId::from(num),
			Err(_) => PointId::from(raw.clone()),
		}),
		MediaId::Ephemeral(_) => None,
	}
}

fn point_id_to_media(id: &PointId) -> Option<MediaId> {
	match id.point_id_options.as_ref()? {
		PointIdOptions::Num(num) => Some(MediaId::catalog(num.to_string())),
		PointIdOptions::Uuid(raw) => Some(MediaId::catalog(raw.clone())),
	}
}

fn scored_neighbor(point: ScoredPoint) -> Option<Neighbor> {
	let Some(id) = point.id.as_ref().and_then(point_id_to_media) else {
		warn!("Skipping catalog point without an id.");

		return None;
	};
	let Some(payload) = decode_payload(&point.payload) else {
		warn!(id = %id, "Skipping catalog point without a title payload.");

		return None;
	};
	let similarity =
		if point.score.is_finite() && point.score > 0.0 { Some(point.score) } else { None };

	Some(Neighbor { id, similarity, payload })
}

fn retrieved_neighbor(point: RetrievedPoint) -> Option<Neighbor> {
	let id = point.id.as_ref().and_then(point_id_to_media)?;
	let payload = decode_payload(&point.payload)?;

	Some(Neighbor { id, similarity: None, payload })
}

fn retrieved_catalog_point(point: RetrievedPoint) -> Option<CatalogPoint> {
	let id = point.id.as_ref().and_then(point_id_to_media)?;
	let payload = decode_payload(&point.payload)?;
	let vector = point.vectors.and_then(point_vector);

	Some(CatalogPoint { id, vector, payload })
}

/// Projects the stored payload onto the typed item attributes. Fields beyond
/// the known set are dropped here, at the client boundary.
fn decode_payload(payload: &HashMap<String, Value>) -> Option<MediaPayload> {
	let title = payload_str(payload, "title").filter(|title| !title.trim().is_empty())?;

	Some(MediaPayload {
		title,
		description: payload_str(payload, "description").unwrap_or_default(),
		kind: payload_str(payload, "type")
			.map(|label| MediaKind::from_label(&label))
			.unwrap_or_default(),
		rating: payload_f32(payload, "rating"),
		image: payload_str(payload, "image").filter(|url| !url.trim().is_empty()),
	})
}

fn payload_str(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	match payload.get(key)?.kind.as_ref()? {
		Kind::StringValue(text) => Some(text.clone()),
		_ => None,
	}
}

fn payload_f32(payload: &HashMap<String, Value>, key: &str) -> Option<f32> {
	match payload.get(key)?.kind.as_ref()? {
		Kind::DoubleValue(value) => Some(*value as f32),
		Kind::IntegerValue(value) => Some(*value as f32),
		Kind::StringValue(text) => text.trim().parse().ok(),
		_ => None,
	}
}

fn point_vector(vectors: VectorsOutput) -> Option<Vec<f32>> {
	match vectors.vectors_options? {
		VectorsOptions::Vector(vector) => Some(vector.data),
		VectorsOptions::Vectors(named) => named.vectors.into_values().next().map(|v| v.data),
	}
}
