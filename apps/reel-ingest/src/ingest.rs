use std::path::Path;

use csv::ReaderBuilder;
use qdrant_client::{Payload, qdrant::PointStruct};
use serde::Deserialize;
use tracing::{info, warn};

use reel_config::Config;
use reel_domain::MediaKind;
use reel_storage::qdrant::CatalogStore;

const BATCH_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
pub struct CsvRow {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub description: String,
	#[serde(default, rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub rating: String,
	#[serde(default)]
	pub image: String,
	#[serde(default)]
	pub genre: String,
	#[serde(default)]
	pub year: String,
}

/// Embeds every row and uploads the points in batches. Rows that cannot be
/// read or embedded are counted and skipped; a bad row never aborts the run.
pub async fn run_ingest(
	cfg: &Config,
	store: &CatalogStore,
	csv_path: &Path,
	recreate: bool,
) -> color_eyre::Result<()> {
	if recreate {
		info!(collection = %store.collection, "Recreating the collection.");
		store.recreate_collection().await?;
	}

	let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_path(csv_path)?;
	let mut batch: Vec<PointStruct> = Vec::with_capacity(BATCH_SIZE);
	let mut next_id: u64 = 0;
	let mut ingested: u64 = 0;
	let mut failed: u64 = 0;

	for record in reader.deserialize::<CsvRow>() {
		let row = match record {
			Ok(row) if !row.title.trim().is_empty() => row,
			Ok(_) => {
				failed += 1;

				continue;
			},
			Err(err) => {
				warn!(error = %err, "Skipping unreadable row.");

				failed += 1;

				continue;
			},
		};
		let id = next_id;

		next_id += 1;

		let kind = corrected_kind(&row);
		let text = search_text(&row, kind);
		let vector = match reel_providers::embedding::embed(&cfg.providers.embedding, &text).await {
			Ok(vector) => vector,
			Err(err) => {
				warn!(error = %err, title = %row.title, "Embedding failed; row skipped.");

				failed += 1;

				continue;
			},
		};

		batch.push(build_point(id, vector, &row, kind));

		ingested += 1;

		if batch.len() >= BATCH_SIZE {
			store.upsert_batch(std::mem::take(&mut batch)).await?;

			info!(ingested, "Uploaded batch.");
		}
	}

	if !batch.is_empty() {
		store.upsert_batch(batch).await?;
	}

	info!(ingested, failed, "Ingestion finished.");

	Ok(())
}

/// Genre text overrides the declared type column for the kinds it can name.
fn corrected_kind(row: &CsvRow) -> MediaKind {
	MediaKind::from_genre(&row.genre).unwrap_or_else(|| MediaKind::from_label(&row.kind))
}

fn search_text(row: &CsvRow, kind: MediaKind) -> String {
	format!("{} {} {} {}", row.title, row.description, row.genre, kind.as_label())
}

fn build_point(id: u64, vector: Vec<f32>, row: &CsvRow, kind: MediaKind) -> PointStruct {
	let mut payload = Payload::new();

	payload.insert("title", row.title.clone());
	payload.insert("description", row.description.clone());
	payload.insert("type", kind.as_label());

	if let Ok(rating) = row.rating.trim().parse::<f64>() {
		payload.insert("rating", rating);
	}
	if !row.image.trim().is_empty() {
		payload.insert("image", row.image.clone());
	}
	if !row.genre.trim().is_empty() {
		payload.insert("genre", row.genre.clone());
	}
	if !row.year.trim().is_empty() {
		payload.insert("year", row.year.clone());
	}

	PointStruct::new(id, vector, payload)
}
