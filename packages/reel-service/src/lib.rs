pub mod discover;
pub mod recommend;
pub mod similar;
pub mod wishlist;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use reel_config::{Config, DiscoveryProviderConfig, EmbeddingProviderConfig};
use reel_domain::MediaId;
pub use recommend::{RecommendMode, RecommendRequest};
use reel_storage::{
	db::Db,
	models::{CatalogPoint, Neighbor},
	qdrant::CatalogStore,
};
pub use similar::SimilarRequest;
pub use wishlist::{WishlistAck, WishlistItemRequest, WishlistListRequest};

pub type ServiceResult<T> = Result<T, ServiceError>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, reel_providers::Result<Vec<f32>>>;
}

pub trait DiscoveryProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a DiscoveryProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, reel_providers::Result<String>>;
}

/// Catalog reads behind a seam so the pipeline can be exercised without a
/// running vector store.
pub trait CatalogIndex
where
	Self: Send + Sync,
{
	fn nearest<'a>(
		&'a self,
		vector: &'a [f32],
		limit: u64,
	) -> BoxFuture<'a, reel_storage::Result<Vec<Neighbor>>>;

	fn match_text<'a>(
		&'a self,
		text: &'a str,
		limit: u32,
	) -> BoxFuture<'a, reel_storage::Result<Vec<Neighbor>>>;

	fn fetch<'a>(
		&'a self,
		id: &'a MediaId,
	) -> BoxFuture<'a, reel_storage::Result<Option<CatalogPoint>>>;

	fn fetch_many<'a>(
		&'a self,
		ids: &'a [MediaId],
	) -> BoxFuture<'a, reel_storage::Result<Vec<CatalogPoint>>>;
}

/// Errors that surface to callers. Provider and catalog failures never do;
/// the pipeline degrades to smaller or empty result lists instead.
#[derive(Debug)]
pub enum ServiceError {
	InvalidRequest { message: String },
	Storage { message: String },
}

#[derive(Clone)]
pub struct Backends {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub discovery: Arc<dyn DiscoveryProvider>,
	pub catalog: Arc<dyn CatalogIndex>,
}

pub struct RecService {
	pub cfg: Config,
	pub db: Db,
	pub backends: Backends,
}

struct DefaultProviders;

impl std::fmt::Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::Storage { message } => write!(f, "Storage error: {message}"),
		}
	}
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<reel_storage::Error> for ServiceError {
	fn from(err: reel_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, reel_providers::Result<Vec<f32>>> {
		Box::pin(reel_providers::embedding::embed(cfg, text))
	}
}

impl DiscoveryProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a DiscoveryProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, reel_providers::Result<String>> {
		Box::pin(reel_providers::chat::complete(cfg, messages))
	}
}

impl CatalogIndex for CatalogStore {
	fn nearest<'a>(
		&'a self,
		vector: &'a [f32],
		limit: u64,
	) -> BoxFuture<'a, reel_storage::Result<Vec<Neighbor>>> {
		Box::pin(CatalogStore::nearest(self, vector, limit))
	}

	fn match_text<'a>(
		&'a self,
		text: &'a str,
		limit: u32,
	) -> BoxFuture<'a, reel_storage::Result<Vec<Neighbor>>> {
		Box::pin(CatalogStore::match_text(self, text, limit))
	}

	fn fetch<'a>(
		&'a self,
		id: &'a MediaId,
	) -> BoxFuture<'a, reel_storage::Result<Option<CatalogPoint>>> {
		Box::pin(CatalogStore::fetch(self, id))
	}

	fn fetch_many<'a>(
		&'a self,
		ids: &'a [MediaId],
	) -> BoxFuture<'a, reel_storage::Result<Vec<CatalogPoint>>> {
		Box::pin(CatalogStore::fetch_many(self, ids))
	}
}

impl Backends {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		discovery: Arc<dyn DiscoveryProvider>,
		catalog: Arc<dyn CatalogIndex>,
	) -> Self {
		Self { embedding, discovery, catalog }
	}

	pub fn with_catalog(catalog: Arc<dyn CatalogIndex>) -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), discovery: provider, catalog }
	}
}

impl RecService {
	pub fn new(cfg: Config, db: Db, catalog: CatalogStore) -> Self {
		Self { cfg, db, backends: Backends::with_catalog(Arc::new(catalog)) }
	}

	pub fn with_backends(cfg: Config, db: Db, backends: Backends) -> Self {
		Self { cfg, db, backends }
	}
}
