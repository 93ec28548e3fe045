use std::sync::Arc;

use reel_service::RecService;
use reel_storage::{db::Db, qdrant::CatalogStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<RecService>,
}
impl AppState {
	pub async fn new(config: reel_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let catalog = CatalogStore::new(&config.storage.qdrant)?;
		let service = RecService::new(config, db, catalog);

		Ok(Self { service: Arc::new(service) })
	}

	pub fn with_service(service: RecService) -> Self {
		Self { service: Arc::new(service) }
	}
}
