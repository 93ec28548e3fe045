mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, DiscoveryProviderConfig, EmbeddingProviderConfig, Postgres, Providers, Qdrant,
	Recommend, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.collection must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if cfg.providers.embedding.retry_attempts == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.retry_attempts must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.discovery.candidate_count == 0 {
		return Err(Error::Validation {
			message: "providers.discovery.candidate_count must be greater than zero.".to_string(),
		});
	}

	for (label, timeout_ms) in [
		("embedding", cfg.providers.embedding.timeout_ms),
		("discovery", cfg.providers.discovery.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("Provider {label} timeout_ms must be greater than zero."),
			});
		}
	}

	if cfg.recommend.quota == 0 {
		return Err(Error::Validation {
			message: "recommend.quota must be greater than zero.".to_string(),
		});
	}

	for (label, score) in [
		("keyword_fallback_score", cfg.recommend.keyword_fallback_score),
		("missing_similarity_score", cfg.recommend.missing_similarity_score),
		("similar_score", cfg.recommend.similar_score),
	] {
		if score > 100 {
			return Err(Error::Validation {
				message: format!("recommend.{label} must be at most 100."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.providers
		.embedding
		.api_key
		.as_deref()
		.map(|key| key.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.embedding.api_key = None;
	}
	if cfg
		.providers
		.discovery
		.api_key
		.as_deref()
		.map(|key| key.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.discovery.api_key = None;
	}
}
