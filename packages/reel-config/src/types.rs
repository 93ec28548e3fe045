use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub recommend: Recommend,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub discovery: DiscoveryProviderConfig,
}

/// Embedding provider endpoint. A missing `api_key` is an expected, permanent
/// condition: the pipeline routes around the provider instead of failing.
#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub api_base: String,
	pub path: String,
	pub model: String,
	#[serde(default)]
	pub api_key: Option<String>,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default = "default_retry_attempts")]
	pub retry_attempts: u32,
	#[serde(default = "default_retry_delay_ms")]
	pub retry_delay_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct DiscoveryProviderConfig {
	pub api_base: String,
	pub path: String,
	pub model: String,
	#[serde(default)]
	pub api_key: Option<String>,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default = "default_candidate_count")]
	pub candidate_count: u32,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Result-assembly tunables. Scores live on the 0-100 confidence scale.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Recommend {
	pub quota: u32,
	pub neighbor_overfetch: u32,
	pub keyword_fallback_score: u8,
	pub missing_similarity_score: u8,
	pub similar_score: u8,
}
impl Default for Recommend {
	fn default() -> Self {
		Self {
			quota: 12,
			neighbor_overfetch: 5,
			keyword_fallback_score: 80,
			missing_similarity_score: 65,
			similar_score: 95,
		}
	}
}

fn default_retry_attempts() -> u32 {
	3
}

fn default_retry_delay_ms() -> u64 {
	3_000
}

fn default_candidate_count() -> u32 {
	10
}
