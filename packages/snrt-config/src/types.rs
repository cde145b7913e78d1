use std::fmt::{Display, Formatter};

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchBackend {
	Qdrant,
	Milvus,
}
impl SearchBackend {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Qdrant => "qdrant",
			Self::Milvus => "milvus",
		}
	}
}
impl Display for SearchBackend {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub backend: SearchBackend,
	pub url: String,
	pub collection: String,
	/// Named vector for Qdrant, ANNS field for Milvus. Qdrant collections with a single unnamed
	/// vector leave this unset.
	pub vector_field: Option<String>,
	pub vector_dim: u32,
	#[serde(default = "default_nprobe")]
	pub nprobe: u32,
	pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub classifier: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// May be empty. Requests are then answered with the classification fallback.
	#[serde(default)]
	pub api_key: String,
	pub path: String,
	pub model: String,
	#[serde(default = "default_classifier_temperature")]
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_nprobe() -> u32 {
	10
}

fn default_classifier_temperature() -> f32 {
	0.2
}
