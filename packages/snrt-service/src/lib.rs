pub mod classify;
pub mod format;
pub mod search;

mod error;

pub use error::{Error, Result};
pub use format::format_response;
pub use search::{SEARCH_TOP_K, SearchRequest, SearchResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use snrt_config::{Config, EmbeddingProviderConfig, LlmProviderConfig, SearchBackend};
use snrt_domain::FilterPredicate;
use snrt_providers::{classifier, embedding};
use snrt_storage::{milvus::MilvusStore, models::ContentRecord, qdrant::QdrantStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, snrt_providers::Result<Vec<Vec<f32>>>>;
}

/// Chat model used for intent classification. Returns the JSON object the model answered with.
pub trait ClassifierProvider
where
	Self: Send + Sync,
{
	fn classify<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, snrt_providers::Result<Value>>;
}

pub trait ContentSearcher
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		vector: &'a [f32],
		top_k: u32,
		filter: Option<&'a FilterPredicate>,
	) -> BoxFuture<'a, snrt_storage::Result<Vec<ContentRecord>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub classifier: Arc<dyn ClassifierProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		classifier: Arc<dyn ClassifierProvider>,
	) -> Self {
		Self { embedding, classifier }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), classifier: provider }
	}
}

pub struct SearchService {
	pub cfg: Config,
	pub searcher: Arc<dyn ContentSearcher>,
	pub providers: Providers,
}
impl SearchService {
	pub fn new(cfg: Config, searcher: Arc<dyn ContentSearcher>) -> Self {
		Self { cfg, searcher, providers: Providers::default() }
	}

	pub fn with_providers(
		cfg: Config,
		searcher: Arc<dyn ContentSearcher>,
		providers: Providers,
	) -> Self {
		Self { cfg, searcher, providers }
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, snrt_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}
impl ClassifierProvider for DefaultProviders {
	fn classify<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, snrt_providers::Result<Value>> {
		Box::pin(classifier::complete_json(cfg, messages))
	}
}

impl ContentSearcher for QdrantStore {
	fn search<'a>(
		&'a self,
		vector: &'a [f32],
		top_k: u32,
		filter: Option<&'a FilterPredicate>,
	) -> BoxFuture<'a, snrt_storage::Result<Vec<ContentRecord>>> {
		Box::pin(QdrantStore::search(self, vector, top_k, filter))
	}
}

impl ContentSearcher for MilvusStore {
	fn search<'a>(
		&'a self,
		vector: &'a [f32],
		top_k: u32,
		filter: Option<&'a FilterPredicate>,
	) -> BoxFuture<'a, snrt_storage::Result<Vec<ContentRecord>>> {
		Box::pin(MilvusStore::search(self, vector, top_k, filter))
	}
}

/// Builds the searcher selected by `storage.backend`.
pub fn connect_searcher(cfg: &snrt_config::Storage) -> Result<Arc<dyn ContentSearcher>> {
	let searcher: Arc<dyn ContentSearcher> = match cfg.backend {
		SearchBackend::Qdrant => Arc::new(QdrantStore::new(cfg)?),
		SearchBackend::Milvus => Arc::new(MilvusStore::new(cfg)?),
	};

	Ok(searcher)
}
