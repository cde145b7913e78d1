use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, SearchService, format::format_response};
use snrt_domain::{Intent, filter};
use snrt_storage::models::ContentRecord;

/// Number of records requested from the content index per query.
pub const SEARCH_TOP_K: u32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
	pub intent: Intent,
	pub confidence: f32,
	pub intent_description: String,
	pub query: String,
	pub results: Vec<ContentRecord>,
}

impl SearchService {
	#[tracing::instrument(name = "search", skip_all, fields(request_id = %Uuid::new_v4()))]
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let query = req.query.as_str();
		let classification = self.classify(query).await;
		let intent = classification.intent();

		tracing::info!(
			intent = %intent,
			confidence = classification.confidence(),
			fallback = classification.is_fallback(),
			"Classified query intent."
		);

		let vector = self.embed_query(query).await?;
		let predicate = filter::build_filter(intent, query);

		match predicate.as_ref() {
			Some(predicate) => tracing::info!(filter = %predicate, "Applying metadata filter."),
			None => tracing::info!("No metadata filter applied."),
		}

		let results = self
			.searcher
			.search(&vector, SEARCH_TOP_K, predicate.as_ref())
			.await
			.map_err(Error::from)?;

		tracing::info!(result_count = results.len(), "Content search completed.");

		Ok(format_response(
			intent,
			classification.confidence(),
			classification.rationale(),
			results,
			query,
		))
	}

	async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
		let cfg = &self.cfg.providers.embedding;
		let texts = [query.to_string()];
		let vectors = self.providers.embedding.embed(cfg, &texts).await?;
		let Some(vector) = vectors.into_iter().next() else {
			return Err(Error::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};

		if vector.len() != self.cfg.storage.vector_dim as usize {
			return Err(Error::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}

		Ok(vector)
	}
}
