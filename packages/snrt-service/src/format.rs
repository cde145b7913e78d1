use crate::SearchResponse;
use snrt_domain::Intent;
use snrt_storage::models::ContentRecord;

/// Assembles the response payload. Results keep the searcher's order and count.
pub fn format_response(
	intent: Intent,
	confidence: f32,
	intent_description: &str,
	search_results: Vec<ContentRecord>,
	query: &str,
) -> SearchResponse {
	SearchResponse {
		intent,
		confidence,
		intent_description: intent_description.to_string(),
		query: query.to_string(),
		results: search_results,
	}
}
