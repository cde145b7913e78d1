use std::sync::Arc;

use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::{Map, Value};
use tower::util::ServiceExt;

use snrt_api::{routes, state::AppState};
use snrt_config::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Providers as ProviderConfigs,
	SearchBackend, Service, Storage,
};
use snrt_domain::FilterPredicate;
use snrt_service::{
	BoxFuture, ClassifierProvider, ContentSearcher, EmbeddingProvider, Providers, SearchService,
};
use snrt_storage::models::{ContentRecord, RecordId};

const VECTOR_DIM: u32 = 3;

struct StubEmbedding {
	fail: bool,
}
impl EmbeddingProvider for StubEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, snrt_providers::Result<Vec<Vec<f32>>>> {
		let result = if self.fail {
			Err(snrt_providers::Error::InvalidResponse {
				message: "embedding backend unavailable".to_string(),
			})
		} else {
			Ok(vec![vec![0.5; VECTOR_DIM as usize]; texts.len()])
		};

		Box::pin(async move { result })
	}
}

struct StubClassifier;
impl ClassifierProvider for StubClassifier {
	fn classify<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, snrt_providers::Result<Value>> {
		Box::pin(async {
			Ok(serde_json::json!({
				"intent": "match_score",
				"confidence": 0.9,
				"reasoning": "Score d'un match passé."
			}))
		})
	}
}

struct StubSearcher {
	fail: bool,
}
impl ContentSearcher for StubSearcher {
	fn search<'a>(
		&'a self,
		_vector: &'a [f32],
		_top_k: u32,
		_filter: Option<&'a FilterPredicate>,
	) -> BoxFuture<'a, snrt_storage::Result<Vec<ContentRecord>>> {
		let result = if self.fail {
			Err(snrt_storage::Error::InvalidResponse("index offline".to_string()))
		} else {
			Ok(vec![ContentRecord {
				id: RecordId::Num(42),
				score: 0.87,
				content_type: Some("match".to_string()),
				title: Some("Wydad - Raja".to_string()),
				description: Some("Derby de Casablanca.".to_string()),
				date: Some("2017-10-29".to_string()),
				time: Some("19:00".to_string()),
				extra: Some(serde_json::json!({ "stadium": "Mohammed V" })),
			}])
		};

		Box::pin(async move { result })
	}
}

fn test_config() -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			backend: SearchBackend::Milvus,
			url: "http://127.0.0.1:19530".to_string(),
			collection: "content_items".to_string(),
			vector_field: None,
			vector_dim: VECTOR_DIM,
			nprobe: 10,
			api_key: None,
		},
		providers: ProviderConfigs {
			embedding: EmbeddingProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				model: "test".to_string(),
				dimensions: VECTOR_DIM,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			classifier: LlmProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/".to_string(),
				model: "test".to_string(),
				temperature: 0.2,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
	}
}

fn app(embedding_fails: bool, search_fails: bool) -> axum::Router {
	let providers = Providers::new(
		Arc::new(StubEmbedding { fail: embedding_fails }),
		Arc::new(StubClassifier),
	);
	let service = SearchService::with_providers(
		test_config(),
		Arc::new(StubSearcher { fail: search_fails }),
		providers,
	);

	routes::router(AppState::with_service(service))
}

fn search_request(body: &str) -> Request<Body> {
	Request::builder()
		.method("POST")
		.uri("/search")
		.header("content-type", "application/json")
		.body(Body::from(body.to_string()))
		.expect("Failed to build request.")
}

async fn json_body(response: axum::response::Response) -> Value {
	let bytes =
		body::to_bytes(response.into_body(), usize::MAX).await.expect("Failed to read body.");

	serde_json::from_slice(&bytes).expect("Body is not JSON.")
}

#[tokio::test]
async fn health_ok() {
	let response = app(false, false)
		.oneshot(Request::builder().uri("/health").body(Body::empty()).expect("Bad request."))
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn root_reports_service_name() {
	let response = app(false, false)
		.oneshot(Request::builder().uri("/").body(Body::empty()).expect("Bad request."))
		.await
		.expect("Failed to call /.");

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(
		json_body(response).await,
		serde_json::json!({ "message": "SNRT Semantic Search API" })
	);
}

#[tokio::test]
async fn search_returns_classified_results() {
	let response = app(false, false)
		.oneshot(search_request(r#"{"query":"résultat match wydad 2017"}"#))
		.await
		.expect("Failed to call /search.");

	assert_eq!(response.status(), StatusCode::OK);

	let json = json_body(response).await;

	assert_eq!(json["intent"], "match_score");
	assert_eq!(json["intent_description"], "Score d'un match passé.");
	assert_eq!(json["query"], "résultat match wydad 2017");
	assert_eq!(json["results"][0]["id"], 42);
	assert_eq!(json["results"][0]["type"], "match");
	assert_eq!(json["results"][0]["time"], "19:00");
	assert_eq!(json["results"][0]["extra"]["stadium"], "Mohammed V");

	let confidence = json["confidence"].as_f64().expect("confidence must be a number");

	assert!((confidence - 0.9).abs() < 1e-6);
}

#[tokio::test]
async fn embedding_failure_maps_to_bad_gateway() {
	let response = app(true, false)
		.oneshot(search_request(r#"{"query":"match"}"#))
		.await
		.expect("Failed to call /search.");

	assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
	assert_eq!(
		json_body(response).await,
		serde_json::json!({
			"error_code": "PROVIDER_ERROR",
			"message": "embedding backend unavailable",
		})
	);
}

#[tokio::test]
async fn search_failure_maps_to_bad_gateway() {
	let response = app(false, true)
		.oneshot(search_request(r#"{"query":"match"}"#))
		.await
		.expect("Failed to call /search.");

	assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
	assert_eq!(json_body(response).await["error_code"], "SEARCH_BACKEND_ERROR");
}

#[tokio::test]
async fn missing_query_is_unprocessable() {
	let response = app(false, false)
		.oneshot(search_request(r#"{"text":"match"}"#))
		.await
		.expect("Failed to call /search.");

	assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
