use reqwest::header::AUTHORIZATION;
use serde_json::Map;

#[test]
fn builds_bearer_auth_header() {
	let headers =
		snrt_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn includes_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-request-source".to_string(), serde_json::json!("snrt-search"));

	let headers =
		snrt_providers::auth_headers("secret", &defaults).expect("Failed to build headers.");

	assert_eq!(headers.get("x-request-source").expect("Missing default header."), "snrt-search");
}

#[test]
fn rejects_non_string_default_header() {
	let mut defaults = Map::new();

	defaults.insert("x-retries".to_string(), serde_json::json!(3));

	let err = snrt_providers::auth_headers("secret", &defaults)
		.expect_err("Expected non-string header to be rejected.");

	assert!(matches!(err, snrt_providers::Error::InvalidConfig { .. }), "Unexpected error: {err}");
}

fn unreachable_classifier() -> snrt_config::LlmProviderConfig {
	snrt_config::LlmProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:1".to_string(),
		api_key: "test-key".to_string(),
		path: "/v1/chat/completions".to_string(),
		model: "test".to_string(),
		temperature: 0.2,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

#[tokio::test]
async fn classifier_without_api_key_fails_before_sending() {
	let mut cfg = unreachable_classifier();

	cfg.api_key = String::new();

	let err = snrt_providers::classifier::complete_json(&cfg, &[])
		.await
		.expect_err("Expected missing key to fail.");

	assert!(matches!(err, snrt_providers::Error::InvalidConfig { .. }), "Unexpected error: {err}");
}

#[tokio::test]
async fn unreachable_classifier_reports_transport_error() {
	let cfg = unreachable_classifier();
	let err = snrt_providers::classifier::complete_json(&cfg, &[])
		.await
		.expect_err("Expected connection failure.");

	assert!(matches!(err, snrt_providers::Error::Reqwest(_)), "Unexpected error: {err}");
}
