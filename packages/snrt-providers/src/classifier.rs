use serde_json::Value;

use crate::{Error, Result};

/// Sends a chat completion in JSON mode and returns the decoded JSON object the model produced.
pub async fn complete_json(
	cfg: &snrt_config::LlmProviderConfig,
	messages: &[Value],
) -> Result<Value> {
	if cfg.api_key.is_empty() {
		return Err(Error::InvalidConfig { message: "Classifier api_key is empty.".to_string() });
	}

	let client = crate::http_client(cfg.timeout_ms)?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
		"response_format": { "type": "json_object" },
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion_json(json)
}

fn parse_completion_json(json: Value) -> Result<Value> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::invalid_response("Completion response is missing message content."))?;
	let parsed: Value = serde_json::from_str(content.trim())?;

	if !parsed.is_object() {
		return Err(Error::invalid_response("Completion content is not a JSON object."));
	}

	Ok(parsed)
}
