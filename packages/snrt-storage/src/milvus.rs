use reqwest::Client;
use serde_json::Value;

use crate::{
	Error, OUTPUT_FIELDS, Result,
	models::{ContentRecord, RecordId, scalar_text},
};
use snrt_domain::FilterPredicate;

pub const DEFAULT_ANNS_FIELD: &str = "embedding";

const SEARCH_PATH: &str = "/v2/vectordb/entities/search";

/// Milvus RESTful v2 client. Filter predicates are sent verbatim as boolean expressions.
pub struct MilvusStore {
	client: Client,
	url: String,
	pub collection: String,
	pub anns_field: String,
	pub nprobe: u32,
	api_key: Option<String>,
}
impl MilvusStore {
	pub fn new(cfg: &snrt_config::Storage) -> Result<Self> {
		let client = Client::builder().build()?;

		Ok(Self {
			client,
			url: cfg.url.trim_end_matches('/').to_string(),
			collection: cfg.collection.clone(),
			anns_field: cfg
				.vector_field
				.clone()
				.unwrap_or_else(|| DEFAULT_ANNS_FIELD.to_string()),
			nprobe: cfg.nprobe,
			api_key: cfg.api_key.clone(),
		})
	}

	pub async fn search(
		&self,
		vector: &[f32],
		top_k: u32,
		filter: Option<&FilterPredicate>,
	) -> Result<Vec<ContentRecord>> {
		let body = self.search_body(vector, top_k, filter);
		let mut request = self.client.post(format!("{}{SEARCH_PATH}", self.url)).json(&body);

		if let Some(key) = self.api_key.as_deref() {
			request = request.bearer_auth(key);
		}

		let json: Value = request.send().await?.error_for_status()?.json().await?;

		parse_search_response(json)
	}

	fn search_body(&self, vector: &[f32], top_k: u32, filter: Option<&FilterPredicate>) -> Value {
		let mut body = serde_json::json!({
			"collectionName": self.collection,
			"data": [vector],
			"annsField": self.anns_field,
			"limit": top_k,
			"outputFields": OUTPUT_FIELDS,
			"searchParams": {
				"metricType": "COSINE",
				"params": { "nprobe": self.nprobe },
			},
			"consistencyLevel": "Strong",
		});

		if let Some(predicate) = filter {
			body["filter"] = Value::String(predicate.expression());
		}

		body
	}
}

fn parse_search_response(json: Value) -> Result<Vec<ContentRecord>> {
	let code = json.get("code").and_then(Value::as_i64).unwrap_or(0);

	if code != 0 {
		let message =
			json.get("message").and_then(Value::as_str).unwrap_or("unknown error").to_string();

		return Err(Error::Milvus { code, message });
	}

	let data = json
		.get("data")
		.and_then(Value::as_array)
		.ok_or_else(|| Error::InvalidResponse("Milvus response is missing data array.".to_string()))?;

	data.iter().map(record_from_hit).collect()
}

fn record_from_hit(hit: &Value) -> Result<ContentRecord> {
	let id = match hit.get("id") {
		Some(Value::Number(number)) => number.as_i64().map(RecordId::Num),
		Some(Value::String(text)) => Some(RecordId::Text(text.clone())),
		_ => None,
	}
	.ok_or_else(|| Error::InvalidResponse("Milvus hit is missing an id.".to_string()))?;
	let score = hit
		.get("distance")
		.or_else(|| hit.get("score"))
		.and_then(Value::as_f64)
		.ok_or_else(|| Error::InvalidResponse("Milvus hit is missing a distance.".to_string()))?;
	let text = |key: &str| hit.get(key).and_then(scalar_text);

	Ok(ContentRecord {
		id,
		score: score as f32,
		content_type: text("type"),
		title: text("title"),
		description: text("description"),
		date: text("date"),
		time: text("time"),
		extra: hit.get("extra").filter(|value| !value.is_null()).cloned(),
	})
}
