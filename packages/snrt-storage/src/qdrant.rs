use std::collections::HashMap;

use qdrant_client::{
	Qdrant,
	qdrant::{
		Condition, DatetimeRange, Filter, PointId, Query, QueryPoints, QueryPointsBuilder,
		ReadConsistencyType, ScoredPoint, Timestamp, Value, point_id::PointIdOptions,
		read_consistency, value::Kind,
	},
};
use serde_json::{Map, Value as JsonValue};
use time::{Date, Month};

use crate::{
	Error, Result,
	models::{ContentRecord, RecordId, scalar_text},
};
use snrt_domain::{
	FilterPredicate,
	filter::{DATE_FIELD, TYPE_FIELD},
};

pub struct QdrantStore {
	pub client: Qdrant,
	pub collection: String,
	pub vector_field: Option<String>,
}
impl QdrantStore {
	pub fn new(cfg: &snrt_config::Storage) -> Result<Self> {
		let client = Qdrant::from_url(&cfg.url).api_key(cfg.api_key.clone()).build()?;

		Ok(Self {
			client,
			collection: cfg.collection.clone(),
			vector_field: cfg.vector_field.clone(),
		})
	}

	pub async fn search(
		&self,
		vector: &[f32],
		top_k: u32,
		filter: Option<&FilterPredicate>,
	) -> Result<Vec<ContentRecord>> {
		let request =
			query_request(&self.collection, self.vector_field.as_deref(), vector, top_k, filter)?;
		let response = self.client.query(request).await?;

		response.result.into_iter().map(record_from_point).collect()
	}
}

/// Nearest-neighbour query with payload, read at `All` consistency.
fn query_request(
	collection: &str,
	vector_field: Option<&str>,
	vector: &[f32],
	top_k: u32,
	filter: Option<&FilterPredicate>,
) -> Result<QueryPoints> {
	let mut search = QueryPointsBuilder::new(collection)
		.query(Query::new_nearest(vector.to_vec()))
		.limit(top_k as u64)
		.with_payload(true)
		.read_consistency(read_consistency::Value::Type(ReadConsistencyType::All as i32));

	if let Some(field) = vector_field {
		search = search.using(field);
	}
	if let Some(predicate) = filter {
		search = search.filter(predicate_filter(predicate)?);
	}

	Ok(search.build())
}

/// Qdrant has no string prefix match, so the year prefix becomes a calendar-year range over the
/// `date` payload, which must be indexed or stored as an RFC 3339 date.
pub fn predicate_filter(predicate: &FilterPredicate) -> Result<Filter> {
	let year = i32::from(predicate.year());
	let range = DatetimeRange {
		gte: Some(year_start(year)?),
		lt: Some(year_start(year + 1)?),
		gt: None,
		lte: None,
	};

	Ok(Filter::all([
		Condition::datetime_range(DATE_FIELD, range),
		Condition::matches(TYPE_FIELD, predicate.content_type().as_str().to_string()),
	]))
}

fn year_start(year: i32) -> Result<Timestamp> {
	let date = Date::from_calendar_date(year, Month::January, 1)
		.map_err(|err| Error::InvalidFilter(err.to_string()))?;
	let start = date.midnight().assume_utc();

	Ok(Timestamp { seconds: start.unix_timestamp(), nanos: 0 })
}

fn record_from_point(point: ScoredPoint) -> Result<ContentRecord> {
	let id = point
		.id
		.as_ref()
		.and_then(point_record_id)
		.ok_or_else(|| Error::InvalidResponse("Qdrant point is missing an id.".to_string()))?;
	let payload = point.payload;

	Ok(ContentRecord {
		id,
		score: point.score,
		content_type: payload_text(&payload, "type"),
		title: payload_text(&payload, "title"),
		description: payload_text(&payload, "description"),
		date: payload_text(&payload, "date"),
		time: payload_text(&payload, "time"),
		extra: payload.get("extra").map(to_json).filter(|value| !value.is_null()),
	})
}

fn point_record_id(point_id: &PointId) -> Option<RecordId> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Num(id)) => Some(RecordId::from(*id)),
		Some(PointIdOptions::Uuid(id)) => Some(RecordId::Text(id.clone())),
		None => None,
	}
}

fn payload_text(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	scalar_text(&to_json(payload.get(key)?))
}

fn to_json(value: &Value) -> JsonValue {
	match &value.kind {
		Some(Kind::BoolValue(flag)) => JsonValue::Bool(*flag),
		Some(Kind::IntegerValue(number)) => JsonValue::from(*number),
		Some(Kind::DoubleValue(number)) => JsonValue::from(*number),
		Some(Kind::StringValue(text)) => JsonValue::String(text.clone()),
		Some(Kind::ListValue(list)) => JsonValue::Array(list.values.iter().map(to_json).collect()),
		Some(Kind::StructValue(object)) => {
			let fields: Map<String, JsonValue> =
				object.fields.iter().map(|(key, value)| (key.clone(), to_json(value))).collect();

			JsonValue::Object(fields)
		},
		Some(Kind::NullValue(_)) | None => JsonValue::Null,
	}
}
