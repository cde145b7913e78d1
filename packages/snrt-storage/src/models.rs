use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
	Num(i64),
	Text(String),
}
impl From<u64> for RecordId {
	fn from(id: u64) -> Self {
		i64::try_from(id).map(Self::Num).unwrap_or_else(|_| Self::Text(id.to_string()))
	}
}

/// One ranked hit from the content index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
	pub id: RecordId,
	pub score: f32,
	#[serde(rename = "type")]
	pub content_type: Option<String>,
	pub title: Option<String>,
	pub description: Option<String>,
	pub date: Option<String>,
	pub time: Option<String>,
	pub extra: Option<Value>,
}

/// Text view of a scalar payload value. Dates and times are sometimes stored as numbers.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(flag) => Some(flag.to_string()),
		_ => None,
	}
}
