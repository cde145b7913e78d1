use std::collections::HashMap;

use qdrant_client::{
	client::Payload,
	qdrant::{PointStruct, UpsertPointsBuilder, Value},
};
use serde_json::{Value as JsonValue, json};

use snrt_domain::{ContentType, FilterPredicate};
use snrt_storage::{models::RecordId, qdrant::QdrantStore};
use snrt_testkit::TestCollection;

fn payload(value: JsonValue) -> Payload {
	let map: HashMap<String, Value> = value
		.as_object()
		.expect("Payload must be an object.")
		.iter()
		.map(|(key, value)| (key.clone(), Value::from(value.clone())))
		.collect();

	Payload::from(map)
}

fn storage_config(url: &str, collection: &str) -> snrt_config::Storage {
	snrt_config::Storage {
		backend: snrt_config::SearchBackend::Qdrant,
		url: url.to_string(),
		collection: collection.to_string(),
		vector_field: None,
		vector_dim: 3,
		nprobe: 10,
		api_key: None,
	}
}

async fn seeded_collection(url: &str) -> TestCollection {
	let collection = TestCollection::new(url, "snrt_content", 3)
		.await
		.expect("Failed to create test collection.");
	let points = vec![
		PointStruct::new(
			1,
			vec![1.0, 0.0, 0.0],
			payload(json!({
				"type": "match",
				"title": "Wydad 2 - 1 Raja",
				"date": "2017-05-14T00:00:00Z",
				"time": "20:00",
			})),
		),
		PointStruct::new(
			2,
			vec![0.9, 0.1, 0.0],
			payload(json!({
				"type": "video",
				"title": "Résumé Wydad - Raja",
				"date": "2017-05-15T00:00:00Z",
			})),
		),
		PointStruct::new(
			3,
			vec![0.8, 0.2, 0.0],
			payload(json!({
				"type": "match",
				"title": "Wydad 0 - 0 FAR",
				"date": "2019-02-03T00:00:00Z",
			})),
		),
	];

	collection
		.client()
		.upsert_points(UpsertPointsBuilder::new(collection.name(), points).wait(true))
		.await
		.expect("Failed to upsert test points.");

	collection
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set SNRT_QDRANT_URL to run."]
async fn unfiltered_search_ranks_by_similarity() {
	let Some(url) = snrt_testkit::env_qdrant_url() else {
		eprintln!("Skipping unfiltered_search_ranks_by_similarity; set SNRT_QDRANT_URL.");

		return;
	};
	let collection = seeded_collection(&url).await;
	let store = QdrantStore::new(&storage_config(&url, collection.name()))
		.expect("Failed to build Qdrant store.");
	let records = store.search(&[1.0, 0.0, 0.0], 3, None).await.expect("Search failed.");

	assert_eq!(records.len(), 3);
	assert_eq!(records[0].id, RecordId::Num(1));
	assert!(records.windows(2).all(|pair| pair[0].score >= pair[1].score));

	collection.cleanup().await.expect("Failed to cleanup test collection.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set SNRT_QDRANT_URL to run."]
async fn filtered_search_keeps_year_and_type() {
	let Some(url) = snrt_testkit::env_qdrant_url() else {
		eprintln!("Skipping filtered_search_keeps_year_and_type; set SNRT_QDRANT_URL.");

		return;
	};
	let collection = seeded_collection(&url).await;
	let store = QdrantStore::new(&storage_config(&url, collection.name()))
		.expect("Failed to build Qdrant store.");
	let predicate = FilterPredicate::new(2017, ContentType::Match);
	let records =
		store.search(&[1.0, 0.0, 0.0], 3, Some(&predicate)).await.expect("Search failed.");

	assert_eq!(records.len(), 1);
	assert_eq!(records[0].title.as_deref(), Some("Wydad 2 - 1 Raja"));
	assert_eq!(records[0].time.as_deref(), Some("20:00"));

	collection.cleanup().await.expect("Failed to cleanup test collection.");
}
