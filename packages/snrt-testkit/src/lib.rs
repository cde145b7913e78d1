mod error;

pub use error::{Error, Result};

use std::{env, thread, time::Duration};

use qdrant_client::{
	Qdrant,
	qdrant::{CreateCollectionBuilder, Distance, VectorParamsBuilder},
};
use tokio::{runtime::Builder, time};
use uuid::Uuid;

pub const QDRANT_URL_ENV: &str = "SNRT_QDRANT_URL";

/// A uniquely named Qdrant collection that is dropped when the value goes out of scope.
pub struct TestCollection {
	client: Qdrant,
	url: String,
	name: String,
	cleaned: bool,
}
impl TestCollection {
	pub async fn new(qdrant_url: &str, prefix: &str, vector_dim: u64) -> Result<Self> {
		let client = Qdrant::from_url(qdrant_url).build()?;
		let name = format!("{prefix}_{}", Uuid::new_v4().simple());
		let builder = CreateCollectionBuilder::new(name.clone())
			.vectors_config(VectorParamsBuilder::new(vector_dim, Distance::Cosine));

		time::timeout(Duration::from_secs(10), client.create_collection(builder))
			.await
			.map_err(|_| Error::Message("Qdrant create_collection timed out.".to_string()))??;

		Ok(Self { client, url: qdrant_url.to_string(), name, cleaned: false })
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn client(&self) -> &Qdrant {
		&self.client
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_collection(&self.client, &self.name).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestCollection {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let url = self.url.clone();
		let name = self.name.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test collection cleanup failed: {err}.");

					return;
				},
			};
			if let Err(err) = runtime.block_on(drop_collection_at(&url, &name)) {
				eprintln!("Test Qdrant cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

pub fn env_qdrant_url() -> Option<String> {
	env::var(QDRANT_URL_ENV).ok()
}

async fn drop_collection_at(url: &str, name: &str) -> Result<()> {
	let client = Qdrant::from_url(url).build()?;

	drop_collection(&client, name).await
}

async fn drop_collection(client: &Qdrant, name: &str) -> Result<()> {
	let max_attempts = 4;
	let mut backoff = Duration::from_millis(100);

	for attempt in 1..=max_attempts {
		let result =
			time::timeout(Duration::from_secs(10), client.delete_collection(name.to_string())).await;

		match result {
			Ok(Ok(_)) => return Ok(()),
			Ok(Err(err)) =>
				if attempt == max_attempts {
					return Err(Error::Message(format!(
						"Failed to delete Qdrant collection {name:?} after {attempt} attempts: {err}."
					)));
				},
			Err(_) =>
				if attempt == max_attempts {
					return Err(Error::Message(format!(
						"Timed out deleting Qdrant collection {name:?} after {attempt} attempts."
					)));
				},
		}

		time::sleep(backoff).await;

		backoff = backoff.saturating_mul(2).min(Duration::from_secs(2));
	}

	Ok(())
}
