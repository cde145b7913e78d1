#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Qdrant(#[from] Box<qdrant_client::QdrantError>),
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error("Milvus request failed with code {code}: {message}")]
	Milvus { code: i64, message: String },
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
	#[error("Invalid filter: {0}")]
	InvalidFilter(String),
}
impl From<qdrant_client::QdrantError> for Error {
	fn from(err: qdrant_client::QdrantError) -> Self {
		Self::Qdrant(Box::new(err))
	}
}
