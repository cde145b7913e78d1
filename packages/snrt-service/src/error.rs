pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Search backend error: {message}")]
	Search { message: String },
}
impl From<snrt_providers::Error> for Error {
	fn from(err: snrt_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<snrt_storage::Error> for Error {
	fn from(err: snrt_storage::Error) -> Self {
		Self::Search { message: err.to_string() }
	}
}
