pub mod milvus;
pub mod models;
pub mod qdrant;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Payload fields returned with every hit, in response order.
pub const OUTPUT_FIELDS: [&str; 7] =
	["id", "type", "title", "description", "date", "time", "extra"];
