use std::sync::Arc;

use snrt_service::{SearchService, connect_searcher};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
}
impl AppState {
	pub fn new(config: snrt_config::Config) -> color_eyre::Result<Self> {
		let searcher = connect_searcher(&config.storage)?;
		let service = SearchService::new(config, searcher);

		Ok(Self::with_service(service))
	}

	pub fn with_service(service: SearchService) -> Self {
		Self { service: Arc::new(service) }
	}
}
