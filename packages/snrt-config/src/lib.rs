mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Providers, SearchBackend, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind", "must be non-empty."));
	}
	if cfg.storage.url.trim().is_empty() {
		return Err(Error::invalid("storage.url", "must be non-empty."));
	}
	if cfg.storage.collection.trim().is_empty() {
		return Err(Error::invalid("storage.collection", "must be non-empty."));
	}
	if cfg.storage.vector_dim == 0 {
		return Err(Error::invalid("storage.vector_dim", "must be greater than zero."));
	}
	if cfg.storage.nprobe == 0 {
		return Err(Error::invalid("storage.nprobe", "must be greater than zero."));
	}
	if cfg.providers.embedding.dimensions != cfg.storage.vector_dim {
		return Err(Error::invalid(
			"providers.embedding.dimensions",
			"must match storage.vector_dim.",
		));
	}
	if cfg.providers.embedding.api_key.trim().is_empty() {
		return Err(Error::invalid("providers.embedding.api_key", "must be non-empty."));
	}

	for (field, timeout_ms) in [
		("providers.embedding.timeout_ms", cfg.providers.embedding.timeout_ms),
		("providers.classifier.timeout_ms", cfg.providers.classifier.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::invalid(field, "must be greater than zero."));
		}
	}

	let temperature = cfg.providers.classifier.temperature;

	if !temperature.is_finite() {
		return Err(Error::invalid("providers.classifier.temperature", "must be a finite number."));
	}
	if !(0.0..=2.0).contains(&temperature) {
		return Err(Error::invalid(
			"providers.classifier.temperature",
			"must be in the range 0.0-2.0.",
		));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.storage.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.storage.api_key = None;
	}
	if cfg.storage.vector_field.as_deref().map(|field| field.trim().is_empty()).unwrap_or(false) {
		cfg.storage.vector_field = None;
	}

	cfg.providers.classifier.api_key = cfg.providers.classifier.api_key.trim().to_string();
}
