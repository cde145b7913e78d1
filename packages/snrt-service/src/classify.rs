use serde_json::Value;

use crate::SearchService;
use snrt_domain::{Classification, ClassificationFailure, Intent, intent};

const SYSTEM_PROMPT_HEADER: &str = "\
Tu es un classificateur d'intention expert pour SNRT (Société Nationale de Radiodiffusion et de Télévision du Maroc).
Ta tâche est d'analyser la requête de l'utilisateur et de la classer dans l'une des catégories prédéfinies.

Tu dois renvoyer ta réponse sous forme d'objet JSON avec trois clés :";
const SYSTEM_PROMPT_RULES: &str = "
Instructions spécifiques pour la classification :

1. Détection temporelle et sportive :
   - Si la requête contient une année (ex: 2017, 2022) ou une référence temporelle passée (hier, la semaine dernière) ET des termes liés au sport (match, score, Wydad, Raja, football), l'intention est très probablement \"match_score\". Attribue une confiance élevée (0.8-1.0) dans ce cas.
   - Si la requête contient une référence temporelle future (demain, la semaine prochaine) ET des termes liés au sport, l'intention est probablement \"match_schedule\".

2. Termes sportifs courants :
   - Les mots comme \"match\", \"score\", \"résultat\", \"Wydad\", \"Raja\", \"WAC\", \"FAR\" sont des indicateurs forts d'intentions liées au sport.
   - La présence d'années ou de dates est un indicateur fort pour \"match_score\".

3. Général :
   - Si la requête est ambiguë ou ne correspond clairement à aucune catégorie, utilise \"generic_search\" avec une confiance basse (0.3-0.5).
   - La confiance doit refléter la certitude de la classification (0.0-1.0).

Ta réponse doit être uniquement l'objet JSON, sans texte supplémentaire avant ou après.
";

impl SearchService {
	/// Never fails: every provider or parsing problem resolves to [`Classification::Fallback`].
	pub async fn classify(&self, query: &str) -> Classification {
		let result = self.classify_inner(query).await;

		match &result {
			Ok(decision) =>
				if let Some(raw) = decision.invalid_confidence.as_deref() {
					tracing::warn!(
						query,
						confidence = raw,
						"Invalid confidence value in classifier response."
					);
				},
			Err(failure) => {
				tracing::warn!(
					query,
					error = %failure,
					"Intent classification failed; using fallback."
				);
			},
		}

		Classification::from(result)
	}

	async fn classify_inner(
		&self,
		query: &str,
	) -> Result<intent::IntentDecision, ClassificationFailure> {
		let cfg = &self.cfg.providers.classifier;

		if cfg.api_key.trim().is_empty() {
			return Err(ClassificationFailure::MissingCredentials);
		}

		let messages = build_messages(query);
		let json = self
			.providers
			.classifier
			.classify(cfg, &messages)
			.await
			.map_err(|err| match err {
				snrt_providers::Error::SerdeJson(inner) =>
					ClassificationFailure::MalformedResponse { message: inner.to_string() },
				snrt_providers::Error::InvalidResponse { message } =>
					ClassificationFailure::MalformedResponse { message },
				other => ClassificationFailure::Provider { message: other.to_string() },
			})?;

		intent::parse_decision(&json)
	}
}

pub fn system_prompt() -> String {
	let keys = Intent::ALL.iter().map(|intent| intent.as_str()).collect::<Vec<_>>().join(", ");
	let mut prompt = String::from(SYSTEM_PROMPT_HEADER);

	prompt.push_str(&format!(
		"
- \"intent\" : l'identifiant de la catégorie (doit être l'une des clés suivantes: {keys})
- \"confidence\" : un nombre décimal entre 0.0 et 1.0
- \"reasoning\" : une brève explication en français pour ta classification

Voici les intentions disponibles :
"
	));

	for intent in Intent::ALL {
		prompt.push_str(&format!("- {}: {}\n", intent.as_str(), intent.description()));
	}

	prompt.push_str(SYSTEM_PROMPT_RULES);

	prompt
}

pub fn build_messages(query: &str) -> Vec<Value> {
	vec![
		serde_json::json!({ "role": "system", "content": system_prompt() }),
		serde_json::json!({
			"role": "user",
			"content": format!("Requête utilisateur : \"{query}\"\n\nClassifie cette requête."),
		}),
	]
}
