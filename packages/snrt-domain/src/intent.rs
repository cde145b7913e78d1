use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FALLBACK_CONFIDENCE: f32 = 0.5;
pub const FALLBACK_RATIONALE: &str =
	"Erreur lors de la classification de l'intention. Recherche générique effectuée.";
pub const MISSING_RATIONALE: &str = "L'LLM n'a pas fourni de justification.";
/// Used when the model answers with a confidence that is present but not a number.
pub const INVALID_CONFIDENCE: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
	MatchSchedule,
	MatchScore,
	LatestNews,
	ProgramInformation,
	GenericSearch,
}
impl Intent {
	pub const ALL: [Self; 5] = [
		Self::MatchSchedule,
		Self::MatchScore,
		Self::LatestNews,
		Self::ProgramInformation,
		Self::GenericSearch,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::MatchSchedule => "match_schedule",
			Self::MatchScore => "match_score",
			Self::LatestNews => "latest_news",
			Self::ProgramInformation => "program_information",
			Self::GenericSearch => "generic_search",
		}
	}

	/// French category description shown to the classifier model.
	pub fn description(self) -> &'static str {
		match self {
			Self::MatchSchedule =>
				"L'utilisateur veut connaître la date d'un match à venir (par exemple, 'Quand est le prochain match du WAC ?').",
			Self::MatchScore =>
				"L'utilisateur cherche les résultats ou le score d'un match déjà joué, potentiellement en mentionnant une année (par exemple, 'Résultat match Wydad hier', 'match Raja 2017').",
			Self::LatestNews =>
				"L'utilisateur cherche les actualités récentes ou les dernières informations générales (par exemple, 'Quoi de neuf ?', 'Dernières actualités Arryadia').",
			Self::ProgramInformation =>
				"L'utilisateur demande des informations sur des programmes TV, des émissions, ou du contenu vidéo spécifique (par exemple, 'Montre-moi les documentaires', 'Quand est le journal télévisé ?').",
			Self::GenericSearch =>
				"L'intention de l'utilisateur n'est pas claire, est trop générale, ou ne correspond à aucune autre catégorie spécifique.",
		}
	}
}
impl Display for Intent {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for Intent {
	type Err = ClassificationFailure;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|intent| intent.as_str() == raw)
			.ok_or_else(|| ClassificationFailure::InvalidIntent { raw: raw.to_string() })
	}
}

/// Why a classification could not be produced. Every variant resolves to the same fallback
/// answer; the distinction only feeds logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationFailure {
	MissingCredentials,
	Provider { message: String },
	MalformedResponse { message: String },
	InvalidIntent { raw: String },
}
impl Display for ClassificationFailure {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::MissingCredentials => f.write_str("Classifier API key is not configured."),
			Self::Provider { message } => write!(f, "Classifier provider failed: {message}"),
			Self::MalformedResponse { message } =>
				write!(f, "Classifier response is malformed: {message}"),
			Self::InvalidIntent { raw } => write!(f, "Invalid intent category: {raw}"),
		}
	}
}
impl std::error::Error for ClassificationFailure {}

#[derive(Debug, Clone, PartialEq)]
pub struct IntentDecision {
	pub intent: Intent,
	pub confidence: f32,
	pub rationale: String,
	/// Set when the model returned a confidence that had to be replaced.
	pub invalid_confidence: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
	Classified(IntentDecision),
	Fallback { failure: ClassificationFailure },
}
impl Classification {
	pub fn intent(&self) -> Intent {
		match self {
			Self::Classified(decision) => decision.intent,
			Self::Fallback { .. } => Intent::GenericSearch,
		}
	}

	pub fn confidence(&self) -> f32 {
		match self {
			Self::Classified(decision) => decision.confidence,
			Self::Fallback { .. } => FALLBACK_CONFIDENCE,
		}
	}

	pub fn rationale(&self) -> &str {
		match self {
			Self::Classified(decision) => decision.rationale.as_str(),
			Self::Fallback { .. } => FALLBACK_RATIONALE,
		}
	}

	pub fn is_fallback(&self) -> bool {
		matches!(self, Self::Fallback { .. })
	}
}
impl From<Result<IntentDecision, ClassificationFailure>> for Classification {
	fn from(result: Result<IntentDecision, ClassificationFailure>) -> Self {
		match result {
			Ok(decision) => Self::Classified(decision),
			Err(failure) => Self::Fallback { failure },
		}
	}
}

/// Interprets the JSON object returned by the classifier model.
pub fn parse_decision(json: &Value) -> Result<IntentDecision, ClassificationFailure> {
	let obj = json.as_object().ok_or_else(|| ClassificationFailure::MalformedResponse {
		message: "classification must be a JSON object.".to_string(),
	})?;
	let (confidence, invalid_confidence) = match obj.get("confidence") {
		None => (0.0, None),
		Some(value) => match parse_confidence(value) {
			Some(confidence) => (confidence, None),
			None => (INVALID_CONFIDENCE, Some(value.to_string())),
		},
	};
	let rationale = obj
		.get("reasoning")
		.and_then(Value::as_str)
		.map(str::to_string)
		.unwrap_or_else(|| MISSING_RATIONALE.to_string());
	let intent = match obj.get("intent") {
		Some(Value::String(raw)) => raw.parse::<Intent>()?,
		Some(other) => return Err(ClassificationFailure::InvalidIntent { raw: other.to_string() }),
		None => return Err(ClassificationFailure::InvalidIntent { raw: "null".to_string() }),
	};

	Ok(IntentDecision {
		intent,
		confidence: clamp_confidence(confidence),
		rationale,
		invalid_confidence,
	})
}

pub fn clamp_confidence(value: f32) -> f32 {
	if value.is_nan() {
		return INVALID_CONFIDENCE;
	}

	value.clamp(0.0, 1.0)
}

fn parse_confidence(value: &Value) -> Option<f32> {
	let number = match value {
		Value::Number(number) => number.as_f64()?,
		Value::String(text) => text.trim().parse::<f64>().ok()?,
		_ => return None,
	};

	number.is_finite().then_some(number as f32)
}
