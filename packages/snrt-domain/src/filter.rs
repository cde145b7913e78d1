use std::{
	fmt::{Display, Formatter},
	sync::LazyLock,
};

use regex::Regex;
use serde::Serialize;

use crate::intent::Intent;

/// Checked before [`ARTICLE_KEYWORDS`]. A keyword matches where a word of the lower-cased query
/// starts with it, so plurals match and `clip` does not match inside `eclipse`.
pub const VIDEO_KEYWORDS: &[&str] = &[
	"vidéo",
	"video",
	"revoir",
	"replay",
	"regarder",
	"visionner",
	"highlights",
	"extraits",
	"en images",
	"watch",
	"clip",
	"streaming",
];
pub const ARTICLE_KEYWORDS: &[&str] = &[
	"article",
	"analyse",
	"analysis",
	"chronique",
	"compte rendu",
	"compte-rendu",
	"éditorial",
	"editorial",
	"à lire",
	"dépêche",
];

pub const DATE_FIELD: &str = "date";
pub const TYPE_FIELD: &str = "type";

static YEAR_PATTERN: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"\b(?:19|20)[0-9]{2}\b").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
	Video,
	Article,
	Match,
}
impl ContentType {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Video => "video",
			Self::Article => "article",
			Self::Match => "match",
		}
	}
}
impl Display for ContentType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// `date` starts with `year` AND `type` equals `content_type`.
///
/// [`Display`] renders the boolean expression accepted by Milvus, e.g.
/// `date LIKE "2017%" AND type == "match"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterPredicate {
	year: u16,
	content_type: ContentType,
}
impl FilterPredicate {
	pub fn new(year: u16, content_type: ContentType) -> Self {
		Self { year, content_type }
	}

	pub fn year(&self) -> u16 {
		self.year
	}

	pub fn content_type(&self) -> ContentType {
		self.content_type
	}

	pub fn date_clause(&self) -> String {
		format!("{DATE_FIELD} LIKE \"{}%\"", self.year)
	}

	pub fn type_clause(&self) -> String {
		format!("{TYPE_FIELD} == \"{}\"", self.content_type)
	}

	pub fn expression(&self) -> String {
		format!("{} AND {}", self.date_clause(), self.type_clause())
	}
}
impl Display for FilterPredicate {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.expression())
	}
}

/// Derives the metadata filter for a query. Only score lookups that name a year are filtered.
pub fn build_filter(intent: Intent, query: &str) -> Option<FilterPredicate> {
	if intent != Intent::MatchScore {
		return None;
	}

	let year = extract_year(query)?;
	let content_type = detect_content_type(query).unwrap_or(ContentType::Match);

	Some(FilterPredicate::new(year, content_type))
}

/// First `19xx`/`20xx` token in the query, scanning left to right.
pub fn extract_year(query: &str) -> Option<u16> {
	let pattern = YEAR_PATTERN.as_ref()?;

	pattern.find(query).and_then(|m| m.as_str().parse().ok())
}

pub fn detect_content_type(query: &str) -> Option<ContentType> {
	let lowered = query.to_lowercase();

	if VIDEO_KEYWORDS.iter().any(|keyword| starts_word(&lowered, keyword)) {
		return Some(ContentType::Video);
	}
	if ARTICLE_KEYWORDS.iter().any(|keyword| starts_word(&lowered, keyword)) {
		return Some(ContentType::Article);
	}

	None
}

fn starts_word(text: &str, keyword: &str) -> bool {
	text.match_indices(keyword).any(|(start, _)| {
		text[..start].chars().next_back().is_none_or(|prev| !prev.is_alphanumeric())
	})
}
