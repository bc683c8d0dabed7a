// src/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Language a source publishes its listings in. Drives template selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
}

impl Language {
    /// Parse a language tag, falling back to Spanish for anything unknown.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_lowercase().as_str() {
            "en" | "english" => Language::En,
            _ => Language::Es,
        }
    }
}

/// One scraped job posting, enriched with a relevance score and an
/// outreach message before it is cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub company: String,
    pub url: String,
    pub lang: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recruiter_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recruiter_email: Option<String>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Listing {
    pub fn new(title: String, company: String, url: String, lang: Language) -> Self {
        Self {
            title,
            company,
            url,
            lang,
            recruiter_name: None,
            recruiter_email: None,
            match_score: None,
            message: None,
        }
    }

    /// Extraction keeps only complete records.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.company.is_empty() && !self.url.is_empty()
    }
}

/// Per-source listing collections, keyed by source name. Insertion order
/// inside each collection is extraction order.
pub type SourceCollections = BTreeMap<String, Vec<Listing>>;

/// Full multi-source snapshot from a single scrape pass. All-or-nothing:
/// there is no per-source invalidation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub collections: SourceCollections,
    pub written_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(collections: SourceCollections) -> Self {
        Self {
            collections,
            written_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_tag() {
        assert_eq!(Language::from_tag("en"), Language::En);
        assert_eq!(Language::from_tag("English"), Language::En);
        assert_eq!(Language::from_tag("es"), Language::Es);
        assert_eq!(Language::from_tag("de"), Language::Es);
        assert_eq!(Language::from_tag(""), Language::Es);
    }

    #[test]
    fn test_listing_completeness() {
        let listing = Listing::new(
            "Program Manager".to_string(),
            "Acme".to_string(),
            "https://example.com/jobs/1".to_string(),
            Language::En,
        );
        assert!(listing.is_complete());

        let missing_company = Listing::new(
            "Program Manager".to_string(),
            String::new(),
            "https://example.com/jobs/1".to_string(),
            Language::En,
        );
        assert!(!missing_company.is_complete());
    }

    #[test]
    fn test_listing_score_serializes_as_match() {
        let mut listing = Listing::new(
            "Program Manager".to_string(),
            "Acme".to_string(),
            "https://example.com/jobs/1".to_string(),
            Language::En,
        );
        listing.match_score = Some(87);

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["match"], 87);
        assert!(json.get("message").is_none());
    }
}
