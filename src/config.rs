// src/config.rs
//! Runtime configuration: the reference profile, cache settings, and the
//! declarative per-source scraping table.

use crate::types::Language;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Fixed résumé summary used as the similarity baseline. Process-wide
/// constant, never mutated.
pub const REFERENCE_PROFILE: &str = "Strategic Program Manager with over 10 years of experience in global cloud initiatives (AWS, GCP), Agile transformation (Scrum, SAFe), and leading cross-functional teams. Expert in cloud migrations, CI/CD automation, and cloud governance. Certified AWS Solutions Architect and Scrum Master.";

/// Cache freshness window.
pub const CACHE_TTL: Duration = Duration::from_secs(4 * 60 * 60);

/// How a source's results page is retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Headless-browser navigation, for sources behind anti-bot JS.
    Browser,
    /// Plain HTTP GET with a desktop user agent.
    Http,
}

/// CSS selectors applied to a fetched results page.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorSet {
    pub container: String,
    pub title: String,
    pub company: String,
    pub link: String,
}

/// Session cookie injected before browser navigation. The value comes from
/// an environment variable; when it is absent the source degrades to an
/// unauthenticated fetch instead of failing startup.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub domain: String,
    pub env_var: String,
    #[serde(skip)]
    pub value: Option<String>,
}

impl SessionCookie {
    fn resolve(&mut self) {
        match std::env::var(&self.env_var) {
            Ok(v) if v.len() > 10 => self.value = Some(v),
            _ => {
                warn!(
                    "{} not set or too short, {} fetch will be unauthenticated",
                    self.env_var, self.domain
                );
            }
        }
    }
}

/// One external job-listing provider.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    pub lang: Language,
    pub fetch: FetchMode,
    pub selectors: SelectorSet,
    /// Selector the browser fetch waits for before reading the page.
    pub wait_selector: Option<String>,
    pub session_cookie: Option<SessionCookie>,
}

#[derive(Debug, Deserialize)]
struct SourcesFile {
    sources: Vec<SourceConfig>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub reference_profile: String,
    pub cache_path: PathBuf,
    pub cache_ttl: Duration,
    pub sources: Vec<SourceConfig>,
}

impl AppConfig {
    /// Load configuration: built-in source table, overridable with a
    /// sources.toml file (path from JOBRADAR_SOURCES, default ./sources.toml).
    pub fn load() -> Result<Self> {
        let sources_path = std::env::var("JOBRADAR_SOURCES")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("sources.toml"));

        let mut sources = if sources_path.exists() {
            info!("Loading source table from {}", sources_path.display());
            let content = std::fs::read_to_string(&sources_path)
                .with_context(|| format!("Failed to read {}", sources_path.display()))?;
            let file: SourcesFile = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", sources_path.display()))?;
            file.sources
        } else {
            default_sources()
        };

        for source in &mut sources {
            if let Some(cookie) = source.session_cookie.as_mut() {
                cookie.resolve();
            }
        }

        info!(
            "Configured sources: {}",
            sources
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            reference_profile: REFERENCE_PROFILE.to_string(),
            cache_path: std::env::temp_dir().join("jobradar-cache.json"),
            cache_ttl: CACHE_TTL,
            sources,
        })
    }

    pub fn source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name == name)
    }
}

/// Built-in source table. LinkedIn needs a headless browser (and ideally a
/// li_at session cookie); OCC and Computrabajo answer plain GETs.
pub fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            name: "linkedin".to_string(),
            url: "https://www.linkedin.com/jobs/search/?keywords=program%20manager%20cloud%20agile&location=Mexico&f_TPR=r604800&f_WT=2&geoId=103323332&sortBy=DD".to_string(),
            lang: Language::En,
            fetch: FetchMode::Browser,
            selectors: SelectorSet {
                container: "ul.jobs-search__results-list li".to_string(),
                title: "h3.base-search-card__title".to_string(),
                company: "h4.base-search-card__subtitle".to_string(),
                link: "a.base-card__full-link".to_string(),
            },
            wait_selector: Some("ul.jobs-search__results-list li".to_string()),
            session_cookie: Some(SessionCookie {
                name: "li_at".to_string(),
                domain: ".linkedin.com".to_string(),
                env_var: "LINKEDIN_SESSION_COOKIE".to_string(),
                value: None,
            }),
        },
        SourceConfig {
            name: "occ".to_string(),
            url: "https://www.occ.com.mx/empleos/de-program-manager/".to_string(),
            lang: Language::Es,
            fetch: FetchMode::Http,
            selectors: SelectorSet {
                container: "div[id^=\"jobcard\"]".to_string(),
                title: "h2.text-lg".to_string(),
                company: "span.line-clamp-1".to_string(),
                link: "a[href*=\"/empleo/oferta/\"]".to_string(),
            },
            wait_selector: None,
            session_cookie: None,
        },
        SourceConfig {
            name: "computrabajo".to_string(),
            url: "https://mx.computrabajo.com/trabajo-de-program-manager".to_string(),
            lang: Language::Es,
            fetch: FetchMode::Http,
            selectors: SelectorSet {
                container: "article.box_offer".to_string(),
                title: "h2.fs18 a.js-o-link".to_string(),
                company: "p.dIB.fs16 a.fc_base".to_string(),
                link: "h2.fs18 a.js-o-link".to_string(),
            },
            wait_selector: None,
            session_cookie: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_cover_all_platforms() {
        let sources = default_sources();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["linkedin", "occ", "computrabajo"]);
    }

    #[test]
    fn test_sources_file_parses() {
        let toml_src = r#"
            [[sources]]
            name = "linkedin"
            url = "https://www.linkedin.com/jobs/search/"
            lang = "en"
            fetch = "browser"
            wait_selector = "ul.jobs-search__results-list li"

            [sources.selectors]
            container = "ul.jobs-search__results-list li"
            title = "h3.base-search-card__title"
            company = "h4.base-search-card__subtitle"
            link = "a.base-card__full-link"

            [sources.session_cookie]
            name = "li_at"
            domain = ".linkedin.com"
            env_var = "LINKEDIN_SESSION_COOKIE"
        "#;

        let file: SourcesFile = toml::from_str(toml_src).unwrap();
        assert_eq!(file.sources.len(), 1);
        assert_eq!(file.sources[0].fetch, FetchMode::Browser);
        assert_eq!(file.sources[0].lang, Language::En);
        assert!(file.sources[0].session_cookie.is_some());
    }
}
