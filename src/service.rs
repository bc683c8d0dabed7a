// src/service.rs
//! Query service: answers get-by-platform requests from the cache, running
//! a full scrape pass (all sources fanned out in parallel) on a miss. One
//! implementation serves every source; per-source behavior comes from the
//! configuration table, and the fetcher/scorer collaborators are injected.

use crate::cache::ResultCache;
use crate::composer::compose;
use crate::config::{AppConfig, SourceConfig};
use crate::error::{FetchError, ServiceError};
use crate::extractor::extract;
use crate::fetcher::PageFetcher;
use crate::types::{CacheEntry, Listing, SourceCollections};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info, warn};

#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, source: &SourceConfig) -> Result<String, FetchError>;
}

#[async_trait]
impl Fetch for PageFetcher {
    async fn fetch(&self, source: &SourceConfig) -> Result<String, FetchError> {
        PageFetcher::fetch(self, source).await
    }
}

#[async_trait]
pub trait Score: Send + Sync {
    async fn score(&self, reference: &str, candidate: &str) -> u8;
}

/// Production scorer backed by the process-wide embedding model.
pub struct EmbeddingScorer;

#[async_trait]
impl Score for EmbeddingScorer {
    async fn score(&self, reference: &str, candidate: &str) -> u8 {
        crate::scorer::score(reference, candidate).await
    }
}

#[derive(Clone)]
pub struct JobService {
    config: Arc<AppConfig>,
    fetcher: Arc<dyn Fetch>,
    scorer: Arc<dyn Score>,
    cache: ResultCache,
}

impl JobService {
    pub fn new(config: AppConfig) -> Self {
        Self::with_parts(config, Arc::new(PageFetcher::new()), Arc::new(EmbeddingScorer))
    }

    pub fn with_parts(config: AppConfig, fetcher: Arc<dyn Fetch>, scorer: Arc<dyn Score>) -> Self {
        let cache = ResultCache::new(config.cache_path.clone(), config.cache_ttl);
        Self {
            config: Arc::new(config),
            fetcher,
            scorer,
            cache,
        }
    }

    /// Return one platform's listings, from cache when fresh, otherwise
    /// from a full scrape pass.
    pub async fn get_platform(&self, name: &str) -> Result<Vec<Listing>, ServiceError> {
        if self.config.source(name).is_none() {
            return Err(ServiceError::UnknownPlatform(name.to_string()));
        }

        if let Some(entry) = self.cache.read().await {
            info!("[{}] served from cache", name);
            return Ok(entry.collections.get(name).cloned().unwrap_or_default());
        }

        let entry = self.refresh().await?;
        Ok(entry.collections.get(name).cloned().unwrap_or_default())
    }

    /// Run a full scrape pass and persist the snapshot. A cache write
    /// failure is logged but the fresh result is still returned.
    pub async fn refresh(&self) -> Result<CacheEntry, ServiceError> {
        let service = self.clone();
        let entry = tokio::spawn(async move { service.scrape_all().await })
            .await
            .map_err(|e| {
                error!("Scrape pass aborted: {}", e);
                ServiceError::Upstream(e.to_string())
            })?;

        if let Err(e) = self.cache.write(&entry).await {
            warn!("Failed to persist scrape snapshot: {:#}", e);
        }

        Ok(entry)
    }

    /// Fan out the per-source pipelines and join on all of them. One slow
    /// or blocked source never prevents the others from being extracted.
    async fn scrape_all(&self) -> CacheEntry {
        let pipelines = self.config.sources.iter().map(|s| self.scrape_source(s));
        let results = join_all(pipelines).await;

        let mut collections = SourceCollections::new();
        for (source, listings) in self.config.sources.iter().zip(results) {
            collections.insert(source.name.clone(), listings);
        }

        CacheEntry::new(collections)
    }

    /// One source's pipeline: fetch, extract, score, compose. Fetch errors
    /// degrade to an empty collection.
    async fn scrape_source(&self, source: &SourceConfig) -> Vec<Listing> {
        let html = match self.fetcher.fetch(source).await {
            Ok(html) => html,
            Err(e) => {
                warn!("[{}] fetch failed, contributing empty collection: {}", source.name, e);
                return Vec::new();
            }
        };

        let mut listings = extract(&html, source);
        info!("[{}] extracted {} listings", source.name, listings.len());

        for listing in &mut listings {
            let candidate = format!(
                "Job Title: {}. Company: {}.",
                listing.title, listing.company
            );
            let score = self
                .scorer
                .score(&self.config.reference_profile, &candidate)
                .await;
            listing.match_score = Some(score);
            listing.message = Some(compose(listing, score, listing.lang));
        }

        listings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FetchMode, SelectorSet, REFERENCE_PROFILE};
    use crate::types::Language;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StubScorer(u8);

    #[async_trait]
    impl Score for StubScorer {
        async fn score(&self, _reference: &str, _candidate: &str) -> u8 {
            self.0
        }
    }

    /// Serves canned HTML per source and counts fetches; unknown sources
    /// time out.
    struct StubFetcher {
        pages: HashMap<String, String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetch for StubFetcher {
        async fn fetch(&self, source: &SourceConfig) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages
                .get(&source.name)
                .cloned()
                .ok_or(FetchError::Timeout)
        }
    }

    fn stub_source(name: &str, lang: Language) -> SourceConfig {
        SourceConfig {
            name: name.to_string(),
            url: format!("https://{}.example.com/search", name),
            lang,
            fetch: FetchMode::Http,
            selectors: SelectorSet {
                container: "li".to_string(),
                title: "h3".to_string(),
                company: "h4".to_string(),
                link: "a".to_string(),
            },
            wait_selector: None,
            session_cookie: None,
        }
    }

    fn results_page(count: usize) -> String {
        let cards: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    "<li><h3>Job {i}</h3><h4>Company {i}</h4><a href=\"https://example.com/jobs/{i}\">go</a></li>"
                )
            })
            .collect();
        format!("<html><body><ul>{}</ul></body></html>", cards.join(""))
    }

    fn test_config(dir: &tempfile::TempDir) -> AppConfig {
        AppConfig {
            reference_profile: REFERENCE_PROFILE.to_string(),
            cache_path: dir.path().join("jobs.json"),
            cache_ttl: Duration::from_secs(4 * 3600),
            sources: vec![
                stub_source("linkedin", Language::En),
                stub_source("occ", Language::Es),
                stub_source("computrabajo", Language::Es),
            ],
        }
    }

    fn service_with_pages(
        dir: &tempfile::TempDir,
        pages: HashMap<String, String>,
    ) -> (JobService, Arc<StubFetcher>) {
        let fetcher = Arc::new(StubFetcher {
            pages,
            calls: AtomicUsize::new(0),
        });
        let service =
            JobService::with_parts(test_config(dir), fetcher.clone(), Arc::new(StubScorer(42)));
        (service, fetcher)
    }

    fn all_pages() -> HashMap<String, String> {
        HashMap::from([
            ("linkedin".to_string(), results_page(3)),
            ("occ".to_string(), results_page(5)),
            ("computrabajo".to_string(), results_page(2)),
        ])
    }

    #[tokio::test]
    async fn test_unknown_platform_fails_regardless_of_cache() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = service_with_pages(&dir, all_pages());

        let err = service.get_platform("monster").await.unwrap_err();
        assert!(matches!(err, ServiceError::UnknownPlatform(_)));

        // Populate the cache, then ask again.
        service.get_platform("linkedin").await.unwrap();
        let err = service.get_platform("monster").await.unwrap_err();
        assert!(matches!(err, ServiceError::UnknownPlatform(_)));
    }

    #[tokio::test]
    async fn test_full_scrape_returns_per_source_counts() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = service_with_pages(&dir, all_pages());

        let linkedin = service.get_platform("linkedin").await.unwrap();
        assert_eq!(linkedin.len(), 3);
        assert!(linkedin
            .iter()
            .all(|l| l.match_score == Some(42) && l.message.is_some()));

        let occ = service.get_platform("occ").await.unwrap();
        assert_eq!(occ.len(), 5);
        let computrabajo = service.get_platform("computrabajo").await.unwrap();
        assert_eq!(computrabajo.len(), 2);

        // The snapshot on disk holds all three collections.
        let cache = ResultCache::new(dir.path().join("jobs.json"), Duration::from_secs(3600));
        let entry = cache.read().await.unwrap();
        assert_eq!(entry.collections["linkedin"].len(), 3);
        assert_eq!(entry.collections["occ"].len(), 5);
        assert_eq!(entry.collections["computrabajo"].len(), 2);
    }

    #[tokio::test]
    async fn test_one_timed_out_source_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut pages = all_pages();
        pages.remove("occ"); // stub fetcher times this one out

        let (service, _) = service_with_pages(&dir, pages);

        let occ = service.get_platform("occ").await.unwrap();
        assert!(occ.is_empty());

        let linkedin = service.get_platform("linkedin").await.unwrap();
        assert_eq!(linkedin.len(), 3);
        let computrabajo = service.get_platform("computrabajo").await.unwrap();
        assert_eq!(computrabajo.len(), 2);
    }

    #[tokio::test]
    async fn test_fresh_cache_short_circuits_scraping() {
        let dir = tempfile::tempdir().unwrap();
        let (service, fetcher) = service_with_pages(&dir, all_pages());

        service.get_platform("linkedin").await.unwrap();
        let fetches_after_first = fetcher.calls.load(Ordering::SeqCst);
        assert_eq!(fetches_after_first, 3);

        service.get_platform("occ").await.unwrap();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), fetches_after_first);
    }

    #[tokio::test]
    async fn test_spanish_sources_get_spanish_messages() {
        let dir = tempfile::tempdir().unwrap();
        let (service, _) = service_with_pages(&dir, all_pages());

        let occ = service.get_platform("occ").await.unwrap();
        let message = occ[0].message.as_deref().unwrap();
        assert!(message.starts_with("Hola equipo de reclutamiento"));

        let linkedin = service.get_platform("linkedin").await.unwrap();
        let message = linkedin[0].message.as_deref().unwrap();
        assert!(message.starts_with("Dear "));
    }
}
