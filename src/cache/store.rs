//! Rendered page storage.
//!
//! Holds the last generated outcome per slug with LRU eviction. Each entry
//! carries its own revalidation interval; staleness is decided at lookup time.

use std::{
    sync::RwLock,
    time::{Duration, Instant},
};

use bytes::Bytes;
use lru::LruCache;
use metrics::counter;

use crate::application::pages::Redirect;

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

pub(crate) const METRIC_PAGE_CACHE_HIT: &str = "portfolio_page_cache_hit_total";
pub(crate) const METRIC_PAGE_CACHE_STALE: &str = "portfolio_page_cache_stale_total";
pub(crate) const METRIC_PAGE_CACHE_MISS: &str = "portfolio_page_cache_miss_total";

/// Outcome of generating one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    Html(Bytes),
    Redirect(Redirect),
}

#[derive(Debug, Clone)]
pub struct CachedPage {
    pub body: PageBody,
    pub generated_at: Instant,
    pub revalidate: Duration,
}

impl CachedPage {
    pub fn new(body: PageBody, revalidate: Duration) -> Self {
        Self {
            body,
            generated_at: Instant::now(),
            revalidate,
        }
    }

    /// A page becomes stale once its revalidation interval has fully elapsed.
    pub fn is_stale_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.generated_at) >= self.revalidate
    }
}

#[derive(Debug, Clone)]
pub enum Lookup {
    Fresh(CachedPage),
    Stale(CachedPage),
    Miss,
}

pub struct PageStore {
    pages: RwLock<LruCache<String, CachedPage>>,
}

impl PageStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            pages: RwLock::new(LruCache::new(config.page_limit_non_zero())),
        }
    }

    pub fn lookup(&self, slug: &str, now: Instant) -> Lookup {
        let cached = rw_write(&self.pages, SOURCE, "lookup").get(slug).cloned();

        match cached {
            Some(page) if page.is_stale_at(now) => {
                counter!(METRIC_PAGE_CACHE_STALE).increment(1);
                Lookup::Stale(page)
            }
            Some(page) => {
                counter!(METRIC_PAGE_CACHE_HIT).increment(1);
                Lookup::Fresh(page)
            }
            None => {
                counter!(METRIC_PAGE_CACHE_MISS).increment(1);
                Lookup::Miss
            }
        }
    }

    /// Current copy without touching recency or the hit/miss counters.
    pub fn peek(&self, slug: &str) -> Option<CachedPage> {
        rw_read(&self.pages, SOURCE, "peek").peek(slug).cloned()
    }

    /// Store a page, returning the slug evicted to make room, if any.
    pub fn insert(&self, slug: String, page: CachedPage) -> Option<String> {
        rw_write(&self.pages, SOURCE, "insert")
            .push(slug.clone(), page)
            .and_then(|(evicted, _)| (evicted != slug).then_some(evicted))
    }

    pub fn len(&self) -> usize {
        rw_read(&self.pages, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    fn html(body: &'static str, revalidate: Duration) -> CachedPage {
        CachedPage::new(PageBody::Html(Bytes::from_static(body.as_bytes())), revalidate)
    }

    fn store(limit: usize) -> PageStore {
        PageStore::new(&CacheConfig {
            enabled: true,
            page_limit: limit,
        })
    }

    #[test]
    fn lookup_reports_miss_then_fresh() {
        let store = store(4);
        assert!(matches!(store.lookup("demo", Instant::now()), Lookup::Miss));

        store.insert("demo".to_string(), html("<p>demo</p>", Duration::from_secs(60)));

        match store.lookup("demo", Instant::now()) {
            Lookup::Fresh(page) => {
                assert_eq!(page.body, PageBody::Html(Bytes::from_static(b"<p>demo</p>")))
            }
            other => panic!("expected fresh page, got {other:?}"),
        }
    }

    #[test]
    fn page_turns_stale_after_revalidate_interval() {
        let store = store(4);
        let page = html("x", Duration::from_secs(1));
        let generated_at = page.generated_at;
        store.insert("demo".to_string(), page);

        assert!(matches!(
            store.lookup("demo", generated_at + Duration::from_millis(500)),
            Lookup::Fresh(_)
        ));
        assert!(matches!(
            store.lookup("demo", generated_at + Duration::from_secs(1)),
            Lookup::Stale(_)
        ));
    }

    #[test]
    fn redirects_are_cached_like_pages() {
        let store = store(4);
        store.insert(
            "gone".to_string(),
            CachedPage::new(
                PageBody::Redirect(Redirect::temporary("/")),
                Duration::from_secs(60),
            ),
        );

        match store.lookup("gone", Instant::now()) {
            Lookup::Fresh(page) => {
                assert_eq!(page.body, PageBody::Redirect(Redirect::temporary("/")))
            }
            other => panic!("expected cached redirect, got {other:?}"),
        }
    }

    #[test]
    fn insert_evicts_least_recently_used() {
        let store = store(2);
        store.insert("a".to_string(), html("a", Duration::from_secs(60)));
        store.insert("b".to_string(), html("b", Duration::from_secs(60)));
        store.lookup("a", Instant::now());

        let evicted = store.insert("c".to_string(), html("c", Duration::from_secs(60)));

        assert_eq!(evicted.as_deref(), Some("b"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn replacing_a_slug_is_not_an_eviction() {
        let store = store(2);
        store.insert("a".to_string(), html("a", Duration::from_secs(60)));
        assert_eq!(
            store.insert("a".to_string(), html("a2", Duration::from_secs(60))),
            None
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn zero_limit_clamps_to_one() {
        let store = store(0);
        store.insert("a".to_string(), html("a", Duration::from_secs(60)));
        store.insert("b".to_string(), html("b", Duration::from_secs(60)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn store_recovers_from_poisoned_lock() {
        let store = store(2);
        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = store.pages.write().expect("lock");
            panic!("poison the lock");
        }));

        store.insert("a".to_string(), html("a", Duration::from_secs(60)));
        assert!(!store.is_empty());
        assert!(matches!(store.lookup("a", Instant::now()), Lookup::Fresh(_)));
    }

    #[test]
    fn peek_leaves_recency_untouched() {
        let store = store(2);
        store.insert("a".to_string(), html("a", Duration::from_secs(60)));
        store.insert("b".to_string(), html("b", Duration::from_secs(60)));

        assert!(store.peek("a").is_some());
        assert!(store.peek("missing").is_none());

        assert_eq!(
            store.insert("c".to_string(), html("c", Duration::from_secs(60))),
            Some("a".to_string())
        );
    }
}
