//! Page cache configuration.
//!
//! Controls the regeneration cache via the `[cache]` table of `portfolio.toml`.

use std::num::NonZeroUsize;

const DEFAULT_PAGE_LIMIT: usize = 500;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Serve pages from the regeneration cache. When off, every request renders inline.
    pub enabled: bool,
    /// Maximum rendered pages kept in memory.
    pub page_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            page_limit: settings.page_limit,
        }
    }
}

impl CacheConfig {
    /// Returns the page limit as NonZeroUsize, clamping to 1 if zero.
    pub fn page_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.page_limit).unwrap_or(NonZeroUsize::MIN)
    }
}
