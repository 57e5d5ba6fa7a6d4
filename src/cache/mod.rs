//! Incremental regeneration cache for rendered project pages.
//!
//! - `store`: LRU of rendered outcomes with per-entry revalidation intervals
//! - `regenerate`: stale-while-revalidate serving and background regeneration
//! - `in_flight`: one background regeneration per slug, and per-slug fill
//!   locks so concurrent inline misses share one generation
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! page_limit = 500
//! ```

mod config;
mod in_flight;
mod lock;
mod regenerate;
mod store;

pub use config::CacheConfig;
pub use in_flight::{FillGuard, FillLocks, InFlightError, InFlightPages, RegenerationGuard};
pub use regenerate::{PageCache, RegenerateError, Served};
pub use store::{CachedPage, Lookup, PageBody, PageStore};

pub(crate) use regenerate::{METRIC_PAGE_REGENERATE, METRIC_PAGE_REGENERATE_FAILED};
pub(crate) use store::{METRIC_PAGE_CACHE_HIT, METRIC_PAGE_CACHE_MISS, METRIC_PAGE_CACHE_STALE};
