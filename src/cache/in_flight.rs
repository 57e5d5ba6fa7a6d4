use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Slugs with a regeneration currently running.
#[derive(Clone, Default)]
pub struct InFlightPages {
    slugs: Arc<DashMap<String, ()>>,
}

#[derive(Debug, Error)]
pub enum InFlightError {
    #[error("regeneration already in progress for `{slug}`")]
    AlreadyRunning { slug: String },
}

impl InFlightPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, slug: &str) -> Result<RegenerationGuard, InFlightError> {
        use dashmap::mapref::entry::Entry;

        match self.slugs.entry(slug.to_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(());
                Ok(RegenerationGuard {
                    slug: slug.to_string(),
                    slugs: Arc::clone(&self.slugs),
                })
            }
            Entry::Occupied(_) => Err(InFlightError::AlreadyRunning {
                slug: slug.to_string(),
            }),
        }
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.slugs.contains_key(slug)
    }
}

/// Releases the slug when dropped, including when the regeneration task panics.
pub struct RegenerationGuard {
    slug: String,
    slugs: Arc<DashMap<String, ()>>,
}

impl Drop for RegenerationGuard {
    fn drop(&mut self) {
        self.slugs.remove(&self.slug);
    }
}

/// Per-slug async locks serialising inline generation, so concurrent misses
/// for one slug wait for a single upstream fetch.
#[derive(Clone, Default)]
pub struct FillLocks {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl FillLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, slug: &str) -> FillGuard {
        let lock = Arc::clone(
            self.locks
                .entry(slug.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        FillGuard {
            slug: slug.to_string(),
            locks: Arc::clone(&self.locks),
            guard: Some(lock.lock_owned().await),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Releases the lock and drops the slug's entry once nobody else holds it.
pub struct FillGuard {
    slug: String,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for FillGuard {
    fn drop(&mut self) {
        self.guard.take();
        self.locks
            .remove_if(&self.slug, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_until_release() {
        let in_flight = InFlightPages::new();
        let guard = in_flight.acquire("demo").expect("first acquire");

        assert!(matches!(
            in_flight.acquire("demo"),
            Err(InFlightError::AlreadyRunning { slug }) if slug == "demo"
        ));
        assert!(in_flight.acquire("other").is_ok());

        drop(guard);
        assert!(!in_flight.contains("demo"));
        assert!(in_flight.acquire("demo").is_ok());
    }

    #[tokio::test]
    async fn fill_lock_serialises_one_slug() {
        let locks = FillLocks::new();
        let first = locks.acquire("demo").await;

        let contender = locks.clone();
        let waiting = tokio::spawn(async move {
            let _guard = contender.acquire("demo").await;
        });
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!waiting.is_finished());

        let other = locks.acquire("other").await;
        drop(other);

        drop(first);
        waiting.await.expect("join");
        assert!(locks.is_empty());
    }
}
