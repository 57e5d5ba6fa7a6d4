mod support;

use std::{collections::HashSet, time::Duration};

use metrics_util::debugging::DebuggingRecorder;
use portfolio::{
    application::pages::{Fallback, ProjectPages},
    cache::{CacheConfig, PageCache, Served},
    domain::project::PageParams,
};

use support::{InMemorySource, demo_project};

#[tokio::test]
async fn page_cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let params = PageParams::new("demo");

    // miss then hit
    let fresh_source = InMemorySource::with_entries(vec![demo_project()]);
    let fresh = PageCache::new(
        ProjectPages::new(fresh_source)
            .with_revalidate(Duration::from_secs(3600))
            .with_fallback(Fallback::Blocking),
        CacheConfig::default(),
    );
    assert!(matches!(
        fresh.serve(&params).await.expect("miss"),
        Served::Page(_)
    ));
    assert!(matches!(
        fresh.serve(&params).await.expect("hit"),
        Served::Page(_)
    ));

    // stale with a failing regeneration
    let stale_source = InMemorySource::with_entries(vec![demo_project()]);
    let stale = PageCache::new(
        ProjectPages::new(stale_source.clone())
            .with_revalidate(Duration::ZERO)
            .with_fallback(Fallback::Blocking),
        CacheConfig::default(),
    );
    stale.serve(&params).await.expect("initial generation");
    stale_source.set_failing(true);
    assert!(matches!(
        stale.serve(&params).await.expect("stale copy"),
        Served::Page(_)
    ));
    for _ in 0..1_000 {
        if !stale.is_regenerating("demo") {
            break;
        }
        tokio::task::yield_now().await;
    }

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "portfolio_page_cache_hit_total",
        "portfolio_page_cache_stale_total",
        "portfolio_page_cache_miss_total",
        "portfolio_page_regenerate_total",
        "portfolio_page_regenerate_failed_total",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
