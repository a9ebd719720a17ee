#[cfg(test)]
mod tests {
    use crate::cache::ResolutionCache;
    use crate::errors::{CatalogError, CatalogResult};
    use pretty_assertions::assert_eq;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    /// A resolution that counts itself, waits `delay_ms`, then yields `result`.
    fn counted(
        calls: &Arc<AtomicUsize>,
        delay_ms: u64,
        result: CatalogResult<String>,
    ) -> impl Future<Output = CatalogResult<String>> + Send + 'static {
        let calls = Arc::clone(calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            sleep(Duration::from_millis(delay_ms)).await;
            result
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_requests_share_one_resolution() {
        // Arrange
        let cache: ResolutionCache<u32, String> = ResolutionCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        // Act
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_resolve(25, || counted(&calls, 30, Ok("pikachu".to_string())))
                        .await
                })
            })
            .collect();
        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.expect("task panicked"));
        }

        // Assert
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| r.as_deref() == Ok("pikachu")));
        assert_eq!(cache.get(&25), Some("pikachu".to_string()));
    }

    #[tokio::test]
    async fn test_resolved_value_is_served_without_resolving_again() {
        let cache: ResolutionCache<u32, String> = ResolutionCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .get_or_resolve(1, || counted(&calls, 0, Ok("bulbasaur".to_string())))
            .await;
        let second = cache
            .get_or_resolve(1, || counted(&calls, 0, Ok("not used".to_string())))
            .await;

        assert_eq!(first.as_deref(), Ok("bulbasaur"));
        assert_eq!(second.as_deref(), Ok("bulbasaur"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains(&1));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        // Arrange
        let cache: ResolutionCache<u32, String> = ResolutionCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));
        let outage = CatalogError::unavailable("pokemon/4", "HTTP 503");

        // Act
        let first = cache
            .get_or_resolve(4, || counted(&calls, 0, Err(outage.clone())))
            .await;
        let cached_after_failure = cache.contains(&4);
        let second = cache
            .get_or_resolve(4, || counted(&calls, 0, Ok("charmander".to_string())))
            .await;

        // Assert
        assert_eq!(first, Err(outage));
        assert!(!cached_after_failure, "failed entry must be released");
        assert_eq!(second.as_deref(), Ok("charmander"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_reported_and_not_cached() {
        let cache: ResolutionCache<u32, String> = ResolutionCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        let result = cache
            .get_or_resolve(9999, || counted(&calls, 0, Err(CatalogError::not_found("pokemon/9999"))))
            .await;

        assert!(matches!(result, Err(CatalogError::NotFound { .. })));
        assert!(cache.is_empty());
        assert_eq!(cache.pending_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_waiters_observe_the_same_failure() {
        let cache: ResolutionCache<u32, String> = ResolutionCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));
        let outage = CatalogError::unavailable("pokemon/7", "connection reset");

        let (a, b) = tokio::join!(
            cache.get_or_resolve(7, || counted(&calls, 30, Err(outage.clone()))),
            cache.get_or_resolve(7, || counted(&calls, 30, Ok("squirtle".to_string()))),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a, Err(outage.clone()));
        assert_eq!(b, Err(outage));
    }

    #[tokio::test]
    async fn test_abandoned_caller_does_not_cancel_resolution() {
        // Arrange
        let cache: ResolutionCache<u32, String> = ResolutionCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        // Act: the first caller gives up long before the fetch completes
        let abandoned = timeout(
            Duration::from_millis(5),
            cache.get_or_resolve(150, || counted(&calls, 50, Ok("mewtwo".to_string()))),
        )
        .await;
        let pending_after_abandon = cache.pending_count();
        let joined = cache
            .get_or_resolve(150, || counted(&calls, 0, Ok("not used".to_string())))
            .await;

        // Assert
        assert!(abandoned.is_err(), "first caller should have timed out");
        assert_eq!(pending_after_abandon, 1);
        assert_eq!(joined.as_deref(), Ok("mewtwo"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_resolve_independently() {
        let cache: ResolutionCache<String, String> = ResolutionCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            cache.get_or_resolve("tackle".to_string(), || counted(&calls, 10, Ok("Tackle".to_string()))),
            cache.get_or_resolve("growl".to_string(), || counted(&calls, 10, Ok("Growl".to_string()))),
        );

        assert_eq!(a.as_deref(), Ok("Tackle"));
        assert_eq!(b.as_deref(), Ok("Growl"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_find_only_sees_resolved_values() {
        let cache: ResolutionCache<u32, String> = ResolutionCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        let _ = cache
            .get_or_resolve(1, || counted(&calls, 0, Ok("bulbasaur".to_string())))
            .await;
        let pending = timeout(
            Duration::from_millis(5),
            cache.get_or_resolve(4, || counted(&calls, 50, Ok("charmander".to_string()))),
        )
        .await;

        assert!(pending.is_err());
        assert_eq!(cache.find(|v| v == "bulbasaur"), Some("bulbasaur".to_string()));
        assert_eq!(cache.find(|v| v == "charmander"), None);
    }

    #[tokio::test]
    async fn test_clear_forgets_resolved_values() {
        let cache: ResolutionCache<u32, String> = ResolutionCache::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        let _ = cache
            .get_or_resolve(1, || counted(&calls, 0, Ok("bulbasaur".to_string())))
            .await;
        cache.clear();
        let after_clear = cache.contains(&1);
        let _ = cache
            .get_or_resolve(1, || counted(&calls, 0, Ok("bulbasaur".to_string())))
            .await;

        assert!(!after_clear);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
