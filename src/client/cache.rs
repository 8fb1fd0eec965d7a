use std::{collections::HashMap, future::Future};

use tokio::sync::RwLock;

/// Read-through cache of single entities keyed by id.
///
/// Entries are only written after a fetch completed, so a failed request
/// never leaves a partial value behind.
pub struct EntityCache<T> {
    entries: RwLock<HashMap<String, T>>,
}

impl<T: Clone> EntityCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.entries.read().await.get(id).cloned()
    }

    pub async fn get_or_fetch<F, Fut, E>(&self, id: &str, fetch: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get(id).await {
            return Ok(hit);
        }

        let value = fetch().await?;
        self.insert(id, value.clone()).await;
        Ok(value)
    }

    pub async fn insert(&self, id: &str, value: T) {
        self.entries.write().await.insert(id.to_string(), value);
    }

    pub async fn invalidate(&self, id: &str) {
        self.entries.write().await.remove(id);
    }

    /// Drops every entry matching `predicate`.
    pub async fn invalidate_where<P>(&self, predicate: P)
    where
        P: Fn(&T) -> bool,
    {
        self.entries.write().await.retain(|_, value| !predicate(value));
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<T: Clone> Default for EntityCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-through cache holding one whole collection listing.
pub struct ListCache<T> {
    items: RwLock<Option<Vec<T>>>,
}

impl<T: Clone> ListCache<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(None),
        }
    }

    pub async fn get(&self) -> Option<Vec<T>> {
        self.items.read().await.clone()
    }

    pub async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<Vec<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        if let Some(hit) = self.get().await {
            return Ok(hit);
        }

        let items = fetch().await?;
        *self.items.write().await = Some(items.clone());
        Ok(items)
    }

    pub async fn invalidate(&self) {
        *self.items.write().await = None;
    }
}

impl<T: Clone> Default for ListCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_get_or_fetch_reads_through_once() {
        let cache: EntityCache<String> = EntityCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_fetch("a", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>("alpha".to_string())
                })
                .await
                .unwrap();
            assert_eq!(value, "alpha");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache: EntityCache<String> = EntityCache::new();

        let result = cache
            .get_or_fetch("a", || async { Err::<String, _>("offline") })
            .await;
        assert_eq!(result, Err("offline"));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_where() {
        let cache: EntityCache<Vec<&str>> = EntityCache::new();
        cache.insert("quiz-1", vec!["q1", "q2"]).await;
        cache.insert("quiz-2", vec!["q3"]).await;

        cache.invalidate_where(|questions| questions.contains(&"q2")).await;

        assert!(cache.get("quiz-1").await.is_none());
        assert_eq!(cache.get("quiz-2").await, Some(vec!["q3"]));
    }

    #[tokio::test]
    async fn test_list_cache_invalidate_forces_refetch() {
        let list: ListCache<u32> = ListCache::new();

        let first = list.get_or_fetch(|| async { Ok::<_, ()>(vec![1, 2]) }).await;
        assert_eq!(first, Ok(vec![1, 2]));

        let cached = list.get_or_fetch(|| async { Ok::<_, ()>(vec![9]) }).await;
        assert_eq!(cached, Ok(vec![1, 2]));

        list.invalidate().await;
        let refetched = list.get_or_fetch(|| async { Ok::<_, ()>(vec![9]) }).await;
        assert_eq!(refetched, Ok(vec![9]));
    }
}
