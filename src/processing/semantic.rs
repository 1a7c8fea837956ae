//! Semantic skill equivalence backed by cached per-skill embeddings

use crate::error::{Result, SkillMatcherError};
use crate::processing::embeddings::{cosine_similarity, Encoder};
use crate::processing::knowledge_base::normalize;
use crate::processing::thresholds::DEFAULT_EQUIVALENCE_THRESHOLD;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Decides whether two skill strings denote the same concept
pub trait SkillEquivalence {
    fn are_equivalent(&self, a: &str, b: &str) -> bool;
}

/// Equivalence by normalized text only
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactEquivalence;

impl SkillEquivalence for ExactEquivalence {
    fn are_equivalent(&self, a: &str, b: &str) -> bool {
        normalize(a) == normalize(b)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub cache_size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Bounded LRU cache of skill embeddings keyed by normalized skill text.
///
/// The lock guards map access only. Encoding happens outside it, so two
/// callers missing on the same key both compute and the later insert wins.
pub struct EmbeddingCache {
    entries: Mutex<LruCache<String, Arc<Vec<f32>>>>,
    capacity: NonZeroUsize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            SkillMatcherError::Configuration("embedding cache capacity must be > 0".to_string())
        })?;

        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    /// Cached embedding for `key`, computing it with `compute` on a miss
    pub fn get_or_insert_with<F>(&self, key: &str, compute: F) -> Result<Arc<Vec<f32>>>
    where
        F: FnOnce() -> Result<Vec<f32>>,
    {
        if let Some(found) = self.lock().get(key).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(found);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let embedding = Arc::new(compute()?);
        self.lock().put(key.to_string(), Arc::clone(&embedding));
        Ok(embedding)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            cache_size: self.len(),
            capacity: self.capacity.get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, Arc<Vec<f32>>>> {
        // Entries are idempotent values; a poisoned lock still holds valid data
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Embedding-based equivalence between skill strings
pub struct SemanticMatcher {
    encoder: Arc<dyn Encoder>,
    cache: EmbeddingCache,
    threshold: f32,
}

impl SemanticMatcher {
    pub fn new(encoder: Arc<dyn Encoder>, cache_capacity: usize) -> Result<Self> {
        Self::with_threshold(encoder, cache_capacity, DEFAULT_EQUIVALENCE_THRESHOLD)
    }

    pub fn with_threshold(
        encoder: Arc<dyn Encoder>,
        cache_capacity: usize,
        threshold: f32,
    ) -> Result<Self> {
        Ok(Self {
            encoder,
            cache: EmbeddingCache::new(cache_capacity)?,
            threshold,
        })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Embedding for a skill, memoized by its normalized text
    pub fn embedding_of(&self, skill: &str) -> Result<Arc<Vec<f32>>> {
        let key = normalize(skill);
        self.cache
            .get_or_insert_with(&key, || self.encoder.encode(&key))
    }

    /// Cosine similarity of two skills' embeddings
    pub fn similarity(&self, a: &str, b: &str) -> Result<f32> {
        let embedding_a = self.embedding_of(a)?;
        let embedding_b = self.embedding_of(b)?;
        cosine_similarity(&embedding_a, &embedding_b)
    }

    /// Equivalence at an explicit threshold. Identical normalized text is
    /// always equivalent; any encoder failure yields `false`.
    pub fn are_equivalent_with_threshold(&self, a: &str, b: &str, threshold: f32) -> bool {
        let (a, b) = (normalize(a), normalize(b));
        if a == b {
            return true;
        }

        match self.similarity(&a, &b) {
            Ok(score) => {
                log::debug!("Skill similarity '{}' ~ '{}': {:.3}", a, b, score);
                score >= threshold
            }
            Err(e) => {
                log::warn!("Treating '{}' and '{}' as different skills: {}", a, b, e);
                false
            }
        }
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }
}

impl SkillEquivalence for SemanticMatcher {
    fn are_equivalent(&self, a: &str, b: &str) -> bool {
        self.are_equivalent_with_threshold(a, b, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    /// Looks vectors up in a fixed table and counts calls
    struct TableEncoder {
        vectors: HashMap<&'static str, Vec<f32>>,
        calls: AtomicUsize,
    }

    impl TableEncoder {
        fn new(entries: &[(&'static str, Vec<f32>)]) -> Self {
            Self {
                vectors: entries.iter().cloned().collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Encoder for TableEncoder {
        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.vectors
                .get(text)
                .cloned()
                .ok_or_else(|| SkillMatcherError::Embedding(format!("unknown text '{}'", text)))
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    struct FailingEncoder;

    impl Encoder for FailingEncoder {
        fn encode(&self, _text: &str) -> Result<Vec<f32>> {
            Err(SkillMatcherError::Embedding("encoder offline".to_string()))
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    fn table() -> Arc<TableEncoder> {
        Arc::new(TableEncoder::new(&[
            ("machine learning", vec![1.0, 0.1]),
            ("машинное обучение", vec![0.95, 0.15]),
            ("python", vec![0.0, 1.0]),
            ("java", vec![1.0, 0.0]),
        ]))
    }

    #[test]
    fn test_reflexive_without_encoder() {
        let matcher = SemanticMatcher::new(Arc::new(FailingEncoder), 8).unwrap();
        assert!(matcher.are_equivalent("Docker", "  docker "));
        assert!(matcher.cache().is_empty());
    }

    #[test]
    fn test_cross_lingual_equivalence() {
        let matcher = SemanticMatcher::new(table(), 8).unwrap();
        assert!(matcher.are_equivalent("Machine Learning", "машинное обучение"));
        assert!(!matcher.are_equivalent("python", "java"));
    }

    #[test]
    fn test_threshold_is_inclusive_boundary() {
        let matcher = SemanticMatcher::new(table(), 8).unwrap();
        let score = matcher.similarity("machine learning", "машинное обучение").unwrap();
        assert!(matcher.are_equivalent_with_threshold(
            "machine learning",
            "машинное обучение",
            score
        ));
        assert!(!matcher.are_equivalent_with_threshold(
            "machine learning",
            "машинное обучение",
            score + 0.001
        ));
    }

    #[test]
    fn test_encoder_failure_fails_closed() {
        let matcher = SemanticMatcher::new(Arc::new(FailingEncoder), 8).unwrap();
        assert!(!matcher.are_equivalent("python", "питон"));

        // unknown text in the table is also a failure
        let matcher = SemanticMatcher::new(table(), 8).unwrap();
        assert!(!matcher.are_equivalent("python", "cobol"));
    }

    #[test]
    fn test_embeddings_are_cached_by_normalized_text() {
        let encoder = table();
        let matcher = SemanticMatcher::new(encoder.clone(), 8).unwrap();

        matcher.embedding_of("Python").unwrap();
        matcher.embedding_of(" python ").unwrap();
        matcher.embedding_of("PYTHON").unwrap();

        assert_eq!(encoder.calls.load(Ordering::SeqCst), 1);
        let stats = matcher.cache().stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.cache_size, 1);
    }

    #[test]
    fn test_failed_encodings_are_not_cached() {
        let matcher = SemanticMatcher::new(Arc::new(FailingEncoder), 8).unwrap();
        assert!(matcher.embedding_of("python").is_err());
        assert!(!matcher.cache().contains("python"));
    }

    #[test]
    fn test_lru_eviction() {
        let cache = EmbeddingCache::new(2).unwrap();
        cache.get_or_insert_with("a", || Ok(vec![1.0])).unwrap();
        cache.get_or_insert_with("b", || Ok(vec![2.0])).unwrap();
        // touch "a" so "b" is least recently used
        cache.get_or_insert_with("a", || Ok(vec![9.0])).unwrap();
        cache.get_or_insert_with("c", || Ok(vec![3.0])).unwrap();

        assert_eq!(cache.len(), 2);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(EmbeddingCache::new(0).is_err());
    }

    #[test]
    fn test_concurrent_lookups_share_cache() {
        let encoder = table();
        let matcher = Arc::new(SemanticMatcher::new(encoder.clone(), 8).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let matcher = Arc::clone(&matcher);
                std::thread::spawn(move || matcher.are_equivalent("java", "python"))
            })
            .collect();

        for handle in handles {
            assert!(!handle.join().unwrap());
        }
        assert_eq!(matcher.cache().len(), 2);
        // racing misses may encode twice, never more than once per thread
        assert!(encoder.calls.load(Ordering::SeqCst) <= 16);
    }

    #[test]
    fn test_exact_equivalence() {
        assert!(ExactEquivalence.are_equivalent("Docker", "docker"));
        assert!(!ExactEquivalence.are_equivalent("docker", "докер"));
    }
}
