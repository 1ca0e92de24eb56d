//! Content-addressed token cache
//!
//! Memoizes the token stream for a given source text so repeated structural
//! queries against the same text do not re-lex it. Keys are blake3 digests of
//! the exact text; the cache is bounded and safe for concurrent use. A miss
//! race lexing the same text twice is harmless — lexing is pure.

use moka::sync::Cache;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use stitch_lexer::{tokenize, TokenStream};

/// Default number of distinct source texts retained
pub const DEFAULT_CAPACITY: u64 = 64;

/// Blake3 digest of a source text, used as the cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceHash([u8; 32]);

impl SourceHash {
    /// Hash a source text.
    #[inline]
    #[must_use]
    pub fn compute(text: &str) -> Self {
        Self(*blake3::hash(text.as_bytes()).as_bytes())
    }

    /// Raw digest bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short hex form for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl Display for SourceHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

/// Bounded memoization of [`tokenize`] results
///
/// Retention is a deliberate policy choice: a small TinyLFU-managed cache
/// rather than unbounded growth. Eviction cannot affect correctness — an
/// evicted entry is simply re-lexed on the next query.
#[derive(Debug, Clone)]
pub struct TokenCache {
    inner: Cache<SourceHash, Arc<TokenStream>>,
}

impl TokenCache {
    /// Create a cache retaining up to `max_capacity` distinct texts.
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Token stream for `source`, lexing at most once per distinct text
    /// while the entry is retained.
    #[must_use]
    pub fn tokens(&self, source: &str) -> Arc<TokenStream> {
        let key = SourceHash::compute(source);
        self.inner.get_with(key, || {
            tracing::debug!(source = %key, "token cache miss, lexing");
            Arc::new(tokenize(source))
        })
    }

    /// Drop every cached entry.
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Approximate number of cached entries.
    #[inline]
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_shares_one_stream() {
        let cache = TokenCache::default();
        let a = cache.tokens("class Foo {}");
        let b = cache.tokens("class Foo {}");

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn distinct_texts_get_distinct_entries() {
        let cache = TokenCache::default();
        let a = cache.tokens("class Foo {}");
        let b = cache.tokens("class Bar {}");

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.entry_count(), 2);
    }

    #[test]
    fn cached_result_equals_direct_lex() {
        let source = "class Foo\n{\n    public function bar() {}\n}\n";
        let cache = TokenCache::default();

        assert_eq!(*cache.tokens(source), tokenize(source));
    }

    #[test]
    fn invalidation_is_transparent() {
        let source = "class Foo {}";
        let cache = TokenCache::default();
        let before = cache.tokens(source);

        cache.invalidate_all();
        let after = cache.tokens(source);

        assert_eq!(*before, *after);
    }

    #[test]
    fn source_hash_is_stable() {
        assert_eq!(SourceHash::compute("abc"), SourceHash::compute("abc"));
        assert_ne!(SourceHash::compute("abc"), SourceHash::compute("abd"));
        assert_eq!(SourceHash::compute("abc").short().len(), 8);
    }
}
