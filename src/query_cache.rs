//! Compiled plan cache
//!
//! Stores rendered plans in an [`ArtifactStore`] so identical plans are not
//! re-rendered across runs.
//!
//! # Architecture
//!
//! Cache Key: SHA-256 of (dialect, server version, expression renderer id,
//! plan JSON), hex encoded
//! Cache Value: [`CompiledPlan`] as JSON at `compiled/<key>.json`

use std::sync::atomic::{AtomicU64, Ordering};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::query_plan::QueryPlan;
use crate::sql_generator::{compile_plan, CompiledPlan, DialectConfig, ExpressionRenderer, SqlGeneratorError};
use crate::storage::{ArtifactStore, StorageError};

const CACHE_DIR: &str = "compiled";

#[derive(Debug, Error)]
pub enum QueryCacheError {
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Cache storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Compile(#[from] SqlGeneratorError),
}

/// Key for cache lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryCacheKey(String);

impl QueryCacheKey {
    pub fn new(
        plan: &QueryPlan,
        config: &DialectConfig,
        exp_renderer: &dyn ExpressionRenderer,
    ) -> Result<Self, QueryCacheError> {
        let plan_json = serde_json::to_vec(plan)?;

        let mut hasher = Sha256::new();
        hasher.update(config.dialect.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(config.server_version.to_be_bytes());
        hasher.update(b":");
        hasher.update(exp_renderer.cache_id().as_bytes());
        hasher.update(b":");
        hasher.update(&plan_json);

        Ok(QueryCacheKey(hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn artifact_path(&self) -> String {
        format!("{}/{}.json", CACHE_DIR, self.0)
    }
}

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Compiled plan cache over an artifact store
pub struct QueryCache<S: ArtifactStore> {
    store: S,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: ArtifactStore> QueryCache<S> {
    pub fn new(store: S, enabled: bool) -> Self {
        QueryCache {
            store,
            enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached compilation of `plan`, compiling and storing it on a miss.
    ///
    /// An unreadable entry is treated as a miss and overwritten.
    pub fn get_or_compile(
        &self,
        plan: &QueryPlan,
        config: &DialectConfig,
        exp_renderer: &dyn ExpressionRenderer,
    ) -> Result<CompiledPlan, QueryCacheError> {
        if !self.enabled {
            return Ok(compile_plan(plan, config, exp_renderer)?);
        }

        let key = QueryCacheKey::new(plan, config, exp_renderer)?;
        let path = key.artifact_path();

        if self.store.exists(&path)? {
            let bytes = self.store.get(&path)?;
            match serde_json::from_slice::<CompiledPlan>(&bytes) {
                Ok(compiled) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    log::debug!("query_cache: hit {}", key.as_str());
                    return Ok(compiled);
                }
                Err(e) => {
                    log::warn!("query_cache: discarding unreadable entry {}: {}", path, e);
                }
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        log::debug!("query_cache: miss {}", key.as_str());

        let compiled = compile_plan(plan, config, exp_renderer)?;
        self.store.put(&path, &serde_json::to_vec_pretty(&compiled)?)?;
        Ok(compiled)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
