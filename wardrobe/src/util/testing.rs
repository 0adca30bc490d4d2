// src/util/testing.rs

use std::env;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Once;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::config::{ENV_DATA_DIR, ENV_VOCABULARY};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::repositories::storage::CollectionStorage;
use crate::infrastructure::storage::InMemoryStorage;

static INIT_LOGGING: Once = Once::new();

/// Set up test logging exactly once; honours RUST_LOG, defaults to debug
pub fn init_test_env() {
    INIT_LOGGING.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_test_writer()
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(env_filter),
        );

        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
        debug!("Test logging initialized");
    });
}

/// Restores the wardrobe environment variables on drop
#[derive(Debug, Clone)]
pub struct EnvGuard {
    data_dir: Option<String>,
    vocabulary: Option<String>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            data_dir: env::var(ENV_DATA_DIR).ok(),
            vocabulary: env::var(ENV_VOCABULARY).ok(),
        }
    }
}

impl Drop for EnvGuard {
    #[instrument(level = "trace")]
    fn drop(&mut self) {
        env::remove_var(ENV_DATA_DIR);
        env::remove_var(ENV_VOCABULARY);
        if let Some(val) = &self.data_dir {
            env::set_var(ENV_DATA_DIR, val);
        }
        if let Some(val) = &self.vocabulary {
            env::set_var(ENV_VOCABULARY, val);
        }
    }
}

/// Storage whose first `slow_writes` writes sleep before completing
#[derive(Debug)]
pub struct SlowStorage {
    inner: InMemoryStorage,
    delay: Duration,
    slow_writes: AtomicUsize,
    writes: AtomicUsize,
}

impl SlowStorage {
    pub fn new(delay: Duration, slow_writes: usize) -> Self {
        Self {
            inner: InMemoryStorage::new(),
            delay,
            slow_writes: AtomicUsize::new(slow_writes),
            writes: AtomicUsize::new(0),
        }
    }

    /// Make the next `n` writes slow
    pub fn arm(&self, n: usize) {
        self.slow_writes.store(n, Ordering::SeqCst);
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn payload(&self, key: &str) -> Option<String> {
        self.inner.payload(key).await
    }
}

#[async_trait]
impl CollectionStorage for SlowStorage {
    async fn read(&self, key: &str) -> DomainResult<Option<String>> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, payload: &str) -> DomainResult<()> {
        let slow = self
            .slow_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if slow {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.write(key, payload).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Storage whose writes can be switched to fail
#[derive(Debug, Default)]
pub struct FailingStorage {
    inner: InMemoryStorage,
    fail_writes: AtomicBool,
}

impl FailingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn payload(&self, key: &str) -> Option<String> {
        self.inner.payload(key).await
    }
}

#[async_trait]
impl CollectionStorage for FailingStorage {
    async fn read(&self, key: &str) -> DomainResult<Option<String>> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, payload: &str) -> DomainResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence(format!(
                "simulated write failure for '{}'",
                key
            )));
        }
        self.inner.write(key, payload).await
    }
}
