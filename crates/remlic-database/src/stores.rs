//! Store selection by configured provider.

use std::sync::Arc;

use tracing::{info, warn};

use remlic_core::config::{DatabaseConfig, DatabaseProvider};
use remlic_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::repositories::{LicenseRepository, ProfileRepository};
use crate::store::{LicenseStore, ProfileStore};

/// The store handles a process needs, opened once at startup.
#[derive(Clone)]
pub struct Stores {
    pub licenses: Arc<dyn LicenseStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pool: Option<DatabasePool>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("postgres", &self.pool.is_some())
            .finish()
    }
}

impl Stores {
    /// Open the configured provider.
    pub async fn open(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                Ok(Self {
                    licenses: Arc::new(LicenseRepository::new(pool.pool().clone())),
                    profiles: Arc::new(ProfileRepository::new(pool.pool().clone())),
                    pool: Some(pool),
                })
            }
            DatabaseProvider::Memory => {
                warn!("Using the in-memory store; data is lost on exit");
                Ok(Self::memory(MemoryStore::new()))
            }
        }
    }

    /// Wrap an existing in-memory store.
    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            licenses: store.clone(),
            profiles: store,
            pool: None,
        }
    }

    /// Release database connections, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        } else {
            info!("In-memory store released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider_needs_no_url() {
        let config = DatabaseConfig {
            provider: DatabaseProvider::Memory,
            ..Default::default()
        };
        let stores = Stores::open(&config).await.unwrap();
        assert!(stores.licenses.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_postgres_provider_requires_url() {
        let err = Stores::open(&DatabaseConfig::default()).await.unwrap_err();
        assert_eq!(err.kind, remlic_core::error::ErrorKind::Configuration);
    }
}
