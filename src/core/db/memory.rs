use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::ClientError;

use super::CredentialStore;

/// Credential storage that lives as long as the process. Clones share the
/// same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    slot: Arc<RwLock<Option<String>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(credential.into()))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<String>, ClientError> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, credential: &str) -> Result<(), ClientError> {
        *self.slot.write().await = Some(credential.to_string());
        Ok(())
    }

    async fn remove(&self) -> Result<(), ClientError> {
        self.slot.write().await.take();
        Ok(())
    }
}
