mod memory;
mod sqlite;

use std::future::Future;

use crate::error::ClientError;

pub use memory::MemoryCredentialStore;
pub use sqlite::SqliteCredentialStore;

/// Durable client-side storage holding the session credential. Its presence
/// is the only state that survives a restart.
pub trait CredentialStore {
    fn load(&self) -> impl Future<Output = Result<Option<String>, ClientError>>;
    fn save(&self, credential: &str) -> impl Future<Output = Result<(), ClientError>>;
    /// Removing a credential that is not there is not an error.
    fn remove(&self) -> impl Future<Output = Result<(), ClientError>>;
}
