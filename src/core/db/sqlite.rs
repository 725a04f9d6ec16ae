use std::path::{Path, PathBuf};

use sqlx::{
    Sqlite,
    pool::PoolConnection,
    sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
    },
};
use tracing::debug;

use crate::error::ClientError;

use super::CredentialStore;

const CREDENTIAL_KEY: &str = "credential";

/// Credential storage backed by a small sqlite key/value file.
pub struct SqliteCredentialStore {
    path: PathBuf,
    pool: SqlitePool,
}

impl std::fmt::Debug for SqliteCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteCredentialStore")
            .field("path", &self.path)
            .finish()
    }
}

impl SqliteCredentialStore {
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();
        let connect_opts = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connect_opts)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        debug!(path = %path.display(), "opened credential storage");
        Ok(Self { path, pool })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Releases the file handles; the store is unusable afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn conn(&self) -> Result<PoolConnection<Sqlite>, ClientError> {
        Ok(self.pool.acquire().await?)
    }
}

impl CredentialStore for SqliteCredentialStore {
    async fn load(&self) -> Result<Option<String>, ClientError> {
        let mut conn = self.conn().await?;
        let value = sqlx::query_scalar::<_, String>(
            r#"SELECT value FROM client_storage WHERE key = $1"#,
        )
        .bind(CREDENTIAL_KEY)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(value)
    }

    async fn save(&self, credential: &str) -> Result<(), ClientError> {
        let mut conn = self.conn().await?;
        sqlx::query(
            r#"INSERT INTO client_storage (key, value) VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value"#,
        )
        .bind(CREDENTIAL_KEY)
        .bind(credential)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn remove(&self) -> Result<(), ClientError> {
        let mut conn = self.conn().await?;
        sqlx::query(r#"DELETE FROM client_storage WHERE key = $1"#)
            .bind(CREDENTIAL_KEY)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
