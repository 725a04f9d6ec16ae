use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sync::payload::CREDENTIAL_FIELD;

/// Field used when the client itself could not reach the server.
pub const SERVER_CONNECTION_FIELD: &str = "serverConnection";
/// Field used when the server answered with something the client cannot use.
pub const SERVER_RESPONSE_FIELD: &str = "serverResponse";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("credential storage failed: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("credential storage migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("failed to reach server: {0}")]
    Connection(String),

    #[error("malformed response payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("malformed credential: {0}")]
    MalformedCredential(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Taxonomy of the errors the backend (or the client on its behalf) reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// Per-field problem the user can correct.
    Validation,
    /// Well-formed request rejected by a business rule.
    ServerState,
    /// Network failure or server crash.
    ServerConnection,
    /// The session credential was expired or invalid.
    CredentialRejected,
}

impl ErrorKind {
    pub fn classify(field: &str) -> Self {
        if field == CREDENTIAL_FIELD {
            ErrorKind::CredentialRejected
        } else if field == SERVER_CONNECTION_FIELD {
            ErrorKind::ServerConnection
        } else if field.starts_with("server") {
            ErrorKind::ServerState
        } else {
            ErrorKind::Validation
        }
    }
}

/// Error map as sent by the server: field name to user-facing message.
///
/// Stored in the error-display store exactly as received; the kind of each
/// entry is derived from its field name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendErrors(BTreeMap<String, String>);

impl BackendErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert(field, message);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn server_connection() -> Self {
        Self::new().with(
            SERVER_CONNECTION_FIELD,
            "Server connection error, please try again later",
        )
    }

    pub fn credential_rejected(message: impl Into<String>) -> Self {
        Self::new().with(CREDENTIAL_FIELD, message)
    }

    /// Turns a client-side failure into the entry the user gets to see.
    pub fn from_client_error(err: &ClientError) -> Self {
        match err {
            ClientError::Connection(_) => Self::server_connection(),
            ClientError::MalformedCredential(_) => {
                Self::new().with("serverCredential", "Server sent an unreadable credential")
            }
            other => Self::new().with(SERVER_RESPONSE_FIELD, other.to_string()),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn of_kind(&self, kind: ErrorKind) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter(move |(field, _)| ErrorKind::classify(field) == kind)
    }

    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.of_kind(kind).next().is_some()
    }

    pub fn is_credential_rejected(&self) -> bool {
        self.has_kind(ErrorKind::CredentialRejected)
    }
}

impl FromIterator<(String, String)> for BackendErrors {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
