//! Session Store: the bearer credential and the identity claims decoded from
//! it. Claims are read for display and identity only; the server alone
//! decides whether a credential is still good.

use std::{fmt, sync::Arc};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    core::{action::Action, db::CredentialStore, model::AccountId, store::Store},
    error::ClientError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Claims {
    #[serde(alias = "accountId")]
    pub account_id: AccountId,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl Claims {
    pub fn issued_at_time(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.issued_at).ok()
    }

    pub fn expires_at_time(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.expires_at).ok()
    }
}

/// A bearer token together with its decoded claims.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    claims: Claims,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("claims", &self.claims)
            .finish()
    }
}

impl Credential {
    /// Reads the claims segment of a JWT-shaped token without checking its
    /// signature or expiry. A leading `Bearer ` is stripped.
    pub fn decode(token: &str) -> Result<Self, ClientError> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        let payload = token
            .split('.')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| ClientError::MalformedCredential("missing claims segment".into()))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|err| ClientError::MalformedCredential(err.to_string()))?;
        let claims = serde_json::from_slice(&bytes)
            .map_err(|err| ClientError::MalformedCredential(err.to_string()))?;
        Ok(Self {
            token: token.to_string(),
            claims,
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

/// Token and claims are present together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    credential: Option<Credential>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.credential.as_ref().map(Credential::token)
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.credential.as_ref().map(Credential::claims)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    Authenticate(Credential),
    /// Replaces the claims of the held credential; ignored while logged out.
    SetAuthentication(Claims),
    Clear,
}

pub(crate) fn reduce(state: &Arc<Session>, action: &SessionAction) -> Arc<Session> {
    match action {
        SessionAction::Authenticate(credential) => Arc::new(Session {
            credential: Some(credential.clone()),
        }),
        SessionAction::SetAuthentication(claims) => match &state.credential {
            Some(credential) if credential.claims != *claims => Arc::new(Session {
                credential: Some(Credential {
                    token: credential.token.clone(),
                    claims: *claims,
                }),
            }),
            Some(_) => Arc::clone(state),
            None => {
                warn!("ignoring claims update without a credential");
                Arc::clone(state)
            }
        },
        SessionAction::Clear if state.credential.is_none() => Arc::clone(state),
        SessionAction::Clear => Arc::new(Session::default()),
    }
}

/// Persists a freshly issued credential and authenticates the session. Must
/// run before any authenticated request.
pub async fn acquire<S: CredentialStore>(
    store: &mut Store,
    storage: &S,
    token: &str,
) -> Result<Claims, ClientError> {
    let credential = Credential::decode(token)?;
    storage.save(credential.token()).await?;
    let claims = *credential.claims();
    store.dispatch(Action::Session(SessionAction::Authenticate(credential)));
    info!(account_id = %claims.account_id, "session acquired");
    Ok(claims)
}

/// Drops the durable credential and the in-memory session. Safe to call when
/// already logged out.
pub async fn clear<S: CredentialStore>(store: &mut Store, storage: &S) -> Result<(), ClientError> {
    store.dispatch(Action::Session(SessionAction::Clear));
    storage.remove().await
}

/// Restores the session from durable storage after a restart. Returns whether
/// a credential was found and restored; an unreadable one is discarded.
pub async fn rehydrate<S: CredentialStore>(
    store: &mut Store,
    storage: &S,
) -> Result<bool, ClientError> {
    let Some(token) = storage.load().await? else {
        return Ok(false);
    };
    match Credential::decode(&token) {
        Ok(credential) => {
            info!(account_id = %credential.claims().account_id, "session rehydrated");
            store.dispatch(Action::Session(SessionAction::Authenticate(credential)));
            Ok(true)
        }
        Err(err) => {
            warn!(error = %err, "discarding unreadable stored credential");
            storage.remove().await?;
            Ok(false)
        }
    }
}
