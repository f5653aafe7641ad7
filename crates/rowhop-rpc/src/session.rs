use crate::{error::RpcError, transport::Transport};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json, json};

///
/// Profile
///
/// Connection settings for one service instance. The secret (password or
/// API key) lives in memory only; persisting it is never this crate's job.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Profile {
    pub url: String,
    pub db: String,
    pub username: String,
    #[serde(default, skip_serializing)]
    pub secret: String,
    /// Context merged into every object call (e.g. company pinning).
    #[serde(default)]
    pub context: Map<String, Json>,
}

///
/// Session
///
/// Authenticated identity bound to one transport.
///

pub struct Session {
    pub(crate) transport: Transport,
    pub(crate) db: String,
    pub(crate) uid: i64,
    pub(crate) secret: String,
    pub(crate) context: Map<String, Json>,
    username: String,
}

impl Session {
    /// Authenticate against the common service and bind a session.
    pub fn authenticate(profile: &Profile) -> Result<Self, RpcError> {
        let transport = Transport::new(&profile.url)?;
        let result = transport.call(
            "common",
            "authenticate",
            vec![
                json!(profile.db),
                json!(profile.username),
                json!(profile.secret),
                json!({}),
            ],
        )?;

        // Wrong credentials come back as `false`, not as an error.
        let uid = result
            .as_i64()
            .filter(|uid| *uid > 0)
            .ok_or_else(|| RpcError::Auth {
                username: profile.username.clone(),
            })?;
        tracing::info!(db = %profile.db, username = %profile.username, uid, "authenticated");

        Ok(Self {
            transport,
            db: profile.db.clone(),
            uid,
            secret: profile.secret.clone(),
            context: profile.context.clone(),
            username: profile.username.clone(),
        })
    }

    #[must_use]
    pub const fn uid(&self) -> i64 {
        self.uid
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }
}
