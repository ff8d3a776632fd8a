use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Bearer credential for the external order-management API.
///
/// Acquired once per finalize call and read-only afterwards; every
/// concurrent submission in the call shares the same token.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub bearer: String,
    pub acquired_at: DateTime<Utc>,
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Exchange the stored refresh credential for a bearer token.
    /// Fails when no refresh credential has been configured.
    async fn acquire_session(
        &self,
    ) -> Result<SessionToken, Box<dyn std::error::Error + Send + Sync>>;
}

/// Session provider backed by a statically configured refresh credential.
/// The real token-refresh transport lives behind this seam.
pub struct StaticSessionProvider {
    refresh_credential: Option<String>,
}

impl StaticSessionProvider {
    pub fn new(refresh_credential: Option<String>) -> Self {
        Self { refresh_credential }
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn acquire_session(
        &self,
    ) -> Result<SessionToken, Box<dyn std::error::Error + Send + Sync>> {
        let credential = self
            .refresh_credential
            .as_deref()
            .ok_or("no refresh credential configured for the order API")?;

        tracing::debug!("Acquired order API session");
        Ok(SessionToken {
            bearer: format!("session-{}", credential),
            acquired_at: Utc::now(),
        })
    }
}
