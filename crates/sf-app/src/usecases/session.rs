//! Signed-in state for students and the admin gate.
//!
//! Identity lives in memory and is mirrored to durable client storage so a
//! restart can pick it up again with [`AuthSession::restore`].

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{info, info_span, warn, Instrument};

use sf_core::api::{endpoints, ApiError};
use sf_core::ports::{ApiTransportExt, ApiTransportPort, ClientStoragePort};
use sf_core::session::{
    AccessError, AdminSession, AuthIdentity, AuthTokenResponse, CurrentUser, LoginRequest,
    ProfileUpdate, RegisterRequest, ADMIN_SESSION_KEY, AUTH_TOKEN_KEY, STUDENT_KEY,
};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("not signed in")]
    NotAuthenticated,
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("failed to encode session record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("session storage failed: {0}")]
    Storage(#[source] anyhow::Error),
}

async fn store_token(storage: &dyn ClientStoragePort, token: &str) -> Result<(), SessionError> {
    storage
        .set(AUTH_TOKEN_KEY, Value::String(token.to_string()))
        .await
        .map_err(SessionError::Storage)
}

pub struct AuthSession {
    api: Arc<dyn ApiTransportPort>,
    storage: Arc<dyn ClientStoragePort>,
    current: RwLock<Option<AuthIdentity>>,
}

impl AuthSession {
    pub fn new(api: Arc<dyn ApiTransportPort>, storage: Arc<dyn ClientStoragePort>) -> Self {
        Self {
            api,
            storage,
            current: RwLock::new(None),
        }
    }

    pub async fn current(&self) -> Option<AuthIdentity> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Reload the identity saved by a previous run.
    ///
    /// Needs both a token and a readable identity record; anything less
    /// counts as signed out.
    pub async fn restore(&self) -> Result<Option<AuthIdentity>, SessionError> {
        let token = self
            .storage
            .get_string(AUTH_TOKEN_KEY)
            .await
            .map_err(SessionError::Storage)?;
        let stored = self
            .storage
            .get(STUDENT_KEY)
            .await
            .map_err(SessionError::Storage)?;

        let identity = match (token, stored) {
            (Some(_), Some(value)) => match serde_json::from_value::<AuthIdentity>(value) {
                Ok(identity) => Some(identity),
                Err(err) => {
                    warn!(error = %err, "Stored identity is unreadable, treating as signed out");
                    None
                }
            },
            _ => None,
        };

        *self.current.write().await = identity.clone();
        Ok(identity)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthIdentity, SessionError> {
        let email = email.trim();
        let span = info_span!("usecase.session.login", email = %email);

        async {
            let request = LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
                remember_me: false,
            };
            let token: AuthTokenResponse = self
                .api
                .post(endpoints::AUTH_LOGIN, &request)
                .await?
                .into_json()?;
            let identity = self.establish(token, email).await?;
            info!(user_id = %identity.id, "Signed in");
            Ok(identity)
        }
        .instrument(span)
        .await
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthIdentity, SessionError> {
        let span = info_span!("usecase.session.register", email = %request.email);

        async {
            let token: AuthTokenResponse = self
                .api
                .post(endpoints::AUTH_REGISTER, &request)
                .await?
                .into_json()?;
            let identity = self.establish(token, &request.email).await?;
            info!(user_id = %identity.id, "Account registered");
            Ok(identity)
        }
        .instrument(span)
        .await
    }

    /// Tell the server, then forget everything locally whatever it said.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let span = info_span!("usecase.session.logout");

        async {
            let has_token = matches!(self.storage.get_string(AUTH_TOKEN_KEY).await, Ok(Some(_)));
            if has_token {
                if let Err(err) = self.api.post(endpoints::AUTH_LOGOUT, &serde_json::json!({})).await {
                    warn!(error = %err, "Server logout failed, clearing local session anyway");
                }
            }

            *self.current.write().await = None;
            let token_removed = self.storage.remove(AUTH_TOKEN_KEY).await;
            let identity_removed = self.storage.remove(STUDENT_KEY).await;
            token_removed
                .and(identity_removed)
                .map_err(SessionError::Storage)?;
            info!("Signed out");
            Ok(())
        }
        .instrument(span)
        .await
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<AuthIdentity, SessionError> {
        let span = info_span!("usecase.session.update_profile");

        async {
            let mut identity = self.current().await.ok_or(SessionError::NotAuthenticated)?;
            let response = self.api.patch(endpoints::STUDENTS_ME, &update).await?;
            match response.json::<AuthIdentity>() {
                Ok(server) => identity = server,
                Err(_) => identity.apply(&update),
            }
            self.persist(&identity).await?;
            Ok(identity)
        }
        .instrument(span)
        .await
    }

    async fn establish(
        &self,
        token: AuthTokenResponse,
        email: &str,
    ) -> Result<AuthIdentity, SessionError> {
        let AuthTokenResponse {
            access_token,
            user_id,
            user,
        } = token;
        store_token(self.storage.as_ref(), &access_token).await?;

        let profile = match self.api.get(endpoints::STUDENTS_ME).await {
            Ok(response) => response.into_json::<AuthIdentity>(),
            Err(err) => Err(err),
        };
        let identity = match profile {
            Ok(identity) => identity,
            Err(err) => {
                warn!(error = %err, "Profile load after sign-in failed, using minimal identity");
                user.unwrap_or_else(|| AuthIdentity::minimal(user_id, email))
            }
        };

        self.persist(&identity).await?;
        Ok(identity)
    }

    async fn persist(&self, identity: &AuthIdentity) -> Result<(), SessionError> {
        self.storage
            .set(STUDENT_KEY, serde_json::to_value(identity)?)
            .await
            .map_err(SessionError::Storage)?;
        *self.current.write().await = Some(identity.clone());
        Ok(())
    }
}

/// Admin-only screens check this before loading anything.
pub struct AdminGate {
    api: Arc<dyn ApiTransportPort>,
    storage: Arc<dyn ClientStoragePort>,
}

impl AdminGate {
    pub fn new(api: Arc<dyn ApiTransportPort>, storage: Arc<dyn ClientStoragePort>) -> Self {
        Self { api, storage }
    }

    /// Sign in and keep the session only when the account is an admin.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminSession, SessionError> {
        let email = email.trim();
        let span = info_span!("usecase.admin_gate.login", email = %email);

        async {
            let request = LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
                remember_me: false,
            };
            let token: AuthTokenResponse = self
                .api
                .post(endpoints::AUTH_LOGIN, &request)
                .await?
                .into_json()?;
            store_token(self.storage.as_ref(), &token.access_token).await?;

            match self.open_session().await {
                Ok(session) => {
                    info!("Admin signed in");
                    Ok(session)
                }
                Err(err) => {
                    // No admin session without a token, and no token without one.
                    if let Err(cleanup) = self.sign_out().await {
                        warn!(error = %cleanup, "Failed to clear token after admin sign-in failed");
                    }
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn open_session(&self) -> Result<AdminSession, SessionError> {
        let user: CurrentUser = self.api.get(endpoints::AUTH_ME).await?.into_json()?;
        let session = AdminSession {
            email: user.email,
            role: user.role,
        };
        if let Err(denied) = session.require_admin() {
            warn!(role = ?session.role, "Non-admin account tried to open the dashboard");
            return Err(denied.into());
        }

        self.storage
            .set(ADMIN_SESSION_KEY, serde_json::to_value(&session)?)
            .await
            .map_err(SessionError::Storage)?;
        Ok(session)
    }

    pub async fn require_admin(&self) -> Result<AdminSession, SessionError> {
        let stored = self
            .storage
            .get(ADMIN_SESSION_KEY)
            .await
            .map_err(SessionError::Storage)?
            .ok_or(AccessError::NotSignedIn)?;
        let session: AdminSession = serde_json::from_value(stored).map_err(|err| {
            warn!(error = %err, "Stored admin session is unreadable");
            AccessError::NotSignedIn
        })?;
        session.require_admin()?;
        Ok(session)
    }

    pub async fn sign_out(&self) -> Result<(), SessionError> {
        let session_removed = self.storage.remove(ADMIN_SESSION_KEY).await;
        let token_removed = self.storage.remove(AUTH_TOKEN_KEY).await;
        session_removed
            .and(token_removed)
            .map_err(SessionError::Storage)
    }
}
