//! Authentication collaborator
//!
//! The real provider (an external managed service) is behind the
//! [`AuthProvider`] trait. The engine treats "no session" as a recognized
//! state that gates flight selection and booking and redirects to a login
//! view; it is never surfaced as an error.

use crate::error::AuthResult;
use crate::types::UserId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// OAuth provider offered on the login view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
}

/// An authenticated session as reported by the auth backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthSession {
    /// Session for a user id, without profile details
    pub fn for_user(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
        }
    }
}

/// Trait for the external authentication service
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The current session, if the user is signed in
    async fn current_session(&self) -> Option<AuthSession>;

    /// Start a sign-in flow with the given provider
    async fn sign_in(&self, provider: OAuthProvider) -> AuthResult<()>;

    /// End the current session
    async fn sign_out(&self) -> AuthResult<()>;

    /// Whether the provider is still resolving the initial session
    async fn is_loading(&self) -> bool {
        false
    }
}

/// In-memory auth provider for tests and demos.
///
/// Sign-in installs a fixed session instead of running an OAuth flow.
#[derive(Clone)]
pub struct MockAuth {
    session: Arc<RwLock<Option<AuthSession>>>,
}

impl MockAuth {
    /// Start signed out
    pub fn signed_out() -> Self {
        Self {
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// Start with an active session for the given user
    pub fn signed_in(user_id: impl Into<UserId>) -> Self {
        Self {
            session: Arc::new(RwLock::new(Some(AuthSession::for_user(user_id)))),
        }
    }

    /// Install a session directly
    pub async fn set_session(&self, session: Option<AuthSession>) {
        *self.session.write().await = session;
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    async fn current_session(&self) -> Option<AuthSession> {
        self.session.read().await.clone()
    }

    async fn sign_in(&self, provider: OAuthProvider) -> AuthResult<()> {
        info!(?provider, "mock sign-in");
        let mut session = self.session.write().await;
        if session.is_none() {
            *session = Some(AuthSession::for_user("mock-user"));
        }
        Ok(())
    }

    async fn sign_out(&self) -> AuthResult<()> {
        info!("mock sign-out");
        *self.session.write().await = None;
        Ok(())
    }
}
