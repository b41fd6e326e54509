//! Authentication Module
//!
//! Session store: bearer token and user profile, persisted to local storage.

use tracing::{info, warn};

use crate::api::auth::{LoginRequest, LoginResponse, UserInfo};
use crate::api::{ApiClient, ApiError};
use crate::role::{self, Role};
use crate::storage::{LocalStorage, StorageError, TOKEN_KEY, USER_KEY};

/// Snapshot of the session consulted by the navigation guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    pub logged_in: bool,
    pub role: Option<Role>,
}

impl SessionState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(role: Role) -> Self {
        Self {
            logged_in: true,
            role: Some(role),
        }
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.role.is_some_and(|r| roles.contains(&r))
    }
}

/// Holds the authenticated session
///
/// The API client shares the token so every request made through it carries
/// the current bearer credential.
pub struct SessionStore {
    api: ApiClient,
    storage: LocalStorage,
    token: String,
    user_info: Option<UserInfo>,
}

impl SessionStore {
    /// Restore the session persisted in `storage`
    pub fn new(api: ApiClient, storage: LocalStorage) -> Self {
        let token = match storage.get_item(TOKEN_KEY) {
            Ok(token) => token.unwrap_or_default(),
            Err(e) => {
                warn!("Failed to read stored token: {}", e);
                String::new()
            }
        };

        let user_info = match storage.load::<UserInfo>(USER_KEY) {
            Ok(user) => user,
            Err(e) => {
                warn!("Discarding unreadable stored profile: {}", e);
                None
            }
        };

        api.set_token(Some(token.clone()));

        if !token.is_empty() {
            info!("Restored session for user: {:?}", user_info.as_ref().map(|u| &u.username));
        }

        Self {
            api,
            storage,
            token,
            user_info,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_info(&self) -> Option<&UserInfo> {
        self.user_info.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        !self.token.is_empty()
    }

    pub fn user_role(&self) -> Option<Role> {
        self.user_info.as_ref().map(|u| u.role)
    }

    pub fn user_name(&self) -> &str {
        self.user_info.as_ref().map(|u| u.name.as_str()).unwrap_or("")
    }

    pub fn user_id(&self) -> i64 {
        self.user_info.as_ref().map(|u| u.id).unwrap_or(0)
    }

    pub fn must_change_password(&self) -> bool {
        self.user_info
            .as_ref()
            .map(|u| u.must_change_password)
            .unwrap_or(false)
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            logged_in: self.is_logged_in(),
            role: self.user_role(),
        }
    }

    /// Authenticate and persist the returned session
    pub async fn login(&mut self, credentials: &LoginRequest) -> Result<LoginResponse, SessionError> {
        let response = self.api.auth().login(credentials).await?;

        self.storage.set_item(TOKEN_KEY, &response.token)?;
        if let Err(e) = self.storage.save(USER_KEY, &response.user_info) {
            self.restore_stored_token();
            return Err(e.into());
        }

        self.token = response.token.clone();
        self.user_info = Some(response.user_info.clone());
        self.api.set_token(Some(self.token.clone()));

        info!("Session set for user: {}", response.user_info.username);
        Ok(response)
    }

    /// Drop the session locally
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.token.clear();
        self.user_info = None;
        self.api.set_token(None);

        self.storage.remove_item(TOKEN_KEY)?;
        self.storage.remove_item(USER_KEY)?;

        info!("Session cleared");
        Ok(())
    }

    /// Refetch the profile and overwrite the cached copy
    pub async fn get_user_info(&mut self) -> Result<UserInfo, SessionError> {
        let user = match self.api.auth().get_user_info().await {
            Ok(user) => user,
            Err(e) => return Err(self.expire_on_unauthorized(e)),
        };

        self.user_info = Some(user.clone());
        self.storage.save(USER_KEY, &user)?;
        Ok(user)
    }

    /// Exchange the current token for a fresh one
    pub async fn refresh_token(&mut self) -> Result<String, SessionError> {
        if !self.is_logged_in() {
            return Err(SessionError::NotLoggedIn);
        }

        let refreshed = match self.api.auth().refresh_token(&self.token).await {
            Ok(refreshed) => refreshed,
            Err(e) => return Err(self.expire_on_unauthorized(e)),
        };

        self.token = refreshed.token.clone();
        self.api.set_token(Some(self.token.clone()));
        self.storage.set_item(TOKEN_KEY, &refreshed.token)?;

        info!("Session token refreshed");
        Ok(refreshed.token)
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        self.state().has_role(roles)
    }

    /// Whether the current role ranks at least as high as `required`
    pub fn has_permission(&self, required: Option<Role>) -> bool {
        role::satisfies(self.user_role(), required)
    }

    /// Put the token file back in line with the in-memory session
    fn restore_stored_token(&self) {
        let restored = if self.token.is_empty() {
            self.storage.remove_item(TOKEN_KEY)
        } else {
            self.storage.set_item(TOKEN_KEY, &self.token)
        };
        if let Err(e) = restored {
            warn!("Failed to roll back stored token: {}", e);
        }
    }

    fn expire_on_unauthorized(&mut self, error: ApiError) -> SessionError {
        if error.is_unauthorized() && self.is_logged_in() {
            warn!("Server rejected the session token, logging out");
            if let Err(e) = self.logout() {
                warn!("Failed to clear expired session: {}", e);
            }
        }
        SessionError::Api(error)
    }
}

/// Session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Not logged in")]
    NotLoggedIn,
}
