//! Signed-in session and the auth modal, passed explicitly to whatever needs
//! them.
//!
//! A [`SessionContext`] is created at startup (optionally restoring a stored
//! session), hands out authenticated gateways while signed in, and is torn
//! down by [`SessionContext::logout`].

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rollcall_core::config::ApiConfig;
use rollcall_core::error::{Result, RollcallError};
use rollcall_core::gateway::{AuthGateway, HttpGateway};
use rollcall_core::models::auth::{AuthResponse, AuthUser};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const SESSION_FILE: &str = "session.json";

/// Bearer token plus the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: AuthUser,
}

impl From<AuthResponse> for Session {
    fn from(resp: AuthResponse) -> Self {
        Self {
            token: resp.token,
            user: resp.user,
        }
    }
}

/// Where a serialized session survives restarts.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, value: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    value: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.value
            .lock()
            .map_err(|_| RollcallError::Config("token store lock poisoned".into()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, value: &str) -> Result<()> {
        *self.slot()? = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot()? = None;
        Ok(())
    }
}

/// Stores the session as JSON in `<dir>/session.json`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, value)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Which auth dialog is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthModal {
    #[default]
    Closed,
    Login,
    Signup,
}

pub struct SessionContext<S: TokenStore> {
    api: ApiConfig,
    store: S,
    session: Option<Session>,
    pub modal: AuthModal,
}

impl<S: TokenStore> SessionContext<S> {
    /// A signed-out context.
    pub fn new(api: ApiConfig, store: S) -> Self {
        Self {
            api,
            store,
            session: None,
            modal: AuthModal::Closed,
        }
    }

    /// Reload a stored session. Anything unreadable is cleared and the
    /// context starts signed out.
    pub fn restore(api: ApiConfig, store: S) -> Result<Self> {
        let mut ctx = Self::new(api, store);
        let Some(raw) = ctx.store.load()? else {
            return Ok(ctx);
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if !session.token.trim().is_empty() => {
                debug!(user = %session.user.email, "Restored stored session");
                ctx.session = Some(session);
            }
            Ok(_) => {
                warn!("Stored session has no token; clearing");
                ctx.store.clear()?;
            }
            Err(e) => {
                warn!(error = %e, "Stored session is corrupt; clearing");
                ctx.store.clear()?;
            }
        }
        Ok(ctx)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn open_login(&mut self) {
        self.modal = AuthModal::Login;
    }

    pub fn open_signup(&mut self) {
        self.modal = AuthModal::Signup;
    }

    pub fn close_modal(&mut self) {
        self.modal = AuthModal::Closed;
    }

    /// Gateway for the login and signup calls.
    pub fn anonymous_gateway(&self) -> Result<HttpGateway> {
        HttpGateway::from_config(&self.api)
    }

    /// Gateway carrying the session's bearer token.
    pub fn gateway(&self) -> Result<HttpGateway> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| RollcallError::Auth("not signed in".into()))?;
        Ok(HttpGateway::from_config(&self.api)?.with_token(&session.token))
    }

    pub async fn login<A>(&mut self, auth: &A, email: &str, password: &str) -> Result<&Session>
    where
        A: AuthGateway + ?Sized,
    {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(RollcallError::invalid("email", "Email and password are required"));
        }
        let resp = auth.login(email, password).await?;
        self.establish(resp.into())
    }

    pub async fn signup<A>(
        &mut self,
        auth: &A,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<&Session>
    where
        A: AuthGateway + ?Sized,
    {
        let email = email.trim();
        if email.is_empty() || password.is_empty() || name.trim().is_empty() {
            return Err(RollcallError::invalid(
                "email",
                "Name, email and password are required",
            ));
        }
        let resp = auth.register(email, password, name.trim()).await?;
        self.establish(resp.into())
    }

    fn establish(&mut self, session: Session) -> Result<&Session> {
        let raw = serde_json::to_string(&session)
            .map_err(|e| RollcallError::Decode(format!("failed to encode session: {e}")))?;
        self.store.save(&raw)?;
        info!(user = %session.user.email, "Signed in");
        self.modal = AuthModal::Closed;
        Ok(&*self.session.insert(session))
    }

    /// Forget the session here and in the store.
    pub fn logout(&mut self) -> Result<()> {
        if let Some(session) = self.session.take() {
            info!(user = %session.user.email, "Signed out");
        }
        self.modal = AuthModal::Closed;
        self.store.clear()
    }
}
