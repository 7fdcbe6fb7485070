//! Local session cache.
//!
//! Holds either the demo session or the tokens the backend issued at sign-in.
//! Nothing here is an identity of its own: a backend session is re-validated
//! against the backend before use.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::{
    Config,
    account::{AuthSession, AuthUser, Profile},
    demo::demo_user_data,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoSession {
    pub started_at: DateTime<Utc>,
    pub user: AuthUser,
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct SessionState {
    demo_active: bool,
    demo: Option<DemoSession>,
    backend: Option<StoredSession>,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform state directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Config::state_file_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a demo session, replacing any backend session.
    pub fn create_demo_session(&self) -> Result<DemoSession> {
        let data = demo_user_data();
        let session = DemoSession {
            started_at: Utc::now(),
            user: data.user,
            profile: data.profile,
        };

        self.write(&SessionState {
            demo_active: true,
            demo: Some(session.clone()),
            backend: None,
        })?;
        debug!(path = %self.path.display(), "demo session created");
        Ok(session)
    }

    pub fn demo_session(&self) -> Option<DemoSession> {
        let state = self.read_or_default();
        if state.demo_active { state.demo } else { None }
    }

    pub fn is_demo_session_active(&self) -> bool {
        self.demo_session().is_some()
    }

    pub fn clear_demo_session(&self) -> Result<()> {
        let state = self.read_or_default();
        self.write(&SessionState {
            demo_active: false,
            demo: None,
            ..state
        })
    }

    /// Cache the backend session, replacing any demo session.
    pub fn store_backend_session(&self, session: &AuthSession) -> Result<()> {
        let stored = StoredSession {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            user_id: session.user.id.clone(),
            email: session.user.email.clone(),
            stored_at: Utc::now(),
        };
        self.write(&SessionState {
            demo_active: false,
            demo: None,
            backend: Some(stored),
        })
    }

    pub fn backend_session(&self) -> Option<StoredSession> {
        self.read_or_default().backend
    }

    pub fn clear_backend_session(&self) -> Result<()> {
        let state = self.read_or_default();
        self.write(&SessionState {
            backend: None,
            ..state
        })
    }

    fn read(&self) -> Result<SessionState> {
        if !self.path.exists() {
            return Ok(SessionState::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse session file: {}", self.path.display()))
    }

    /// A corrupt session file reads as "signed out".
    fn read_or_default(&self) -> SessionState {
        self.read().unwrap_or_else(|err| {
            warn!(error = %format!("{err:#}"), "ignoring unreadable session file");
            SessionState::default()
        })
    }

    fn write(&self, state: &SessionState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(state).context("Failed to serialize session state")?;
        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))
    }
}
