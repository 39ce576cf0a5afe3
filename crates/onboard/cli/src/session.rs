//! Local session store.
//!
//! Holds the signed-in user id and bearer token between invocations, in a
//! TOML file under the user config directory.

use std::fs;
use std::path::{Path, PathBuf};

use onboard_types::AuthContext;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Persisted credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub auth_token: String,
}

impl Session {
    pub fn auth(&self) -> AuthContext {
        AuthContext::new(self.user_id.clone(), self.auth_token.clone())
    }
}

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at `<config dir>/onboard/session.toml`.
    pub fn open_default() -> CliResult<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(Self::at(config_dir.join("onboard").join("session.toml")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved session, if any.
    pub fn load(&self) -> CliResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)?;
        let session: Session =
            toml::from_str(&contents).map_err(|e| CliError::Session(e.to_string()))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> CliResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(session).map_err(|e| CliError::Session(e.to_string()))?;
        fs::write(&self.path, contents)?;
        restrict_permissions(&self.path)?;

        debug!(path = %self.path.display(), "Saved session");
        Ok(())
    }

    /// Remove the session file. Returns whether one existed.
    pub fn clear(&self) -> CliResult<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)?;
        Ok(true)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> CliResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_: &Path) -> CliResult<()> {
    Ok(())
}

/// Credentials from flags or environment, topped up from the saved session.
///
/// Returns an incomplete context when nothing is available; evaluation then
/// reports baseline progress without touching the network.
pub fn resolve_auth(
    user_id: Option<String>,
    auth_token: Option<String>,
    store: &SessionStore,
) -> CliResult<AuthContext> {
    if let (Some(user_id), Some(auth_token)) = (&user_id, &auth_token) {
        return Ok(AuthContext::new(user_id.clone(), auth_token.clone()));
    }

    let saved = store.load()?;
    let user_id = user_id
        .or_else(|| saved.as_ref().map(|s| s.user_id.clone()))
        .unwrap_or_default();
    let auth_token = auth_token
        .or_else(|| saved.map(|s| s.auth_token))
        .unwrap_or_default();

    Ok(AuthContext::new(user_id, auth_token))
}
