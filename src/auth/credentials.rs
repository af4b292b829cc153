//! Credential pair model and file-backed storage.
//!
//! Credentials are stored as JSON in `~/.realit/credentials.json` unless a
//! different path is configured. The file always holds both halves of the
//! pair; a file carrying only one half is read as "no credentials".

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::traits::CredentialsError;

/// The credentials directory name.
const CREDENTIALS_DIR: &str = ".realit";

/// The credentials file name.
const CREDENTIALS_FILE: &str = "credentials.json";

/// Which half of a [`CredentialPair`] to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Access,
    Refresh,
}

/// Access and refresh bearer tokens. Both are always present.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    pub access: String,
    pub refresh: String,
}

impl CredentialPair {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Build a pair from two optional halves. Returns `None` unless both are
    /// present and non-empty.
    pub fn from_parts(access: Option<String>, refresh: Option<String>) -> Option<Self> {
        match (access, refresh) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                Some(Self { access, refresh })
            }
            _ => None,
        }
    }

    pub fn get(&self, kind: CredentialKind) -> &str {
        match kind {
            CredentialKind::Access => &self.access,
            CredentialKind::Refresh => &self.refresh,
        }
    }

    /// Seconds until the access token expires, if it is a JWT with an `exp`
    /// claim. Zero for tokens that have already expired.
    pub fn access_expires_in(&self) -> Option<u64> {
        jwt_expires_in(&self.access)
    }
}

// Tokens never appear in logs.
impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct JwtClaims {
    exp: i64,
}

/// Extract the remaining lifetime of a JWT from its `exp` claim.
///
/// Returns `None` if the token is not a JWT or carries no `exp` claim.
pub fn jwt_expires_in(token: &str) -> Option<u64> {
    let payload = token.split('.').nth(1)?;
    let payload = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: JwtClaims = serde_json::from_slice(&payload).ok()?;
    let now = Utc::now().timestamp();
    Some((claims.exp - now).max(0) as u64)
}

/// On-disk representation. Halves are optional so a damaged or hand-edited
/// file is still readable; [`CredentialsManager::load`] enforces the pair
/// invariant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct StoredCredentials {
    access_token: Option<String>,
    refresh_token: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

/// Manages the credentials file.
#[derive(Debug, Clone)]
pub struct CredentialsManager {
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Create a manager for the default location under the home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::with_path(home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE)))
    }

    /// Create a manager for an explicit file path.
    pub fn with_path(credentials_path: PathBuf) -> Self {
        Self { credentials_path }
    }

    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Load the stored pair.
    ///
    /// Missing files are `Ok(None)`. Files holding only one half are also
    /// `Ok(None)`.
    pub fn load(&self) -> Result<Option<CredentialPair>, CredentialsError> {
        if !self.credentials_path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.credentials_path)
            .map_err(|e| CredentialsError::LoadFailed(e.to_string()))?;
        let stored: StoredCredentials = serde_json::from_reader(BufReader::new(file))?;

        let pair = CredentialPair::from_parts(stored.access_token, stored.refresh_token);
        if pair.is_none() {
            debug!(
                "Credentials file {:?} does not hold a complete pair",
                self.credentials_path
            );
        }
        Ok(pair)
    }

    /// Save the pair, replacing whatever was stored.
    ///
    /// Writes to a sibling temp file and renames it into place so readers
    /// never observe a partially written pair.
    pub fn save(&self, pair: &CredentialPair) -> Result<(), CredentialsError> {
        if let Some(parent) = self.credentials_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
            }
        }

        let stored = StoredCredentials {
            access_token: Some(pair.access.clone()),
            refresh_token: Some(pair.refresh.clone()),
            updated_at: Some(Utc::now()),
        };

        let tmp_path = self.credentials_path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)
                .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
            restrict_permissions(&file);
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &stored)?;
            writer
                .flush()
                .map_err(|e| CredentialsError::SaveFailed(e.to_string()))?;
        }

        fs::rename(&tmp_path, &self.credentials_path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            CredentialsError::SaveFailed(e.to_string())
        })
    }

    /// Remove the credentials file. Succeeds if the file does not exist.
    pub fn clear(&self) -> Result<(), CredentialsError> {
        match fs::remove_file(&self.credentials_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialsError::ClearFailed(e.to_string())),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(file: &File) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
        warn!("Could not restrict credentials file permissions: {}", e);
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) {}
