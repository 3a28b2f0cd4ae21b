use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::FetchError;

pub const KAGGLE_CONFIG_DIR: &str = ".kaggle";
pub const KAGGLE_CONFIG_FILE: &str = "kaggle.json";

/// Per-user location the Kaggle tooling reads its API token from.
pub fn default_kaggle_config_path() -> Result<PathBuf, FetchError> {
    let mut path = dirs::home_dir().ok_or(FetchError::HomeDirUnknown)?;
    path.push(KAGGLE_CONFIG_DIR);
    path.push(KAGGLE_CONFIG_FILE);
    Ok(path)
}

/// Places a bundled `kaggle.json` is looked for, in order: the working
/// directory, then the directory holding the executable.
pub fn default_fallback_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(KAGGLE_CONFIG_FILE)];
    if let Some(dir) = env::current_exe().ok().as_deref().and_then(Path::parent) {
        let bundled = dir.join(KAGGLE_CONFIG_FILE);
        if !paths.contains(&bundled) {
            paths.push(bundled);
        }
    }
    paths
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioned {
    AlreadyPresent,
    Copied { from: PathBuf },
}

#[derive(Debug, Clone)]
pub struct CredentialProvisioner {
    expected: PathBuf,
    fallbacks: Vec<PathBuf>,
}

impl CredentialProvisioner {
    pub fn new(expected: PathBuf, fallbacks: Vec<PathBuf>) -> Self {
        Self { expected, fallbacks }
    }

    pub fn expected(&self) -> &Path {
        &self.expected
    }

    /// Makes sure a credential file exists at the expected location.
    ///
    /// An existing file is never touched. Otherwise the first fallback that
    /// exists is copied there and restricted to owner read/write. With
    /// neither available this returns [`FetchError::MissingCredentials`].
    pub fn provision(&self) -> Result<Provisioned, FetchError> {
        if self.expected.exists() {
            return Ok(Provisioned::AlreadyPresent);
        }

        let source = self
            .fallbacks
            .iter()
            .find(|p| p.is_file())
            .ok_or_else(|| FetchError::MissingCredentials {
                expected: self.expected.clone(),
                searched: self.fallbacks.clone(),
            })?;

        if let Some(parent) = self.expected.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, &self.expected)?;
        restrict_to_owner(&self.expected)?;

        info!(from = %source.display(), to = %self.expected.display(), "Copied credential file");
        Ok(Provisioned::Copied {
            from: source.clone(),
        })
    }
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[derive(Clone, Deserialize)]
pub struct KaggleCredentials {
    pub username: String,
    pub key: String,
}

impl std::fmt::Debug for KaggleCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KaggleCredentials")
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl KaggleCredentials {
    pub fn load(path: &Path) -> Result<Self, FetchError> {
        warn_if_shared(path);
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn authorization_header(&self) -> String {
        let token = BASE64.encode(format!("{}:{}", self.username, self.key));
        format!("Basic {}", token)
    }
}

#[cfg(unix)]
fn warn_if_shared(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(meta) = fs::metadata(path) {
        let mode = meta.permissions().mode();
        if mode & 0o077 != 0 {
            warn!(path = %path.display(), mode = %format!("{:o}", mode & 0o777), "Credential file is readable by other users");
        }
    }
}

#[cfg(not(unix))]
fn warn_if_shared(_path: &Path) {}
