use std::path::PathBuf;

use crate::credentials::{default_fallback_paths, default_kaggle_config_path};
use crate::error::FetchError;
use crate::hub::{default_token_path, HF_DATASETS_SERVER_BASE_URL};
use crate::kaggle::KAGGLE_API_BASE_URL;

/// Root of the output tree, relative to the working directory.
pub const DATASETS_DIR: &str = "datasets";

pub const KAGGLE_DATASETS: &[&str] = &[
    "ferdiansakti/gambling-comments-from-youtube-platform",
    "yaemico/judionline",
    "yaemico/deteksi-judi-online",
];

pub const HUB_DATASETS: &[&str] = &[
    "indirapravianti/online_gambling_yt_comments",
    "KagChi/indonesian-gambling-words",
];

/// Everything a run needs. There is no user-facing configuration; the binary
/// runs with [`Settings::hardcoded`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub output_root: PathBuf,
    pub kaggle_datasets: Vec<String>,
    pub hub_datasets: Vec<String>,
    pub kaggle_base_url: String,
    pub hub_base_url: String,
    /// Where the Kaggle client expects `kaggle.json`.
    pub kaggle_config_path: PathBuf,
    /// Bundled copies of `kaggle.json`, tried in order.
    pub kaggle_fallback_paths: Vec<PathBuf>,
    pub hub_token_path: Option<PathBuf>,
}

impl Settings {
    /// The hardcoded run: fixed dataset lists and the per-user credential
    /// locations. Fails only when the home directory is unknown.
    pub fn hardcoded() -> Result<Self, FetchError> {
        Ok(Self {
            output_root: PathBuf::from(DATASETS_DIR),
            kaggle_datasets: KAGGLE_DATASETS.iter().map(|s| s.to_string()).collect(),
            hub_datasets: HUB_DATASETS.iter().map(|s| s.to_string()).collect(),
            kaggle_base_url: KAGGLE_API_BASE_URL.to_string(),
            hub_base_url: HF_DATASETS_SERVER_BASE_URL.to_string(),
            kaggle_config_path: default_kaggle_config_path()?,
            kaggle_fallback_paths: default_fallback_paths(),
            hub_token_path: default_token_path(),
        })
    }
}
