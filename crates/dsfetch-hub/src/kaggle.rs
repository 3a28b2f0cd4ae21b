use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::debug;

use crate::archive::unzip_into;
use crate::client::check_status;
use crate::credentials::KaggleCredentials;
use crate::error::FetchError;
use crate::identifier::KaggleDatasetId;

pub const KAGGLE_API_BASE_URL: &str = "https://www.kaggle.com";

/// The two operations the Kaggle batch needs from the host.
#[async_trait]
pub trait KaggleApi {
    /// Loads credentials. Calling it again is harmless.
    async fn authenticate(&mut self) -> Result<(), FetchError>;

    /// Downloads the dataset archive and unpacks it into `path`.
    async fn dataset_download_files(
        &self,
        dataset: &KaggleDatasetId,
        path: &Path,
    ) -> Result<(), FetchError>;
}

pub struct KaggleClient {
    client: Client,
    base_url: String,
    config_path: PathBuf,
    credentials: Option<KaggleCredentials>,
}

impl KaggleClient {
    pub fn new(client: Client, base_url: impl Into<String>, config_path: PathBuf) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            config_path,
            credentials: None,
        }
    }

    pub fn download_url(&self, dataset: &KaggleDatasetId) -> String {
        format!(
            "{}/api/v1/datasets/download/{}/{}",
            self.base_url.trim_end_matches('/'),
            dataset.owner,
            dataset.name
        )
    }
}

#[async_trait]
impl KaggleApi for KaggleClient {
    async fn authenticate(&mut self) -> Result<(), FetchError> {
        if self.credentials.is_none() {
            self.credentials = Some(KaggleCredentials::load(&self.config_path)?);
        }
        Ok(())
    }

    async fn dataset_download_files(
        &self,
        dataset: &KaggleDatasetId,
        path: &Path,
    ) -> Result<(), FetchError> {
        let credentials = match &self.credentials {
            Some(c) => c.clone(),
            None => KaggleCredentials::load(&self.config_path)?,
        };
        let url = self.download_url(dataset);
        debug!(%url, "Requesting dataset archive");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, credentials.authorization_header())
            .send()
            .await?;
        let response = check_status(response).await?;

        // Stream into a temporary archive next to the destination so it is
        // removed on drop, whatever happens during extraction.
        let mut archive = tempfile::Builder::new()
            .prefix(".download-")
            .suffix(".zip")
            .tempfile_in(path)?;
        let mut received = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            received += chunk.len() as u64;
            archive.write_all(&chunk)?;
        }
        archive.flush()?;
        debug!(bytes = received, "Archive downloaded");

        let entries = unzip_into(archive.path(), path)?;
        debug!(entries, dir = %path.display(), "Archive unpacked");
        Ok(())
    }
}
