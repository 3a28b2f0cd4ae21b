use tracing::info;

use crate::client::create_http_client;
use crate::credentials::CredentialProvisioner;
use crate::downloader::{download_hub_datasets, download_kaggle_datasets, BatchReport};
use crate::error::FetchError;
use crate::hub::{read_token, DatasetHub, HubClient};
use crate::kaggle::{KaggleApi, KaggleClient};
use crate::layout::OutputLayout;
use crate::settings::Settings;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub kaggle: BatchReport,
    pub hub: BatchReport,
}

/// Bootstrap, Kaggle batch, Hub batch, in that order.
pub struct Pipeline<K, H> {
    layout: OutputLayout,
    provisioner: CredentialProvisioner,
    kaggle: K,
    hub: H,
    kaggle_datasets: Vec<String>,
    hub_datasets: Vec<String>,
}

impl Pipeline<KaggleClient, HubClient> {
    pub fn from_settings(settings: Settings) -> Result<Self, FetchError> {
        let http = create_http_client()?;
        let token = settings.hub_token_path.as_deref().and_then(read_token);
        Ok(Self {
            layout: OutputLayout::new(settings.output_root),
            provisioner: CredentialProvisioner::new(
                settings.kaggle_config_path.clone(),
                settings.kaggle_fallback_paths,
            ),
            kaggle: KaggleClient::new(
                http.clone(),
                settings.kaggle_base_url,
                settings.kaggle_config_path,
            ),
            hub: HubClient::new(http, settings.hub_base_url, token),
            kaggle_datasets: settings.kaggle_datasets,
            hub_datasets: settings.hub_datasets,
        })
    }
}

impl<K, H> Pipeline<K, H>
where
    K: KaggleApi + Send,
    H: DatasetHub + Sync,
{
    pub fn new(
        layout: OutputLayout,
        provisioner: CredentialProvisioner,
        kaggle: K,
        hub: H,
        kaggle_datasets: Vec<String>,
        hub_datasets: Vec<String>,
    ) -> Self {
        Self {
            layout,
            provisioner,
            kaggle,
            hub,
            kaggle_datasets,
            hub_datasets,
        }
    }

    /// Runs every batch once. An `Err` is always fatal; per-dataset failures
    /// only show up in the returned summary.
    pub async fn run(&mut self) -> Result<RunSummary, FetchError> {
        info!(root = %self.layout.root().display(), "Starting dataset downloads");
        self.layout.bootstrap()?;

        let kaggle = download_kaggle_datasets(
            &mut self.kaggle,
            &self.provisioner,
            &self.layout,
            &self.kaggle_datasets,
        )
        .await?;
        let hub = download_hub_datasets(&self.hub, &self.layout, &self.hub_datasets).await;

        info!(
            kaggle_ok = kaggle.succeeded.len(),
            kaggle_failed = kaggle.failed.len(),
            hub_ok = hub.succeeded.len(),
            hub_failed = hub.failed.len(),
            "Finished dataset downloads"
        );
        Ok(RunSummary { kaggle, hub })
    }
}
