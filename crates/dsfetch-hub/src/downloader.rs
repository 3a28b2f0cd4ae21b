use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::credentials::CredentialProvisioner;
use crate::error::FetchError;
use crate::hub::DatasetHub;
use crate::identifier::{HubDatasetId, KaggleDatasetId};
use crate::kaggle::KaggleApi;
use crate::layout::{OutputLayout, Source};

/// What happened to each identifier of one batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl BatchReport {
    fn record(&mut self, source: Source, id: &str, result: Result<PathBuf, FetchError>) {
        match result {
            Ok(dir) => {
                info!(%source, dataset = id, dir = %dir.display(), "Dataset downloaded");
                self.succeeded.push(id.to_string());
            }
            Err(e) => {
                if e.is_transient() {
                    warn!(%source, dataset = id, error = %e, transient = true, "Error downloading dataset");
                } else {
                    error!(%source, dataset = id, error = %e, transient = false, "Error downloading dataset");
                }
                self.failed.push(id.to_string());
            }
        }
    }
}

/// Provisions credentials, then downloads and unpacks each Kaggle dataset into
/// its own folder. Only provisioning can fail the whole batch; per-dataset
/// errors are logged and the next dataset is tried.
pub async fn download_kaggle_datasets<K: KaggleApi + Send>(
    api: &mut K,
    provisioner: &CredentialProvisioner,
    layout: &OutputLayout,
    dataset_ids: &[String],
) -> Result<BatchReport, FetchError> {
    provisioner.provision()?;

    let mut report = BatchReport::default();
    for raw in dataset_ids {
        info!(dataset = %raw, "Downloading Kaggle dataset");
        let result = download_kaggle_dataset(api, layout, raw).await;
        report.record(Source::Kaggle, raw, result);
    }
    Ok(report)
}

async fn download_kaggle_dataset<K: KaggleApi + Send>(
    api: &mut K,
    layout: &OutputLayout,
    raw: &str,
) -> Result<PathBuf, FetchError> {
    let dataset: KaggleDatasetId = raw.parse()?;
    let dir = layout.ensure_dataset_dir(Source::Kaggle, &dataset.name)?;
    api.authenticate().await?;
    api.dataset_download_files(&dataset, &dir).await?;
    Ok(dir)
}

/// Loads each Hub dataset and writes one CSV per split into its folder.
pub async fn download_hub_datasets<H: DatasetHub + Sync>(
    hub: &H,
    layout: &OutputLayout,
    dataset_ids: &[String],
) -> BatchReport {
    let mut report = BatchReport::default();
    for raw in dataset_ids {
        info!(dataset = %raw, "Downloading Hugging Face dataset");
        let result = download_hub_dataset(hub, layout, raw).await;
        report.record(Source::HuggingFace, raw, result);
    }
    report
}

async fn download_hub_dataset<H: DatasetHub + Sync>(
    hub: &H,
    layout: &OutputLayout,
    raw: &str,
) -> Result<PathBuf, FetchError> {
    let dataset = HubDatasetId::new(raw)?;
    let dir = layout.ensure_dataset_dir(Source::HuggingFace, dataset.name())?;
    let loaded = hub.load_dataset(&dataset).await?;
    for path in loaded.export_csv(&dir)? {
        info!(dataset = %dataset, file = %path.display(), "Saved split");
    }
    Ok(dir)
}
