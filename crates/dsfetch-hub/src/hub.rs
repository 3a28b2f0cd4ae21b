use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::debug;

use crate::client::check_status;
use crate::dataset::{Dataset, Partition};
use crate::error::FetchError;
use crate::identifier::HubDatasetId;

pub const HF_DATASETS_SERVER_BASE_URL: &str = "https://datasets-server.huggingface.co";
pub const DEFAULT_CONFIG: &str = "default";
const MAX_ROWS_PER_REQUEST: usize = 100;
/// Larger totals are treated as a broken response rather than a dataset.
pub(crate) const MAX_ROWS_TOTAL: usize = 1_000_000_000;

/// Where the Hub's own tooling stores a user access token.
pub fn default_token_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cache").join("huggingface").join("token"))
}

/// Reads a token file, treating a missing or blank file as "no token".
pub fn read_token(path: &Path) -> Option<String> {
    let token = fs::read_to_string(path).ok()?;
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[async_trait]
pub trait DatasetHub {
    /// Loads every split of the dataset's default configuration.
    async fn load_dataset(&self, dataset: &HubDatasetId) -> Result<Dataset, FetchError>;
}

#[derive(Deserialize, Debug)]
pub(crate) struct SplitsResponse {
    pub splits: Vec<SplitEntry>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct SplitEntry {
    pub config: String,
    pub split: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RowsResponse {
    pub features: Vec<Feature>,
    pub rows: Vec<RowData>,
    pub num_rows_total: usize,
    /// Set when the server only converted the first part of the split.
    #[serde(default)]
    pub partial: bool,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Feature {
    pub feature_idx: usize,
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RowData {
    #[serde(default)]
    pub row_idx: usize,
    pub row: serde_json::Map<String, serde_json::Value>,
    /// Columns whose value the server cut short.
    #[serde(default)]
    pub truncated_cells: Vec<String>,
}

/// Picks the configuration to load and returns it with its splits in the
/// order the server listed them.
pub(crate) fn select_config(
    dataset: &HubDatasetId,
    splits: &[SplitEntry],
) -> Result<(String, Vec<String>), FetchError> {
    let mut configs: Vec<String> = Vec::new();
    for entry in splits {
        if !configs.contains(&entry.config) {
            configs.push(entry.config.clone());
        }
    }

    let config = match configs.as_slice() {
        [] => return Err(FetchError::NoSplits(dataset.to_string())),
        [only] => only.clone(),
        many if many.iter().any(|c| c == DEFAULT_CONFIG) => DEFAULT_CONFIG.to_string(),
        many => {
            return Err(FetchError::AmbiguousConfig {
                dataset: dataset.to_string(),
                configs: many.to_vec(),
            })
        }
    };

    let names = splits
        .iter()
        .filter(|e| e.config == config)
        .map(|e| e.split.clone())
        .collect();
    Ok((config, names))
}

/// Column names in feature order.
pub(crate) fn columns_of(features: &[Feature]) -> Vec<String> {
    let mut ordered: Vec<&Feature> = features.iter().collect();
    ordered.sort_by_key(|f| f.feature_idx);
    ordered.into_iter().map(|f| f.name.clone()).collect()
}

/// Rejects pages that cannot be written out as complete data.
pub(crate) fn check_page(
    dataset: &HubDatasetId,
    split: &str,
    page: &RowsResponse,
) -> Result<(), FetchError> {
    if page.num_rows_total > MAX_ROWS_TOTAL {
        return Err(FetchError::MalformedResponse {
            dataset: dataset.to_string(),
            split: split.to_string(),
            reason: format!("implausible row count {}", page.num_rows_total),
        });
    }
    if page.partial {
        return Err(FetchError::Incomplete {
            dataset: dataset.to_string(),
            split: split.to_string(),
            reason: "only part of the split is served".to_string(),
        });
    }
    if let Some(data) = page.rows.iter().find(|r| !r.truncated_cells.is_empty()) {
        return Err(FetchError::Incomplete {
            dataset: dataset.to_string(),
            split: split.to_string(),
            reason: format!("row {} has truncated cells {:?}", data.row_idx, data.truncated_cells),
        });
    }
    Ok(())
}

pub(crate) fn append_rows(partition: &mut Partition, rows: Vec<RowData>) {
    for mut data in rows {
        let values = partition
            .columns
            .iter()
            .map(|c| data.row.remove(c).unwrap_or(serde_json::Value::Null))
            .collect();
        partition.rows.push(values);
    }
}

pub struct HubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HubClient {
    pub fn new(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token,
        }
    }

    fn get(&self, endpoint: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_splits(&self, dataset: &HubDatasetId) -> Result<Vec<SplitEntry>, FetchError> {
        let response = self
            .get("splits")
            .query(&[("dataset", dataset.as_str())])
            .send()
            .await?;
        let response = check_status(response).await?;
        let splits: SplitsResponse = response.json().await?;
        Ok(splits.splits)
    }

    async fn fetch_rows(
        &self,
        dataset: &HubDatasetId,
        config: &str,
        split: &str,
        offset: usize,
    ) -> Result<RowsResponse, FetchError> {
        let offset = offset.to_string();
        let length = MAX_ROWS_PER_REQUEST.to_string();
        let response = self
            .get("rows")
            .query(&[
                ("dataset", dataset.as_str()),
                ("config", config),
                ("split", split),
                ("offset", offset.as_str()),
                ("length", length.as_str()),
            ])
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn fetch_partition(
        &self,
        dataset: &HubDatasetId,
        config: &str,
        split: &str,
    ) -> Result<Partition, FetchError> {
        let first = self.fetch_rows(dataset, config, split, 0).await?;
        check_page(dataset, split, &first)?;
        let total = first.num_rows_total;
        let mut partition = Partition::new(split, columns_of(&first.features));
        append_rows(&mut partition, first.rows);

        while partition.rows.len() < total {
            let page = self
                .fetch_rows(dataset, config, split, partition.rows.len())
                .await?;
            if page.rows.is_empty() {
                break;
            }
            check_page(dataset, split, &page)?;
            append_rows(&mut partition, page.rows);
        }

        debug!(%dataset, split, rows = partition.rows.len(), "Fetched split");
        Ok(partition)
    }
}

#[async_trait]
impl DatasetHub for HubClient {
    async fn load_dataset(&self, dataset: &HubDatasetId) -> Result<Dataset, FetchError> {
        let splits = self.fetch_splits(dataset).await?;
        let (config, split_names) = select_config(dataset, &splits)?;
        debug!(%dataset, %config, splits = ?split_names, "Resolved configuration");

        let mut partitions = Vec::with_capacity(split_names.len());
        for split in &split_names {
            partitions.push(self.fetch_partition(dataset, &config, split).await?);
        }
        Ok(Dataset { partitions })
    }
}
