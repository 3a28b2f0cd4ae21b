mod archive;
mod client;
mod credentials;
mod dataset;
mod downloader;
mod error;
mod hub;
mod identifier;
mod kaggle;
mod layout;
mod pipeline;
mod settings;

#[cfg(test)]
mod tests;

pub use archive::unzip_into;
pub use client::create_http_client;
pub use credentials::{
    default_fallback_paths, default_kaggle_config_path, CredentialProvisioner, KaggleCredentials,
    Provisioned,
};
pub use dataset::{render_cell, Dataset, Partition};
pub use downloader::{download_hub_datasets, download_kaggle_datasets, BatchReport};
pub use error::FetchError;
pub use hub::{DatasetHub, HubClient, HF_DATASETS_SERVER_BASE_URL};
pub use identifier::{HubDatasetId, KaggleDatasetId};
pub use kaggle::{KaggleApi, KaggleClient, KAGGLE_API_BASE_URL};
pub use layout::{OutputLayout, Source};
pub use pipeline::{Pipeline, RunSummary};
pub use settings::{Settings, DATASETS_DIR, HUB_DATASETS, KAGGLE_DATASETS};
