use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ::zip::write::ZipWriter;
use async_trait::async_trait;
use serde_json::json;
use tempfile::TempDir;

use crate::*;


const CREDENTIALS: &str = r#"{"username":"user","key":"key"}"#;

fn write_credentials(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, CREDENTIALS)
}

fn write_zip(path: &Path, entries: &[(&str, &str)]) -> io::Result<()> {
    let file = fs::File::create(path)?;
    let mut zip = ZipWriter::new(file);
    for (name, content) in entries {
        zip.start_file(*name, Default::default())?;
        zip.write_all(content.as_bytes())?;
    }
    zip.finish()?;
    Ok(())
}

/// Kaggle stand-in: "downloads" a single `data.csv` unless the dataset name
/// is listed in `missing`.
#[derive(Default)]
struct FakeKaggle {
    missing: Vec<String>,
    authentications: usize,
    downloads: Mutex<Vec<String>>,
}

#[async_trait]
impl KaggleApi for FakeKaggle {
    async fn authenticate(&mut self) -> Result<(), FetchError> {
        self.authentications += 1;
        Ok(())
    }

    async fn dataset_download_files(
        &self,
        dataset: &KaggleDatasetId,
        path: &Path,
    ) -> Result<(), FetchError> {
        self.downloads.lock().unwrap().push(dataset.to_string());
        if self.missing.contains(&dataset.name) {
            return Err(FetchError::Status {
                url: format!("https://example.invalid/{}", dataset),
                status: 404,
                body: "Not found".to_string(),
            });
        }
        fs::write(path.join("data.csv"), "text,label\nhello,0\n")?;
        Ok(())
    }
}

/// Hub stand-in returning a train/test dataset for every id.
#[derive(Default)]
struct FakeHub {
    loads: Mutex<Vec<String>>,
}

fn train_test_dataset() -> Dataset {
    let columns = vec!["text".to_string(), "label".to_string()];
    let mut train = Partition::new("train", columns.clone());
    train.rows.push(vec![json!("menang besar"), json!(1)]);
    train.rows.push(vec![json!("halo, apa kabar"), json!(0)]);
    let mut test = Partition::new("test", columns);
    test.rows.push(vec![json!("slot gacor"), json!(1)]);
    Dataset {
        partitions: vec![train, test],
    }
}

#[async_trait]
impl DatasetHub for FakeHub {
    async fn load_dataset(&self, dataset: &HubDatasetId) -> Result<Dataset, FetchError> {
        self.loads.lock().unwrap().push(dataset.to_string());
        Ok(train_test_dataset())
    }
}

#[test]
fn test_dataset_dir_is_deterministic() {
    let layout = OutputLayout::new("datasets");
    let a = layout.dataset_dir(Source::Kaggle, "judionline");
    let b = layout.dataset_dir(Source::Kaggle, "judionline");
    assert_eq!(a, b);
    assert_eq!(a, PathBuf::from("datasets/kaggle/judionline"));
    assert_eq!(
        layout.dataset_dir(Source::HuggingFace, "judionline"),
        PathBuf::from("datasets/huggingface/judionline")
    );
}

#[test]
fn test_bootstrap_creates_source_dirs() -> Result<(), FetchError> {
    let temp_dir = TempDir::new()?;
    let layout = OutputLayout::new(temp_dir.path().join("datasets"));

    layout.bootstrap()?;
    layout.bootstrap()?;

    assert!(temp_dir.path().join("datasets/kaggle").is_dir());
    assert!(temp_dir.path().join("datasets/huggingface").is_dir());
    Ok(())
}

#[test]
fn test_kaggle_identifier_parsing() {
    let id: KaggleDatasetId = "yaemico/judionline".parse().unwrap();
    assert_eq!(id.owner, "yaemico");
    assert_eq!(id.name, "judionline");
    assert_eq!(id.to_string(), "yaemico/judionline");

    for bad in ["judionline", "a/b/c", "/name", "owner/", ""] {
        assert!(
            matches!(bad.parse::<KaggleDatasetId>(), Err(FetchError::InvalidIdentifier(_))),
            "{:?} should be rejected",
            bad
        );
    }
}

#[test]
fn test_hub_identifier_name() {
    let namespaced = HubDatasetId::new("KagChi/indonesian-gambling-words").unwrap();
    assert_eq!(namespaced.name(), "indonesian-gambling-words");

    let bare = HubDatasetId::new("imdb").unwrap();
    assert_eq!(bare.name(), "imdb");

    assert!(HubDatasetId::new("").is_err());
    assert!(HubDatasetId::new("owner/").is_err());
}

#[cfg(unix)]
fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[test]
fn test_provision_copies_fallback() -> Result<(), FetchError> {
    let temp_dir = TempDir::new()?;
    let fallback = temp_dir.path().join("project/kaggle.json");
    write_credentials(&fallback)?;
    let expected = temp_dir.path().join("home/.kaggle/kaggle.json");

    let provisioner = CredentialProvisioner::new(expected.clone(), vec![fallback.clone()]);

    assert_eq!(
        provisioner.provision()?,
        Provisioned::Copied {
            from: fallback.clone()
        }
    );
    assert_eq!(fs::read_to_string(&expected)?, CREDENTIALS);
    #[cfg(unix)]
    assert_eq!(mode_of(&expected), 0o600);

    // A second run finds the file in place.
    assert_eq!(provisioner.provision()?, Provisioned::AlreadyPresent);
    #[cfg(unix)]
    assert_eq!(mode_of(&expected), 0o600);
    Ok(())
}

#[test]
fn test_provision_keeps_existing_file() -> Result<(), FetchError> {
    let temp_dir = TempDir::new()?;
    let fallback = temp_dir.path().join("kaggle.json");
    write_credentials(&fallback)?;
    let expected = temp_dir.path().join(".kaggle/kaggle.json");
    fs::create_dir_all(expected.parent().unwrap())?;
    fs::write(&expected, r#"{"username":"other","key":"secret"}"#)?;

    let provisioner = CredentialProvisioner::new(expected.clone(), vec![fallback]);

    assert_eq!(provisioner.provision()?, Provisioned::AlreadyPresent);
    assert_eq!(
        fs::read_to_string(&expected)?,
        r#"{"username":"other","key":"secret"}"#
    );
    Ok(())
}

#[test]
fn test_provision_tries_fallbacks_in_order() -> Result<(), FetchError> {
    let temp_dir = TempDir::new()?;
    let absent = temp_dir.path().join("cwd/kaggle.json");
    let bundled = temp_dir.path().join("bin/kaggle.json");
    write_credentials(&bundled)?;
    let expected = temp_dir.path().join(".kaggle/kaggle.json");

    let provisioner = CredentialProvisioner::new(expected.clone(), vec![absent, bundled.clone()]);

    assert_eq!(provisioner.provision()?, Provisioned::Copied { from: bundled });
    assert!(expected.is_file());
    Ok(())
}

#[test]
fn test_provision_without_any_credentials_is_fatal() -> io::Result<()> {
    let temp_dir = TempDir::new()?;
    let expected = temp_dir.path().join(".kaggle/kaggle.json");
    let provisioner =
        CredentialProvisioner::new(expected.clone(), vec![temp_dir.path().join("kaggle.json")]);

    let err = provisioner.provision().unwrap_err();
    assert!(matches!(err, FetchError::MissingCredentials { .. }));
    assert!(err.is_fatal());
    assert!(!expected.exists());
    Ok(())
}

#[test]
fn test_credentials_authorization_header() -> Result<(), FetchError> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("kaggle.json");
    write_credentials(&path)?;

    let credentials = KaggleCredentials::load(&path)?;
    assert_eq!(credentials.username, "user");
    assert_eq!(credentials.authorization_header(), "Basic dXNlcjprZXk=");
    assert!(!format!("{:?}", credentials).contains("\"key\""));
    Ok(())
}

#[test]
fn test_unzip_into_overwrites() -> Result<(), FetchError> {
    let temp_dir = TempDir::new()?;
    let zip_path = temp_dir.path().join("test.zip");
    write_zip(
        &zip_path,
        &[("test1.txt", "Test content 1"), ("nested/test2.txt", "Test content 2")],
    )?;

    let extract_dir = temp_dir.path().join("extract");
    fs::create_dir(&extract_dir)?;
    fs::write(extract_dir.join("test1.txt"), "stale")?;

    let entries = unzip_into(&zip_path, &extract_dir)?;

    assert_eq!(entries, 2);
    assert_eq!(fs::read_to_string(extract_dir.join("test1.txt"))?, "Test content 1");
    assert_eq!(
        fs::read_to_string(extract_dir.join("nested/test2.txt"))?,
        "Test content 2"
    );
    Ok(())
}

#[test]
fn test_unzip_rejects_non_archive() -> Result<(), FetchError> {
    let temp_dir = TempDir::new()?;
    let bogus = temp_dir.path().join("bogus.zip");
    fs::write(&bogus, "<html>not found</html>")?;

    let err = unzip_into(&bogus, temp_dir.path()).unwrap_err();
    assert!(matches!(err, FetchError::Zip(_)));
    Ok(())
}

#[test]
fn test_export_writes_one_csv_per_partition() -> Result<(), FetchError> {
    let temp_dir = TempDir::new()?;

    let written = train_test_dataset().export_csv(temp_dir.path())?;

    assert_eq!(
        written,
        vec![temp_dir.path().join("train.csv"), temp_dir.path().join("test.csv")]
    );
    let mut names: Vec<String> = fs::read_dir(temp_dir.path())?
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["test.csv", "train.csv"]);

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("train.csv"))?,
        "text,label\nmenang besar,1\n\"halo, apa kabar\",0\n"
    );
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("test.csv"))?,
        "text,label\nslot gacor,1\n"
    );
    Ok(())
}

#[test]
fn test_empty_partition_writes_header_only() -> Result<(), FetchError> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("validation.csv");

    Partition::new("validation", vec!["text".to_string()]).write_csv(&path)?;

    assert_eq!(fs::read_to_string(&path)?, "text\n");
    Ok(())
}

#[test]
fn test_render_cell() {
    assert_eq!(render_cell(&json!(null)), "");
    assert_eq!(render_cell(&json!(true)), "True");
    assert_eq!(render_cell(&json!(false)), "False");
    assert_eq!(render_cell(&json!(3)), "3");
    assert_eq!(render_cell(&json!(0.5)), "0.5");
    assert_eq!(render_cell(&json!("judi")), "judi");
    assert_eq!(render_cell(&json!(["a", 1])), r#"["a",1]"#);
}

#[test]
fn test_error_classification() {
    let status = |status| FetchError::Status {
        url: "https://example.invalid".to_string(),
        status,
        body: String::new(),
    };

    assert!(status(503).is_transient());
    assert!(status(429).is_transient());
    assert!(!status(404).is_transient());
    assert!(!status(401).is_transient());
    assert!(!status(404).is_fatal());
    assert!(!FetchError::InvalidIdentifier("x".to_string()).is_transient());
    assert!(FetchError::HomeDirUnknown.is_fatal());
}

#[test]
fn test_kaggle_download_url() {
    let client = KaggleClient::new(
        reqwest::Client::new(),
        "https://www.kaggle.com/",
        PathBuf::from("kaggle.json"),
    );
    let id: KaggleDatasetId = "yaemico/deteksi-judi-online".parse().unwrap();
    assert_eq!(
        client.download_url(&id),
        "https://www.kaggle.com/api/v1/datasets/download/yaemico/deteksi-judi-online"
    );
}

#[tokio::test]
async fn test_kaggle_authenticate_reads_config() -> Result<(), FetchError> {
    let temp_dir = TempDir::new()?;
    let config = temp_dir.path().join("kaggle.json");

    let mut missing = KaggleClient::new(reqwest::Client::new(), KAGGLE_API_BASE_URL, config.clone());
    assert!(matches!(missing.authenticate().await, Err(FetchError::Io(_))));

    write_credentials(&config)?;
    let mut client = KaggleClient::new(reqwest::Client::new(), KAGGLE_API_BASE_URL, config);
    client.authenticate().await?;
    client.authenticate().await?;
    Ok(())
}

#[test]
fn test_hardcoded_settings() -> Result<(), FetchError> {
    let settings = Settings::hardcoded()?;

    assert_eq!(settings.output_root, PathBuf::from(DATASETS_DIR));
    assert_eq!(settings.kaggle_datasets, KAGGLE_DATASETS);
    assert_eq!(settings.hub_datasets, HUB_DATASETS);
    assert_eq!(settings.kaggle_base_url, KAGGLE_API_BASE_URL);
    assert_eq!(settings.hub_base_url, HF_DATASETS_SERVER_BASE_URL);
    assert!(settings.kaggle_config_path.ends_with(".kaggle/kaggle.json"));
    assert_eq!(settings.kaggle_fallback_paths[0], PathBuf::from("kaggle.json"));
    Ok(())
}
