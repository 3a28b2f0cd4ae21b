use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Kaggle,
    HuggingFace,
}

impl Source {
    pub const ALL: [Source; 2] = [Source::Kaggle, Source::HuggingFace];

    pub fn dir_name(self) -> &'static str {
        match self {
            Source::Kaggle => "kaggle",
            Source::HuggingFace => "huggingface",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Directory tree everything is written into:
/// `<root>/<source>/<dataset-name>/...`
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn source_dir(&self, source: Source) -> PathBuf {
        self.root.join(source.dir_name())
    }

    pub fn dataset_dir(&self, source: Source, dataset_name: &str) -> PathBuf {
        self.source_dir(source).join(dataset_name)
    }

    /// Creates the root and one subdirectory per source. Failing here is fatal.
    pub fn bootstrap(&self) -> Result<(), FetchError> {
        for source in Source::ALL {
            let path = self.source_dir(source);
            fs::create_dir_all(&path).map_err(|source| FetchError::Bootstrap { path, source })?;
        }
        Ok(())
    }

    pub fn ensure_dataset_dir(&self, source: Source, dataset_name: &str) -> io::Result<PathBuf> {
        let dir = self.dataset_dir(source, dataset_name);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }
}
