use std::fmt;
use std::str::FromStr;

use crate::error::FetchError;

/// A Kaggle dataset, addressed as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KaggleDatasetId {
    pub owner: String,
    pub name: String,
}

impl FromStr for KaggleDatasetId {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(FetchError::InvalidIdentifier(s.to_string())),
        }
    }
}

impl fmt::Display for KaggleDatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A Hugging Face Hub dataset id, either `name` or `namespace/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubDatasetId(String);

impl HubDatasetId {
    pub fn new(id: impl Into<String>) -> Result<Self, FetchError> {
        let id = id.into();
        if id.rsplit('/').next().map_or(true, str::is_empty) {
            return Err(FetchError::InvalidIdentifier(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, used as the local folder name.
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for HubDatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
