use super::{BiodataSource, FetchOutcome};
use crate::models::MhsBiodata;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StaticSourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Fixed record set consulted instead of the SIAK API
///
/// Lookup is an exact `nim` match; the first matching record wins.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<MhsBiodata>,
}

impl StaticSource {
    pub fn new(records: Vec<MhsBiodata>) -> Self {
        Self { records }
    }

    /// Load a JSON array of records in the upstream wire format
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StaticSourceError> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let raw = std::fs::read(path).map_err(|source| StaticSourceError::Io {
            path: shown.clone(),
            source,
        })?;
        let records: Vec<MhsBiodata> =
            serde_json::from_slice(&raw).map_err(|source| StaticSourceError::Parse {
                path: shown.clone(),
                source,
            })?;

        tracing::info!(path = %shown, records = records.len(), "Static biodata source loaded");
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl BiodataSource for StaticSource {
    async fn fetch(&self, nim: &str) -> FetchOutcome {
        match self.records.iter().find(|r| r.nim == nim) {
            Some(record) => FetchOutcome::Found(record.clone()),
            None => {
                tracing::warn!(nim = %nim, "Resource not found in static source");
                FetchOutcome::NotFound
            }
        }
    }
}
