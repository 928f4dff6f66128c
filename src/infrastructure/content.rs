//! Loading exploration content models from YAML or JSON files.
//!
//! The content model is owned elsewhere; operators export it to a file and
//! hand it to the `report` command.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::Exploration;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read content file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse JSON content: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to parse YAML content: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Wrapped { explorations: Vec<Exploration> },
    Many(Vec<Exploration>),
    Single(Exploration),
}

impl From<CatalogDocument> for Vec<Exploration> {
    fn from(doc: CatalogDocument) -> Self {
        match doc {
            CatalogDocument::Wrapped { explorations } | CatalogDocument::Many(explorations) => explorations,
            CatalogDocument::Single(exploration) => vec![exploration],
        }
    }
}

/// Read-only set of explorations supplied by the content model.
pub struct ExplorationCatalog;

impl ExplorationCatalog {
    /// Parse a file holding one exploration, a list, or `explorations: [...]`.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Vec<Exploration>, ContentError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&raw)
        } else {
            Self::from_yaml(&raw)
        }
    }

    pub fn from_yaml(raw: &str) -> Result<Vec<Exploration>, ContentError> {
        let doc: CatalogDocument = serde_yaml::from_str(raw)?;
        Ok(doc.into())
    }

    pub fn from_json(raw: &str) -> Result<Vec<Exploration>, ContentError> {
        let doc: CatalogDocument = serde_json::from_str(raw)?;
        Ok(doc.into())
    }
}
