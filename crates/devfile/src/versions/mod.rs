// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! Registry of supported devfile versions and the version-tagged data type.
//!
//! Adding a format version means adding a module with its data types and
//! merge rules, a [`DevfileData`] variant, a registry entry and a schema.

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::{Error, Result};

pub mod v100;


type Constructor = fn() -> DevfileData;

static REGISTRY: Lazy<BTreeMap<&'static str, Constructor>> = Lazy::new(|| {
    let mut registry: BTreeMap<&'static str, Constructor> = BTreeMap::new();
    registry.insert(v100::API_VERSION, || {
        DevfileData::V100(v100::Devfile100 {
            api_version: v100::API_VERSION.to_string(),
            ..Default::default()
        })
    });
    registry
});

/// Every version string with a registered document type.
pub fn supported_versions() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}

pub fn is_supported(version: &str) -> bool {
    REGISTRY.contains_key(version)
}

/// Create an empty document of the type registered for `version`.
pub fn new_devfile_data(version: &str) -> Result<DevfileData> {
    let constructor = REGISTRY
        .get(version)
        .ok_or_else(|| Error::UnsupportedVersion {
            version: version.to_string(),
        })?;
    Ok(constructor())
}

/// A devfile of one concrete format version.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DevfileData {
    V100(v100::Devfile100),
}

impl DevfileData {
    pub fn api_version(&self) -> &str {
        match self {
            Self::V100(_) => v100::API_VERSION,
        }
    }

    /// Decode raw content into this document, keeping its version.
    ///
    /// `path` is only used to describe failures.
    pub fn decode(&mut self, content: &[u8], path: &Path) -> Result<()> {
        let invalid = |error| Error::InvalidDocument {
            path: path.to_path_buf(),
            error,
        };
        match self {
            Self::V100(data) => *data = serde_yaml::from_slice(content).map_err(invalid)?,
        }
        Ok(())
    }

    /// Merge a parent document of the same version into this one.
    pub fn merge(&mut self, parent: DevfileData) -> Result<()> {
        if self.api_version() != parent.api_version() {
            return Err(Error::VersionMismatch {
                local: self.api_version().to_string(),
                parent: parent.api_version().to_string(),
            });
        }
        match (self, parent) {
            (Self::V100(local), Self::V100(parent)) => local.merge(parent),
        }
        Ok(())
    }

    /// Check the post-merge invariants of this version.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::V100(data) => data.validate(),
        }
    }

    pub fn metadata(&self) -> &v100::Metadata {
        match self {
            Self::V100(data) => &data.metadata,
        }
    }

    pub fn projects(&self) -> &[v100::Project] {
        match self {
            Self::V100(data) => &data.projects,
        }
    }

    pub fn components(&self) -> &[v100::Component] {
        match self {
            Self::V100(data) => &data.components,
        }
    }

    pub fn commands(&self) -> &[v100::Command] {
        match self {
            Self::V100(data) => &data.commands,
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::Serialize(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Serialize(e.to_string()))
    }
}
