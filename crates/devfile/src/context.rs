// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! Resolution context: where a devfile lives, what it contains and which
//! version and parent it declares.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::fs::Filesystem;
use crate::{Error, Result};

#[cfg(test)]
#[path = "./context_test.rs"]
mod context_test;

/// Helper for reading the version and parent before the full decode.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContextMapping {
    api_version: serde_yaml::Value,
    #[serde(default)]
    parent: Option<ParentMapping>,
}

#[derive(Deserialize)]
struct ParentMapping {
    #[serde(default)]
    uri: Option<String>,
}

/// Everything known about one devfile before it is decoded.
#[derive(Debug, Clone)]
pub struct DevfileCtx {
    rel_path: PathBuf,
    abs_path: PathBuf,
    api_version: String,
    parent_uri: Option<String>,
    raw_content: Vec<u8>,
    schema: &'static str,
}

impl DevfileCtx {
    /// Load the devfile at `path` and fill in its context.
    pub fn populate<P: AsRef<Path>>(path: P, fs: &dyn Filesystem) -> Result<Self> {
        let rel_path = path.as_ref().to_path_buf();

        let abs_path = std::path::absolute(&rel_path).map_err(|e| Error::Path {
            path: rel_path.clone(),
            error: e,
        })?;
        let abs_path = dunce::simplified(&abs_path).to_path_buf();
        tracing::debug!(path = %abs_path.display(), "absolute devfile path");

        let raw_content = fs.read(&abs_path).map_err(|e| Error::ReadFailed {
            path: abs_path.clone(),
            error: e,
        })?;

        let mapping: ContextMapping =
            serde_yaml::from_slice(&raw_content).map_err(|e| Error::InvalidDocument {
                path: abs_path.clone(),
                error: e,
            })?;

        let api_version = version_string(&mapping.api_version);
        if !crate::versions::is_supported(&api_version) {
            return Err(Error::UnsupportedVersion {
                version: api_version,
            });
        }
        tracing::debug!(version = %api_version, "devfile apiVersion is supported");

        let parent_uri = mapping
            .parent
            .and_then(|parent| parent.uri)
            .filter(|uri| !uri.is_empty());
        match &parent_uri {
            Some(uri) => tracing::debug!(%uri, "devfile parent uri"),
            None => tracing::debug!("'parent.uri' not present in devfile"),
        }

        let schema = crate::schema::schema_for(&api_version)?;

        Ok(Self {
            rel_path,
            abs_path,
            api_version,
            parent_uri,
            raw_content,
            schema,
        })
    }

    /// The path as given by the caller.
    pub fn rel_path(&self) -> &Path {
        &self.rel_path
    }

    pub fn abs_path(&self) -> &Path {
        &self.abs_path
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn parent_uri(&self) -> Option<&str> {
        self.parent_uri.as_deref()
    }

    pub fn raw_content(&self) -> &[u8] {
        &self.raw_content
    }

    pub fn schema(&self) -> &'static str {
        self.schema
    }

    /// Validate the raw content against the schema of its version.
    pub fn validate(&self) -> Result<()> {
        crate::schema::validate(
            &self.raw_content,
            self.schema,
            &self.abs_path,
            &self.api_version,
        )
    }
}

/// Render a scalar version field as text.
///
/// `apiVersion: 1.0` is a YAML number, not a string.
fn version_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}
