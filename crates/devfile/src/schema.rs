// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! JSON schemas for each devfile version and validation against them.

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;

use crate::{Error, Result};

#[cfg(test)]
#[path = "./schema_test.rs"]
mod schema_test;

static SCHEMAS: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut schemas = BTreeMap::new();
    schemas.insert("1.0.0", include_str!("./schemas/1.0.0.json"));
    schemas
});

/// The JSON schema document registered for `version`.
pub fn schema_for(version: &str) -> Result<&'static str> {
    SCHEMAS
        .get(version)
        .copied()
        .ok_or_else(|| Error::SchemaLoad {
            version: version.to_string(),
            reason: "no schema registered".to_string(),
        })
}

/// Validate raw devfile content against a JSON schema.
///
/// The content may be YAML or JSON. Every violation is reported, each
/// prefixed with the JSON pointer of the offending value.
pub fn validate(content: &[u8], schema: &str, path: &Path, version: &str) -> Result<()> {
    let schema_load = |reason: String| Error::SchemaLoad {
        version: version.to_string(),
        reason,
    };
    let schema: serde_json::Value =
        serde_json::from_str(schema).map_err(|e| schema_load(e.to_string()))?;
    let validator = jsonschema::validator_for(&schema).map_err(|e| schema_load(e.to_string()))?;

    let instance: serde_json::Value =
        serde_yaml::from_slice(content).map_err(|e| Error::InvalidDocument {
            path: path.to_path_buf(),
            error: e,
        })?;

    let violations: Vec<String> = validator
        .iter_errors(&instance)
        .map(|error| {
            let location = error.instance_path.to_string();
            if location.is_empty() {
                format!("/: {error}")
            } else {
                format!("{location}: {error}")
            }
        })
        .collect();

    if violations.is_empty() {
        tracing::debug!(path = %path.display(), version, "devfile matches schema");
        return Ok(());
    }

    Err(Error::SchemaValidation {
        path: path.to_path_buf(),
        version: version.to_string(),
        violations,
    })
}
