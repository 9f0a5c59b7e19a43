// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! Writing a resolved devfile back out.

use std::path::{Path, PathBuf};

use crate::fs::Filesystem;
use crate::parse::DevfileObj;
use crate::{Error, Result};

#[cfg(test)]
#[path = "./writer_test.rs"]
mod writer_test;

/// Filename used by [`DevfileObj::write_yaml`].
pub const OUTPUT_DEVFILE_YAML: &str = crate::DEVFILE_FILENAME;

/// Filename used by [`DevfileObj::write_json`].
pub const OUTPUT_DEVFILE_JSON: &str = "devfile.json";

impl DevfileObj {
    /// Write the merged devfile as YAML next to the source devfile.
    pub fn write_yaml(&self, fs: &dyn Filesystem) -> Result<PathBuf> {
        let content = self.data.to_yaml()?;
        self.write_output(fs, OUTPUT_DEVFILE_YAML, content.as_bytes())
    }

    /// Write the merged devfile as JSON next to the source devfile.
    pub fn write_json(&self, fs: &dyn Filesystem) -> Result<PathBuf> {
        let content = self.data.to_json()?;
        self.write_output(fs, OUTPUT_DEVFILE_JSON, content.as_bytes())
    }

    fn write_output(&self, fs: &dyn Filesystem, filename: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self
            .ctx
            .abs_path()
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(filename);

        fs.write(&path, content).map_err(|e| Error::WriteFailed {
            path: path.clone(),
            error: e,
        })?;
        tracing::debug!(path = %path.display(), "wrote devfile");
        Ok(path)
    }
}
