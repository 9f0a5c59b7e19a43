// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! Resolution of parent devfile uris to locally readable files.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::TempPath;
use url::Url;

use crate::{Error, Result};

#[cfg(test)]
#[path = "./uri_test.rs"]
mod uri_test;

const FILE_SCHEME: &str = "file";
const HTTP_SCHEME: &str = "http";
const HTTPS_SCHEME: &str = "https";

/// Fetches the body of a remote document.
pub trait Transport: Send + Sync + std::fmt::Debug {
    fn get(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Blocking HTTP(S) transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    /// Request timeout, or the client default when unset.
    pub timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> Result<Vec<u8>> {
        let fetch_error = |reason: &str, error: reqwest::Error| Error::Fetch {
            uri: url.to_string(),
            reason: reason.to_string(),
            error: Some(Box::new(error)),
        };

        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| fetch_error("failed to create http client", e))?;

        let response = client
            .get(url.clone())
            .send()
            .map_err(|e| fetch_error("failed to fetch file content", e))?
            .error_for_status()
            .map_err(|e| fetch_error("server returned an error status", e))?;

        let body = response
            .bytes()
            .map_err(|e| fetch_error("failed to read response content", e))?;
        Ok(body.to_vec())
    }
}

/// A parent devfile made available on the local filesystem.
///
/// Remote documents are written to a temporary file owned by this value;
/// the file is deleted when it is dropped unless [`ResolvedUri::keep`] is
/// called.
#[derive(Debug)]
pub struct ResolvedUri {
    path: PathBuf,
    temp: Option<TempPath>,
}

impl ResolvedUri {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file was fetched and lives in temporary storage.
    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }

    /// Persist a fetched file past the lifetime of this value.
    pub fn keep(self) -> Result<PathBuf> {
        match self.temp {
            None => Ok(self.path),
            Some(temp) => temp.keep().map_err(|e| Error::WriteFailed {
                path: self.path,
                error: e.error,
            }),
        }
    }
}

/// Check that `uri` points directly at a single document.
pub fn parse_uri(uri: &str) -> Result<Url> {
    let invalid = |reason: &str| Error::InvalidUri {
        uri: uri.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(uri).map_err(|e| invalid(&e.to_string()))?;

    if !has_path(uri, &url) {
        return Err(invalid("missing path"));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(invalid("user info is not allowed"));
    }
    if url.query().is_some() {
        return Err(invalid("query is not allowed"));
    }
    if url.fragment().is_some() {
        return Err(invalid("fragment is not allowed"));
    }
    if url.path().contains('%') {
        return Err(invalid("percent-encoded paths are not supported"));
    }

    Ok(url)
}

/// `Url` normalises `https://host` to the path `/`, so the raw text decides
/// whether a path was written after the authority.
fn has_path(uri: &str, url: &Url) -> bool {
    match uri.split_once("://") {
        Some((_, rest)) => rest
            .find(['/', '?', '#'])
            .is_some_and(|at| rest[at..].starts_with('/')),
        None => !url.path().is_empty(),
    }
}

/// Resolve a parent uri to a local path, fetching remote documents.
///
/// For `file` uris the host and path are joined as-is, so
/// `file://base/devfile.yaml` yields the relative path `base/devfile.yaml`.
pub fn resolve(uri: &str, transport: &dyn Transport) -> Result<ResolvedUri> {
    let url = parse_uri(uri)?;

    match url.scheme() {
        FILE_SCHEME => {
            let host = url.host_str().unwrap_or_default();
            Ok(ResolvedUri {
                path: PathBuf::from(format!("{host}{}", url.path())),
                temp: None,
            })
        }
        HTTP_SCHEME | HTTPS_SCHEME => {
            let body = transport.get(&url)?;
            let temp = write_temp_file(uri, &body)?;
            tracing::debug!(path = %temp.display(), "created parent devfile");
            Ok(ResolvedUri {
                path: temp.to_path_buf(),
                temp: Some(temp),
            })
        }
        scheme => Err(Error::UnsupportedScheme {
            uri: uri.to_string(),
            scheme: scheme.to_string(),
        }),
    }
}

fn write_temp_file(uri: &str, body: &[u8]) -> Result<TempPath> {
    let fetch_error = |reason: &str, error: std::io::Error| Error::Fetch {
        uri: uri.to_string(),
        reason: reason.to_string(),
        error: Some(Box::new(error)),
    };

    let mut file = tempfile::Builder::new()
        .prefix("parent-devfile-")
        .suffix(".yaml")
        .tempfile()
        .map_err(|e| fetch_error("failed to create temporary file", e))?;
    file.write_all(body)
        .and_then(|_| file.flush())
        .map_err(|e| fetch_error("failed to write to temporary file", e))?;

    Ok(file.into_temp_path())
}
