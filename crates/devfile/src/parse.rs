// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end parsing: load, resolve parents, merge and validate.

use std::path::Path;
use std::sync::Arc;

use crate::context::DevfileCtx;
use crate::fs::{DefaultFs, Filesystem};
use crate::uri::{HttpTransport, Transport};
use crate::versions::DevfileData;
use crate::{Error, Result};

#[cfg(test)]
#[path = "./parse_test.rs"]
mod parse_test;

/// Capabilities used while parsing.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Where local devfiles and `file` parents are read from.
    pub fs: Arc<dyn Filesystem>,

    /// How `http`/`https` parents are fetched.
    pub transport: Arc<dyn Transport>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            fs: Arc::new(DefaultFs),
            transport: Arc::new(HttpTransport::default()),
        }
    }
}

/// A parsed, merged and validated devfile.
#[derive(Debug, Clone)]
pub struct DevfileObj {
    pub ctx: DevfileCtx,
    pub data: DevfileData,
}

/// Parse the devfile at `path` using the host filesystem and network.
pub fn parse<P: AsRef<Path>>(path: P) -> Result<DevfileObj> {
    Parser::default().parse(path)
}

#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse the devfile at `path`, resolving and merging its parent chain.
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> Result<DevfileObj> {
        let mut chain = Vec::new();
        self.parse_document(path.as_ref(), self.options.fs.as_ref(), None, &mut chain)
    }

    /// `origin` names remote documents, whose local path is a fresh
    /// temporary file on every fetch.
    fn parse_document(
        &self,
        path: &Path,
        fs: &dyn Filesystem,
        origin: Option<&str>,
        chain: &mut Vec<String>,
    ) -> Result<DevfileObj> {
        let ctx = DevfileCtx::populate(path, fs)?;

        let key = origin
            .map(str::to_owned)
            .unwrap_or_else(|| ctx.abs_path().display().to_string());
        let seen = chain.contains(&key);
        chain.push(key);
        if seen {
            return Err(Error::CyclicParent {
                chain: chain.clone(),
            });
        }

        let mut data = crate::versions::new_devfile_data(ctx.api_version())?;
        data.decode(ctx.raw_content(), ctx.abs_path())?;

        if let Some(uri) = ctx.parent_uri() {
            tracing::debug!(%uri, "processing parent devfile");
            let parent = self.parse_parent(uri, chain)?;

            ensure_same_version(ctx.api_version(), parent.ctx.api_version())?;

            tracing::info!(
                local = %ctx.abs_path().display(),
                %uri,
                "merging parent and local devfiles"
            );
            data.merge(parent.data)?;
        }

        ctx.validate()?;
        data.validate()?;

        chain.pop();
        Ok(DevfileObj { ctx, data })
    }

    fn parse_parent(
        &self,
        uri: &str,
        chain: &mut Vec<String>,
    ) -> Result<DevfileObj> {
        let resolved = crate::uri::resolve(uri, self.options.transport.as_ref())?;

        // Relative `file` paths are taken against the working directory,
        // whichever document declared them.
        let parsed = if resolved.is_temporary() {
            self.parse_document(resolved.path(), &DefaultFs, Some(uri), chain)
        } else {
            self.parse_document(resolved.path(), self.options.fs.as_ref(), None, chain)
        };

        parsed.map_err(|error| match error {
            Error::CyclicParent { .. } => error,
            error => Error::Parent {
                uri: uri.to_string(),
                error: Box::new(error),
            },
        })
    }
}

/// Parent and local devfiles must declare the same version.
pub fn ensure_same_version(local: &str, parent: &str) -> Result<()> {
    if local == parent {
        return Ok(());
    }
    Err(Error::VersionMismatch {
        local: local.to_string(),
        parent: parent.to_string(),
    })
}
