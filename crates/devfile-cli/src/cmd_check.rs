// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! Verify that a devfile resolves, merges and validates.

use clap::Args;
use miette::Result;

/// Verify that a devfile and its parents resolve and validate
#[derive(Debug, Args)]
pub struct CmdCheck {
    #[clap(flatten)]
    source: crate::SourceFlags,
}

impl CmdCheck {
    pub fn run(&mut self, quiet: bool) -> Result<i32> {
        let devfile = self.source.parser().parse(&self.source.file)?;

        if !quiet {
            match devfile.ctx.parent_uri() {
                Some(uri) => println!(
                    "✓ {} is valid (apiVersion {}, parent {uri})",
                    devfile.ctx.abs_path().display(),
                    devfile.data.api_version()
                ),
                None => println!(
                    "✓ {} is valid (apiVersion {})",
                    devfile.ctx.abs_path().display(),
                    devfile.data.api_version()
                ),
            }
        }

        Ok(0)
    }
}
