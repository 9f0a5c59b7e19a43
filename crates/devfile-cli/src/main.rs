// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! devfile - resolve, merge and validate devfiles

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use miette::Result;

mod cmd_check;
mod cmd_show;

use cmd_check::CmdCheck;
use cmd_show::CmdShow;

#[derive(Parser)]
#[clap(
    name = "devfile",
    about = "Devfile parser",
    version,
    long_about = "Resolve parent devfiles, merge them and validate the result"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long, global = true)]
    quiet: bool,
}

/// Flags shared by every command that parses a devfile.
#[derive(Parser, Clone, Debug)]
pub struct SourceFlags {
    /// Devfile to parse
    #[clap(short = 'f', long, env = "DEVFILE_PATH", default_value = devfile::DEVFILE_FILENAME)]
    pub file: PathBuf,

    /// Timeout in seconds for fetching remote parents
    #[clap(long, env = "DEVFILE_HTTP_TIMEOUT")]
    pub http_timeout: Option<u64>,
}

impl SourceFlags {
    pub fn parser(&self) -> devfile::Parser {
        let transport = match self.http_timeout {
            Some(secs) => devfile::HttpTransport::with_timeout(Duration::from_secs(secs)),
            None => devfile::HttpTransport::default(),
        };
        devfile::Parser::new(devfile::ParseOptions {
            transport: Arc::new(transport),
            ..Default::default()
        })
    }
}

#[derive(Subcommand)]
enum Command {
    /// Display the resolved devfile
    Show(CmdShow),

    /// Verify that a devfile and its parents resolve and validate
    Check(CmdCheck),
}

impl Opt {
    fn run(self) -> Result<i32> {
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        match self.cmd {
            Command::Show(mut cmd) => cmd.run(),
            Command::Check(mut cmd) => cmd.run(self.logging.quiet),
        }
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run()?;
    std::process::exit(code);
}
