// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! devfile - Devfile parser with parent resolution
//!
//! This crate loads versioned devfiles (YAML or JSON descriptors of a
//! development environment), resolves an optional parent devfile referenced
//! by uri, merges the parent into the local document and validates the
//! result against the schema of the declared version.
//!
//! # Overview
//!
//! Parsing runs depth first: a devfile's parent (and its parent, and so on)
//! is fully resolved and merged before the devfile itself is validated.
//! Local content always wins; the parent only contributes entities the
//! local devfile does not already define.
//!
//! # Example
//!
//! ```yaml
//! # devfile.yaml
//! apiVersion: 1.0.0
//! parent:
//!   uri: https://example.com/stacks/java/devfile.yaml
//! metadata:
//!   name: petclinic
//! projects:
//!   - name: petclinic
//!     source:
//!       type: git
//!       location: https://github.com/spring-projects/spring-petclinic.git
//! ```

pub mod context;
pub mod error;
pub mod fs;
pub mod parse;
pub mod schema;
pub mod uri;
pub mod versions;
pub mod writer;

pub use context::DevfileCtx;
pub use error::{Error, Result};
pub use fs::{DefaultFs, FileInfo, Filesystem, MemoryFs};
pub use parse::{DevfileObj, ParseOptions, Parser, parse};
pub use uri::{HttpTransport, ResolvedUri, Transport};
pub use versions::DevfileData;

/// Well-known filename for devfiles.
pub const DEVFILE_FILENAME: &str = "devfile.yaml";
