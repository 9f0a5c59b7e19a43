// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for devfile operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with devfile Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, merging or validating a devfile.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Path could not be made absolute
    #[error("Failed to resolve absolute path of {path:?}")]
    #[diagnostic(code(devfile::path))]
    Path {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to read file
    #[error("Failed to read devfile: {path:?}")]
    #[diagnostic(code(devfile::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to write file
    #[error("Failed to write devfile: {path:?}")]
    #[diagnostic(code(devfile::write_failed))]
    WriteFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Content is not a well-formed devfile
    #[error("Failed to decode devfile {path:?}: {error}")]
    #[diagnostic(
        code(devfile::invalid_document),
        help("Check the YAML/JSON syntax and that 'apiVersion' is present")
    )]
    InvalidDocument {
        path: PathBuf,
        #[source]
        error: serde_yaml::Error,
    },

    /// Declared version has no registered document type
    #[error("devfile apiVersion '{version}' is not supported")]
    #[diagnostic(
        code(devfile::unsupported_version),
        help("Supported versions: {}", crate::versions::supported_versions().join(", "))
    )]
    UnsupportedVersion { version: String },

    /// No schema is registered for a supported version
    #[error("Failed to load JSON schema for devfile apiVersion '{version}': {reason}")]
    #[diagnostic(code(devfile::schema_load))]
    SchemaLoad { version: String, reason: String },

    /// Parent reference does not point directly at a single document
    #[error("Invalid devfile uri '{uri}': {reason}")]
    #[diagnostic(
        code(devfile::invalid_uri),
        help("Parent uris must use file, http or https and carry no credentials, query or fragment")
    )]
    InvalidUri { uri: String, reason: String },

    /// Parent reference uses a scheme we cannot fetch
    #[error("Protocol '{scheme}' not supported for fetching parent devfile '{uri}'")]
    #[diagnostic(code(devfile::unsupported_scheme))]
    UnsupportedScheme { uri: String, scheme: String },

    /// Remote parent could not be fetched or stored locally
    #[error("Failed to fetch parent devfile '{uri}': {reason}")]
    #[diagnostic(code(devfile::fetch))]
    Fetch {
        uri: String,
        reason: String,
        #[source]
        error: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Parent and local devfiles declare different versions
    #[error("Parent and local devfiles version mismatch: parent '{parent}', local '{local}'")]
    #[diagnostic(
        code(devfile::version_mismatch),
        help("A devfile can only inherit from a parent with the same apiVersion")
    )]
    VersionMismatch { local: String, parent: String },

    /// Document bytes violate the schema of their declared version
    #[error("devfile {path:?} does not match the {version} schema:\n  {}", violations.join("\n  "))]
    #[diagnostic(code(devfile::schema_validation))]
    SchemaValidation {
        path: PathBuf,
        version: String,
        violations: Vec<String>,
    },

    /// Parent chain refers back to a document already being resolved
    #[error("Circular parent reference detected: {}", chain.join(" -> "))]
    #[diagnostic(
        code(devfile::cyclic_parent),
        help("Remove the circular reference in your parent uris")
    )]
    CyclicParent { chain: Vec<String> },

    /// Failure while processing a parent devfile
    #[error("Failed to parse parent devfile '{uri}'")]
    #[diagnostic(code(devfile::parent))]
    Parent {
        uri: String,
        #[source]
        error: Box<Error>,
    },

    /// Document could not be serialized for output
    #[error("Failed to serialize devfile: {0}")]
    #[diagnostic(code(devfile::serialize))]
    Serialize(String),

    /// Validation error
    #[error("Validation failed: {0}")]
    #[diagnostic(code(devfile::validation_failed))]
    ValidationFailed(String),
}

impl Error {
    /// The innermost error, following parent wrappers.
    ///
    /// Callers that need to distinguish failure kinds should match on this
    /// rather than on the error returned from a parse with parents.
    pub fn root(&self) -> &Error {
        match self {
            Error::Parent { error, .. } => error.root(),
            other => other,
        }
    }
}
