// Copyright (c) Contributors to the devfile project.
// SPDX-License-Identifier: Apache-2.0

//! Filesystem capability used to load and write devfiles.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[cfg(test)]
#[path = "./fs_test.rs"]
mod fs_test;

/// Minimal file information returned by [`Filesystem::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    pub len: u64,
    pub is_dir: bool,
}

/// Read/write/stat surface over the storage devfiles live in.
pub trait Filesystem: Send + Sync + std::fmt::Debug {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    fn stat(&self, path: &Path) -> io::Result<FileInfo>;
}

/// The host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFs;

impl Filesystem for DefaultFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn stat(&self, path: &Path) -> io::Result<FileInfo> {
        let metadata = std::fs::metadata(path)?;
        Ok(FileInfo {
            len: metadata.len(),
            is_dir: metadata.is_dir(),
        })
    }
}

/// An in-memory filesystem keyed by path.
///
/// Paths are stored exactly as given, so callers should use absolute
/// paths consistently. Directories are not modelled.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, convenient for fixtures.
    pub fn with_file<P: Into<PathBuf>, C: Into<Vec<u8>>>(self, path: P, contents: C) -> Self {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), contents.into());
        }
        self
    }

    fn files(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<PathBuf, Vec<u8>>>> {
        self.files
            .lock()
            .map_err(|_| io::Error::other("memory filesystem lock poisoned"))
    }
}

impl Filesystem for MemoryFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files()?.get(path).cloned().ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.files()?.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn stat(&self, path: &Path) -> io::Result<FileInfo> {
        self.files()?
            .get(path)
            .map(|contents| FileInfo {
                len: contents.len() as u64,
                is_dir: false,
            })
            .ok_or_else(|| not_found(path))
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found", path.display()),
    )
}
