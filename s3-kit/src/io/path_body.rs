/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fs;
use std::path::{Path, PathBuf};

use crate::io::error::Error;
use crate::io::source::{ByteSource, RawByteSource};

/// File based byte source
#[derive(Debug, Clone)]
pub(super) struct PathBody {
    pub(super) path: PathBuf,
    /// Number of bytes to read from the file
    pub(super) length: u64,
    /// Byte offset to start reading from
    pub(super) offset: u64,
}

/// Builder for creating a file based [`ByteSource`].
///
/// Allows control over how the file is read, e.g. specifying the length to
/// read or the starting offset to read from.
#[derive(Debug, Default)]
pub struct PathBodyBuilder {
    path: Option<PathBuf>,
    length: Option<u64>,
    offset: Option<u64>,
}

impl PathBodyBuilder {
    /// Create a new [`PathBodyBuilder`].
    ///
    /// You must call [`path`](PathBodyBuilder::path) to specify what to read from.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path to read from.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Specify the length to read (in bytes).
    ///
    /// By default, the length of the entire file is used. Setting this skips
    /// an additional call to retrieve the size from the file system.
    pub fn length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// Specify the offset to start reading from (in bytes)
    ///
    /// When used in conjunction with [`length`](PathBodyBuilder::length), allows
    /// reading a single "chunk" of a file.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns a [`ByteSource`] from this builder.
    pub fn build(self) -> Result<ByteSource, Error> {
        let path = self.path.expect("path set");
        let offset = self.offset.unwrap_or_default();

        let length = match self.length {
            Some(length) => length,
            None => {
                let metadata = fs::metadata(&path)?;
                let file_size = metadata.len();
                if offset > file_size {
                    return Err(Error::other(format!(
                        "offset {offset} is larger than the file size {file_size}"
                    )));
                }
                file_size - offset
            }
        };

        let body = PathBody {
            path,
            length,
            offset,
        };

        Ok(ByteSource {
            inner: RawByteSource::Fs(body),
        })
    }
}
