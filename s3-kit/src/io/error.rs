/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use crate::error::BoxError;

/// I/O related errors
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

#[derive(Debug)]
enum ErrorKind {
    /// The byte source could not report an upper bound on its length.
    ///
    /// Chunked uploads need to know the total content length up front (the
    /// service limits a multipart upload to 10,000 parts).
    UpperBoundSizeHintRequired,

    /// An underlying I/O operation failed
    Io(std::io::Error),

    /// A task failed to execute to completion
    TaskFailed(tokio::task::JoinError),

    /// Any other I/O related error
    Other(BoxError),
}

impl Error {
    pub(crate) fn upper_bound_size_hint_required() -> Self {
        Self {
            kind: ErrorKind::UpperBoundSizeHintRequired,
        }
    }

    pub(crate) fn other<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            kind: ErrorKind::Other(err.into()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::UpperBoundSizeHintRequired => write!(
                f,
                "size hint upper bound is required for this operation but none was given"
            ),
            ErrorKind::Io(_) => write!(f, "I/O error"),
            ErrorKind::TaskFailed(_) => write!(f, "task failed"),
            ErrorKind::Other(_) => write!(f, "unknown I/O error"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::UpperBoundSizeHintRequired => None,
            ErrorKind::Io(err) => Some(err),
            ErrorKind::TaskFailed(err) => Some(err),
            ErrorKind::Other(err) => Some(err.as_ref()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Io(value),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self {
            kind: ErrorKind::TaskFailed(value),
        }
    }
}
