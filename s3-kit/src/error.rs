/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use aws_sdk_s3::error::ProvideErrorMetadata;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// NOTE: Use [`aws_smithy_types::error::display::DisplayErrorContext`] or similar to display
/// the entire error cause/source chain.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: BoxError,
}

/// General categories of errors.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Operation input validation issues
    InputInvalid,

    /// I/O errors
    IOError,

    /// Some kind of internal runtime issue (e.g. task failure, poisoned mutex, etc)
    RuntimeError,

    /// `CreateMultipartUpload` failed; no upload session exists and there is nothing to clean up
    SessionOpenFailed,

    /// A part transfer failed permanently; the upload session is aborted
    PartTransferFailed,

    /// `CompleteMultipartUpload` failed; the object was not created
    FinalizeFailed,

    /// `AbortMultipartUpload` failed; the upload session may be left dangling
    /// on the service and will need to be reclaimed out of band
    AbortFailed,

    /// A single-shot service call failed (bucket, object, tagging, or ACL operation)
    ServiceError,

    /// Resource not found (e.g. bucket, key, multipart upload ID not found)
    NotFound,
}

impl Error {
    /// Creates a new [`Error`] from a known kind of error as well as an arbitrary error source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: err.into(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

pub(crate) fn invalid_input<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::InputInvalid, err)
}

/// Returns a mapping function that wraps an arbitrary error source with the given kind.
pub(crate) fn from_kind<E>(kind: ErrorKind) -> impl FnOnce(E) -> Error
where
    E: Into<BoxError>,
{
    move |err| Error::new(kind, err)
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InputInvalid => write!(f, "invalid input"),
            ErrorKind::IOError => write!(f, "I/O error"),
            ErrorKind::RuntimeError => write!(f, "runtime error"),
            ErrorKind::SessionOpenFailed => write!(f, "failed to open multipart upload session"),
            ErrorKind::PartTransferFailed => write!(f, "failed to transfer part"),
            ErrorKind::FinalizeFailed => write!(f, "failed to finalize multipart upload"),
            ErrorKind::AbortFailed => write!(f, "failed to abort multipart upload"),
            ErrorKind::ServiceError => write!(f, "service error"),
            ErrorKind::NotFound => write!(f, "resource not found"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<crate::io::error::Error> for Error {
    fn from(value: crate::io::error::Error) -> Self {
        Self::new(ErrorKind::IOError, value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::new(ErrorKind::IOError, value)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::new(ErrorKind::RuntimeError, value)
    }
}

impl<T> From<std::sync::PoisonError<T>> for Error
where
    T: Send + Sync + 'static,
{
    fn from(value: std::sync::PoisonError<T>) -> Self {
        Self::new(ErrorKind::RuntimeError, value)
    }
}

/// Conversion used by the single-shot operation wrappers. Multipart upload
/// call sites map their `SdkError`s explicitly to the session/part/finalize/abort kinds.
impl<E, R> From<aws_sdk_s3::error::SdkError<E, R>> for Error
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: fmt::Debug + Send + Sync + 'static,
{
    fn from(value: aws_sdk_s3::error::SdkError<E, R>) -> Self {
        let kind = match value.code() {
            Some("NoSuchBucket") | Some("NoSuchKey") | Some("NoSuchUpload") | Some("NotFound") => {
                ErrorKind::NotFound
            }
            _ => ErrorKind::ServiceError,
        };
        Self::new(kind, value)
    }
}
