/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::future::poll_fn;
use std::path::Path;
use std::pin::Pin;

use aws_sdk_s3::primitives::ByteStream;
use aws_smithy_types::byte_stream::Length;
use bytes::{Buf, Bytes, BytesMut};

use crate::error;
use crate::io::path_body::{PathBody, PathBodyBuilder};
use crate::io::size_hint::SizeHint;

/// Source of binary data for an upload.
///
/// A `ByteSource` is either an in-memory buffer, a file on disk, or a caller
/// provided stream of parts.
#[derive(Debug)]
pub struct ByteSource {
    pub(super) inner: RawByteSource,
}

impl ByteSource {
    /// Create a new `ByteSource` from a static byte slice
    pub fn from_static(bytes: &'static [u8]) -> Self {
        let inner = RawByteSource::Buf(bytes.into());
        Self { inner }
    }

    /// Return the bounds on the remaining length of the `ByteSource`
    pub fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }

    /// Returns a [`PathBodyBuilder`], allowing you to build a `ByteSource` with
    /// full control over how the file is read (e.g. specifying the length or
    /// the starting offset to read from).
    pub fn read_from() -> PathBodyBuilder {
        PathBodyBuilder::new()
    }

    /// Create a new `ByteSource` that reads data from the given `path`.
    ///
    /// ## Warning
    /// The file must not change while the upload is in flight; its length is
    /// captured here, and a mid-flight modification makes the partition plan
    /// wrong in ways the upload will only discover as transfer failures.
    pub fn from_path(path: impl AsRef<Path>) -> Result<ByteSource, crate::io::error::Error> {
        Self::read_from().path(path).build()
    }

    /// The file path backing this source, if it is file based.
    pub(crate) fn path(&self) -> Option<&Path> {
        match &self.inner {
            RawByteSource::Fs(body) => Some(body.path.as_path()),
            _ => None,
        }
    }

    /// Create a new `ByteSource` that reads data from the given [`PartStream`] implementation.
    pub fn from_part_stream<T: PartStream + Send + Sync + 'static>(stream: T) -> Self {
        let inner = RawByteSource::Dyn(BoxStream::new(stream));
        Self { inner }
    }

    /// Converts the source to a `ByteStream` usable in a single `PutObject` request.
    pub(crate) async fn into_byte_stream(self) -> Result<ByteStream, error::Error> {
        match self.inner {
            RawByteSource::Buf(bytes) => Ok(ByteStream::from(bytes)),
            RawByteSource::Fs(body) => ByteStream::read_from()
                .path(body.path)
                .offset(body.offset)
                .length(Length::Exact(body.length))
                .build()
                .await
                .map_err(error::from_kind(error::ErrorKind::IOError)),
            RawByteSource::Dyn(mut stream) => {
                // single-shot path: drain the stream into contiguous memory
                let upper = stream
                    .inner
                    .size_hint()
                    .upper()
                    .ok_or_else(crate::io::error::Error::upper_bound_size_hint_required)?;
                let stream_cx = StreamContext {
                    part_size: upper.max(1) as usize,
                };
                let mut buf = BytesMut::with_capacity(upper as usize);
                while let Some(part) = stream.next(&stream_cx).await {
                    let part = part.map_err(error::from_kind(error::ErrorKind::IOError))?;
                    buf.extend_from_slice(&part.data);
                }
                Ok(ByteStream::from(buf.freeze()))
            }
        }
    }
}

#[derive(Debug)]
pub(super) enum RawByteSource {
    /// In-memory buffer to read from
    Buf(Bytes),
    /// File based input
    Fs(PathBody),
    /// User provided custom stream
    Dyn(BoxStream),
}

impl RawByteSource {
    pub(super) fn size_hint(&self) -> SizeHint {
        match self {
            RawByteSource::Buf(bytes) => SizeHint::exact(bytes.remaining() as u64),
            RawByteSource::Fs(body) => SizeHint::exact(body.length),
            RawByteSource::Dyn(stream) => stream.inner.size_hint(),
        }
    }
}

/// One contiguous chunk of an upload, transferred independently of its peers.
#[derive(Debug, Clone)]
pub struct Part {
    /// 1-indexed sequence number
    pub(crate) num: u64,
    pub(crate) data: Bytes,
}

impl Part {
    /// Create a new part with the given 1-indexed sequence number
    pub fn new(num: u64, data: impl Into<Bytes>) -> Self {
        Self {
            num,
            data: data.into(),
        }
    }
}

/// Context passed to a [`PartStream`] on each poll.
#[derive(Debug)]
pub struct StreamContext {
    pub(crate) part_size: usize,
}

impl StreamContext {
    /// The target size in bytes every part except the last should have.
    pub fn part_size(&self) -> usize {
        self.part_size
    }
}

/// Trait representing a stream of upload parts.
///
/// Individual parts are produced via the `poll_part` function, which
/// asynchronously yields instances of [`Part`]. When `Poll::Ready(None)` is
/// returned the stream is assumed to have reached EOF and is finished.
///
/// Implementations are responsible for assigning contiguous 1-indexed part
/// numbers and for producing parts of the size given by the [`StreamContext`]
/// (the final part may be smaller).
pub trait PartStream {
    /// Attempt to pull the next part from the stream
    fn poll_part(
        self: Pin<&mut Self>,
        stream_cx: &StreamContext,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<std::io::Result<Part>>>;

    /// Returns the bounds on the total size of the stream
    fn size_hint(&self) -> SizeHint;
}

pub(crate) struct BoxStream {
    inner: Pin<Box<dyn PartStream + Send + Sync + 'static>>,
}

impl BoxStream {
    fn new<T: PartStream + Send + Sync + 'static>(inner: T) -> Self {
        BoxStream {
            inner: Box::pin(inner),
        }
    }

    pub(crate) async fn next(&mut self, stream_cx: &StreamContext) -> Option<std::io::Result<Part>> {
        poll_fn(|cx| self.inner.as_mut().poll_part(stream_cx, cx)).await
    }

    pub(crate) fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl fmt::Debug for BoxStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxStream(dyn PartStream)").finish()
    }
}

impl Default for ByteSource {
    fn default() -> Self {
        Self {
            inner: RawByteSource::Buf(Bytes::default()),
        }
    }
}

impl From<Bytes> for ByteSource {
    fn from(value: Bytes) -> Self {
        Self {
            inner: RawByteSource::Buf(value),
        }
    }
}

impl From<Vec<u8>> for ByteSource {
    fn from(value: Vec<u8>) -> Self {
        Self::from(Bytes::from(value))
    }
}

impl From<&'static [u8]> for ByteSource {
    fn from(slice: &'static [u8]) -> ByteSource {
        Self::from(Bytes::from_static(slice))
    }
}

impl From<&'static str> for ByteSource {
    fn from(slice: &'static str) -> ByteSource {
        Self::from(Bytes::from_static(slice.as_bytes()))
    }
}
